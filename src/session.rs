use crate::api::{self, Error};
use crate::model::{Api, Consumption, Invoice, LoggedInApi, Subscription};
use chrono::NaiveDate;
use serde_json::Value;

/// An account session: logs in once and serves the read operations with the resulting
/// credentials, keeping the last result of each for later inspection.
///
/// Every operation takes `&mut self`; share a session between tasks only behind external
/// synchronization, or give each task its own.
#[derive(Debug)]
pub struct Session {
    api: Api,
    logged_in: Option<LoggedInApi>,
    subscriptions: Option<Vec<Subscription>>,
    last_invoice: Option<Invoice>,
    invoice_history: Option<Vec<Value>>,
    last_consumption: Option<Consumption>,
}

/// Log failures at the session boundary and hand them on unchanged.
fn logged<T>(operation: &str, result: Result<T, Error>) -> Result<T, Error> {
    result.map_err(|e| {
        log::error!("{} failed: {}", operation, e);
        e
    })
}

impl Session {
    pub fn new(api: Api) -> Self {
        Session {
            api,
            logged_in: None,
            subscriptions: None,
            last_invoice: None,
            invoice_history: None,
            last_consumption: None,
        }
    }

    /// Log in, replacing any previous session credentials. On failure the session is left
    /// logged out.
    pub async fn login(&mut self) -> Result<&LoggedInApi, Error> {
        log::debug!("Session login");
        self.logged_in = None;
        let logged_in = logged("login", api::login(&self.api).await)?;
        Ok(&*self.logged_in.insert(logged_in))
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.is_some()
    }

    fn logged_in(&self, operation: &str) -> Result<&LoggedInApi, Error> {
        logged(operation, self.logged_in.as_ref().ok_or(Error::NotLoggedIn))
    }

    /// Subscription used when an operation is called without an explicit identifier.
    pub fn selected_subscription(&self) -> Option<&str> {
        self.logged_in
            .as_ref()
            .and_then(LoggedInApi::selected_subscription)
            .or(self.api.subscription_id.as_deref())
    }

    pub fn select_subscription(&mut self, subscription_id: impl Into<String>) {
        let subscription_id = subscription_id.into();
        if let Some(logged_in) = self.logged_in.as_mut() {
            logged_in.select_subscription(subscription_id.clone());
        }
        self.api.subscription_id = Some(subscription_id);
    }

    pub async fn subscriptions(&mut self) -> Result<Vec<Subscription>, Error> {
        let operation = "subscriptions";
        let subscriptions = logged(
            operation,
            api::subscriptions(self.logged_in(operation)?).await,
        )?;
        self.subscriptions = Some(subscriptions.clone());
        Ok(subscriptions)
    }

    pub async fn last_invoice(&mut self, subscription_id: Option<&str>) -> Result<Invoice, Error> {
        let operation = "last invoice";
        let invoice = logged(
            operation,
            api::last_invoice(self.logged_in(operation)?, subscription_id).await,
        )?;
        self.last_invoice = Some(invoice.clone());
        Ok(invoice)
    }

    pub async fn invoice_history(
        &mut self,
        subscription_id: Option<&str>,
    ) -> Result<Vec<Value>, Error> {
        let operation = "invoice history";
        let history = logged(
            operation,
            api::invoice_history(self.logged_in(operation)?, subscription_id).await,
        )?;
        self.invoice_history = Some(history.clone());
        Ok(history)
    }

    pub async fn invoice_history_between(
        &mut self,
        subscription_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Value>, Error> {
        let operation = "invoice history";
        let history = logged(
            operation,
            api::invoice_history_between(self.logged_in(operation)?, subscription_id, start, end)
                .await,
        )?;
        self.invoice_history = Some(history.clone());
        Ok(history)
    }

    pub async fn last_consumption(
        &mut self,
        subscription_id: Option<&str>,
    ) -> Result<Consumption, Error> {
        let operation = "last consumption";
        let consumption = logged(
            operation,
            api::last_consumption(self.logged_in(operation)?, subscription_id).await,
        )?;
        self.last_consumption = Some(consumption.clone());
        Ok(consumption)
    }

    pub fn cached_subscriptions(&self) -> Option<&[Subscription]> {
        self.subscriptions.as_deref()
    }

    pub fn cached_last_invoice(&self) -> Option<&Invoice> {
        self.last_invoice.as_ref()
    }

    pub fn cached_invoice_history(&self) -> Option<&[Value]> {
        self.invoice_history.as_deref()
    }

    pub fn cached_last_consumption(&self) -> Option<&Consumption> {
        self.last_consumption.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::Session;
    use crate::api::response::test::read_resource;
    use crate::api::test::{mock_get, mock_login, test_api};
    use crate::api::Error;
    use crate::model::Quantity;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn reads_before_login_fail() {
        let server = Server::new_async().await;
        let mut session = Session::new(test_api(&server));

        assert!(!session.is_logged_in());
        assert_eq!(Err(Error::NotLoggedIn), session.subscriptions().await);
        assert_eq!(Err(Error::NotLoggedIn), session.last_invoice(None).await);
        assert_eq!(Err(Error::NotLoggedIn), session.invoice_history(None).await);
        assert_eq!(
            Err(Error::NotLoggedIn),
            session.last_consumption(Some("456454")).await
        );
        assert!(session.cached_last_invoice().is_none());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_logged_out() {
        let mut server = Server::new_async().await;
        let _login_mock = mock_login(&mut server, &read_resource("login_NoToken.json")).await;
        let mut session = Session::new(test_api(&server));

        assert!(session.login().await.is_err());
        assert!(!session.is_logged_in());
        assert_eq!(None, session.selected_subscription());
    }

    #[tokio::test]
    async fn login_then_read_caches_results() {
        let mut server = Server::new_async().await;
        let _login_mock = mock_login(&mut server, &read_resource("login.json")).await;
        let _subscriptions_mock = mock_get(&mut server, "/Subscription/listSubscriptions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(read_resource("listSubscriptions.json"))
            .create_async()
            .await;
        let invoice_mock = mock_get(&mut server, "/Billing/getDadosUltimoDocumento")
            .match_query(Matcher::UrlEncoded("subscriptionId".into(), "456454".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(read_resource("getDadosUltimoDocumento.json"))
            .create_async()
            .await;
        let consumption_mock = mock_get(&mut server, "/leituras/getContadores")
            .match_query(Matcher::UrlEncoded("subscriptionId".into(), "456454".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(read_resource("getContadores.json"))
            .create_async()
            .await;

        let mut session = Session::new(test_api(&server));
        session.login().await.unwrap();
        assert_eq!(Some("456454"), session.selected_subscription());

        let subscriptions = session.subscriptions().await.unwrap();
        let invoice = session.last_invoice(None).await.unwrap();
        let consumption = session.last_consumption(None).await.unwrap();

        assert_eq!(Some(subscriptions.as_slice()), session.cached_subscriptions());
        assert_eq!(Some(&invoice), session.cached_last_invoice());
        assert_eq!(Some(&consumption), session.cached_last_consumption());
        assert_eq!(Quantity::Text("999".to_string()), invoice.value);
        assert_eq!(Quantity::Number(9999.0), consumption.value);
        invoice_mock.assert_async().await;
        consumption_mock.assert_async().await;
    }

    #[tokio::test]
    async fn explicit_selection_is_used() {
        let mut server = Server::new_async().await;
        let _login_mock = mock_login(&mut server, &read_resource("login.json")).await;
        let _invoice_mock = mock_get(&mut server, "/Billing/getDadosUltimoDocumento")
            .match_query(Matcher::UrlEncoded("subscriptionId".into(), "1236453".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let mut session = Session::new(test_api(&server).with_subscription_id("999"));
        session.login().await.unwrap();
        session.select_subscription("1236453");

        assert_eq!(Some("1236453"), session.selected_subscription());
        assert_eq!(Err(Error::NoInvoiceData), session.last_invoice(None).await);
        assert!(session.cached_last_invoice().is_none());
    }
}
