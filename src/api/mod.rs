pub mod endpoint;
pub mod error;
pub mod response;

use crate::model;
use chrono::{Datelike, Local, Months, NaiveDate};
pub use error::Error;
use http::header::{CONTENT_TYPE, COOKIE};
use reqwest::Response;
use response::last_document::GetLastDocument;
use response::list_subscriptions::ListSubscriptions;
use response::login::Login;
use response::meters::GetMeters;
use serde::de::DeserializeOwned;
use serde_json::Value;

use std::collections::HashMap;

pub fn api(client: reqwest::Client, username: String, password: String) -> model::Api {
    model::Api {
        api_url: endpoint::API_URL.to_string(),
        username,
        password,
        subscription_id: None,
        client,
    }
}

/// Map a failed send to Error
fn map_api_err(error: reqwest::Error) -> Error {
    if error.is_builder() {
        return Error::InternalError(error.to_string());
    }
    match error.status() {
        Some(http::StatusCode::UNAUTHORIZED) => Error::LoginError(error.to_string()),
        _ => Error::ApiError(error.to_string()),
    }
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .map_or(false, |mime| mime.eq_ignore_ascii_case(endpoint::JSON_CONTENT))
}

/// Only `200 OK` carrying `application/json` counts as a successful response.
fn check_response(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status == http::StatusCode::UNAUTHORIZED {
        return Err(Error::LoginError(format!("server responded {}", status)));
    }
    if status != http::StatusCode::OK {
        return Err(Error::ApiError(format!("server responded {}", status)));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !is_json(content_type) {
        return Err(Error::ApiError(format!(
            "unexpected content type {:?}",
            content_type
        )));
    }

    Ok(response)
}

async fn read_json(response: Response) -> Result<Value, Error> {
    let text = response
        .text()
        .await
        .map_err(|e| Error::ApiError(format!("Error reading API response: {}", e)))?;

    log::trace!("response_text: {}", text);

    serde_json::from_str::<Value>(&text).map_err(|e| Error::InvalidResponse(e.to_string(), text))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value::<T>(value).map_err(|e| Error::UnexpectedApiResponse(e.to_string()))
}

fn session_cookies(response: &Response) -> String {
    response
        .cookies()
        .map(|cookie| format!("{}={};", cookie.name(), cookie.value()))
        .collect()
}

/// Formats a date the way the provider expects it: `YYYY-M-D`, without zero padding.
pub fn provider_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// One year back from `today` (inclusive of both ends). 29 February maps to 28 February.
pub fn history_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

fn selected<'a>(
    api: &'a model::LoggedInApi,
    subscription_id: Option<&'a str>,
) -> Result<&'a str, Error> {
    subscription_id
        .or_else(|| api.selected_subscription())
        .ok_or(Error::NoSubscriptionId)
}

/// Exchange credentials for a token and session cookies.
///
/// Unless `api` already names a subscription, the subscription list is fetched and the first
/// entry becomes the selected subscription; an account without subscriptions fails to log in.
pub async fn login(api: &model::Api) -> Result<model::LoggedInApi, Error> {
    let url = format!("{}{}", api.api_url, endpoint::LOGIN);

    let request_body = HashMap::from([
        (endpoint::USERNAME, api.username.as_str()),
        (endpoint::PASSWORD, api.password.as_str()),
    ]);

    log::debug!("POST {} as {}", endpoint::LOGIN, api.username);

    let response = api
        .client
        .post(url)
        .header(CONTENT_TYPE, endpoint::CONTENT_TYPE)
        .json(&request_body)
        .send()
        .await
        .map_err(map_api_err)
        .and_then(check_response)?;

    let cookies = session_cookies(&response);
    let token = read_json(response)
        .await
        .and_then(decode::<Login>)?
        .into_token()
        .ok_or_else(|| Error::LoginError(String::from("No token received")))?;

    if cookies.is_empty() {
        return Err(Error::LoginError(String::from("No session cookies received")));
    }

    let mut logged_in = model::LoggedInApi {
        api_url: api.api_url.to_owned(),
        token,
        cookies,
        subscription_id: api.subscription_id.to_owned(),
        client: api.client.clone(),
    };

    if logged_in.subscription_id.is_none() {
        let first = subscriptions(&logged_in)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoSubscriptions)?;
        log::debug!("Selected subscription {}", first.id);
        logged_in.select_subscription(first.id);
    }

    Ok(logged_in)
}

async fn get(
    api: &model::LoggedInApi,
    endpoint: &endpoint::Endpoint,
    query: &[(&str, &str)],
) -> Result<Value, Error> {
    let url = format!("{}{}", api.api_url, endpoint);

    log::debug!("GET {} {:?}", endpoint, query);

    let response = api
        .client
        .get(url)
        .query(query)
        .header(CONTENT_TYPE, endpoint::CONTENT_TYPE)
        .header(endpoint::AUTH_TOKEN, api.token.as_str())
        .header(COOKIE, api.cookies.as_str())
        .send()
        .await
        .map_err(map_api_err)
        .and_then(check_response)?;

    read_json(response).await
}

pub async fn subscriptions(api: &model::LoggedInApi) -> Result<Vec<model::Subscription>, Error> {
    get(api, endpoint::SUBSCRIPTIONS, &[])
        .await
        .and_then(decode::<ListSubscriptions>)
        .map(|response| {
            response
                .into_iter()
                .map(|sub| model::Subscription {
                    id: sub.subscription_id,
                    active: sub.is_active.unwrap_or(false),
                    address: sub.client_address,
                    activation_date: sub.activation_date,
                })
                .collect()
        })
}

/// Latest invoice of `subscription_id`, or of the selected subscription when `None`.
pub async fn last_invoice(
    api: &model::LoggedInApi,
    subscription_id: Option<&str>,
) -> Result<model::Invoice, Error> {
    let subscription_id = selected(api, subscription_id)?;

    let document = get(
        api,
        endpoint::LAST_DOCUMENT,
        &[(endpoint::SUBSCRIPTION_ID, subscription_id)],
    )
    .await
    .and_then(decode::<GetLastDocument>)?
    .into_iter()
    .next()
    .ok_or(Error::NoInvoiceData)?;

    Ok(model::Invoice {
        value: document.payment.value,
        attributes: model::InvoiceAttributes {
            paid: document.paid,
            issued: document.issued,
            due: document.due,
            number: document.number,
            reference: document.reference,
            sanitation: document.sanitation,
            residues: document.residues,
            consumption: document.consumption,
            taxes: document.taxes,
            vat: document.vat,
        },
    })
}

/// Invoices issued during the last year, as returned by the provider.
pub async fn invoice_history(
    api: &model::LoggedInApi,
    subscription_id: Option<&str>,
) -> Result<Vec<Value>, Error> {
    let (start, end) = history_window(Local::now().date_naive());
    invoice_history_between(api, subscription_id, start, end).await
}

pub async fn invoice_history_between(
    api: &model::LoggedInApi,
    subscription_id: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Value>, Error> {
    let subscription_id = selected(api, subscription_id)?;
    let start = provider_date(start);
    let end = provider_date(end);

    get(
        api,
        endpoint::INVOICE_HISTORY,
        &[
            (endpoint::END_DATE, end.as_str()),
            (endpoint::START_DATE, start.as_str()),
            (endpoint::SUBSCRIPTION_ID, subscription_id),
        ],
    )
    .await
    .and_then(decode::<Vec<Value>>)
}

/// Most recent meter reading of `subscription_id`, or of the selected subscription when `None`.
pub async fn last_consumption(
    api: &model::LoggedInApi,
    subscription_id: Option<&str>,
) -> Result<model::Consumption, Error> {
    let subscription_id = selected(api, subscription_id)?;

    let meter = get(
        api,
        endpoint::METERS,
        &[(endpoint::SUBSCRIPTION_ID, subscription_id)],
    )
    .await
    .and_then(decode::<GetMeters>)?
    .into_iter()
    .next()
    .ok_or(Error::NoConsumptionData)?;

    let meter_number = meter.meter_key.and_then(|key| key.meter_number);
    let reading = meter
        .readings
        .into_iter()
        .next()
        .ok_or(Error::NoConsumptionData)?;

    Ok(model::Consumption {
        value: reading.last_reading,
        attributes: model::ConsumptionAttributes {
            meter_number,
            reading_date: reading.reading_date,
            meter_brand: meter.brand,
            meter_model: meter.model,
        },
    })
}
