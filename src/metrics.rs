use aguasgaia_rs::model::{Api, Consumption, Invoice, Subscription};
use aguasgaia_rs::{Error, Session};
use prometheus::{Encoder, GaugeVec, TextEncoder};

lazy_static! {
    static ref SUBSCRIPTION_ACTIVE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("subscription_active", "1 if the subscription is active, 0 otherwise"),
        &["subscription_id"],
    )
    .unwrap();
    static ref INVOICE_VALUE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("last_invoice_value", "amount due on the latest invoice"),
        &["subscription_id"],
    )
    .unwrap();
    static ref INVOICE_PAID_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("last_invoice_paid", "1 if the latest invoice is settled, 0 otherwise"),
        &["subscription_id"],
    )
    .unwrap();
    static ref METER_READING_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("last_meter_reading", "latest meter reading (in m3)"),
        &["subscription_id", "meter_number"],
    )
    .unwrap();
}

fn process_subscriptions(subscriptions: &[Subscription]) {
    for subscription in subscriptions {
        SUBSCRIPTION_ACTIVE_GAUGE
            .with_label_values(&[&subscription.id])
            .set(if subscription.active { 1.0 } else { 0.0 });
    }
}

fn process_invoice(subscription_id: &str, invoice: &Invoice) {
    match invoice.value.as_f64() {
        Some(value) => INVOICE_VALUE_GAUGE
            .with_label_values(&[subscription_id])
            .set(value),
        None => log::warn!(
            "Non-numeric invoice value for subscription {}: {}",
            subscription_id,
            invoice.value
        ),
    }

    if let Some(paid) = invoice.attributes.paid {
        INVOICE_PAID_GAUGE
            .with_label_values(&[subscription_id])
            .set(if paid { 1.0 } else { 0.0 });
    }
}

fn process_consumption(subscription_id: &str, consumption: &Consumption) {
    let meter_number = consumption
        .attributes
        .meter_number
        .as_deref()
        .unwrap_or_default();

    match consumption.value.as_f64() {
        Some(value) => METER_READING_GAUGE
            .with_label_values(&[subscription_id, meter_number])
            .set(value),
        None => log::warn!(
            "Non-numeric meter reading for subscription {}: {}",
            subscription_id,
            consumption.value
        ),
    }
}

/// Collect all supported metrics from `api`, updating Prometheus exporter registry.
///
/// A missing invoice or reading is not fatal; the other metrics are still published.
pub async fn collect(api: &Api) -> Result<(), Error> {
    let mut session = Session::new(api.clone());
    session.login().await?;

    let subscriptions = session.subscriptions().await?;
    process_subscriptions(&subscriptions);

    let subscription_id = session
        .selected_subscription()
        .map(String::from)
        .ok_or(Error::NoSubscriptionId)?;

    match session.last_invoice(None).await {
        Ok(invoice) => process_invoice(&subscription_id, &invoice),
        Err(Error::NoInvoiceData) => {
            log::warn!("No invoice returned for subscription {}", subscription_id)
        }
        Err(e) => return Err(e),
    }

    match session.last_consumption(None).await {
        Ok(consumption) => process_consumption(&subscription_id, &consumption),
        Err(Error::NoConsumptionData) => {
            log::warn!("No reading returned for subscription {}", subscription_id)
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| Error::InternalError(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| Error::InternalError(e.to_string()))
}
