#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use aguasgaia_rs::api::{self, endpoint};
use aguasgaia_rs::model::Api;
use config::Config;
use rocket::{Build, Rocket, State};
use std::sync::Mutex;
use std::time::Instant;

mod metrics;

const DEFAULT_INTERVAL: i64 = 3600;

#[derive(Clone, serde::Deserialize)]
pub struct AguasGaiaConfig {
    api_url: String,
    username: String,
    password: String,
    subscription_id: Option<String>,
    interval: u64,
}

/// Structure containing state for API handlers.
pub struct StateData {
    api: Api,
    interval: u64,
    /// Timestamp of last successful metric collection via `metrics::collect()`
    timestamp: Mutex<Option<Instant>>,
}

impl StateData {
    /// Updates `timestamp` to `now()`.
    fn touch(&self) {
        if let Ok(mut ts) = self.timestamp.lock() {
            *ts = Some(Instant::now());
        } else {
            log::trace!("Unable to lock timestamp mutex, will refresh again")
        }
    }

    /// Checks whether `interval_secs` elapsed since last `touch()`
    fn interval_elapsed(&self, interval_secs: u64) -> bool {
        let elapsed_opt = self
            .timestamp
            .lock()
            .ok()
            .and_then(|a| a.map(|b| b.elapsed().as_secs()));

        if let Some(elapsed) = elapsed_opt {
            elapsed > interval_secs
        } else {
            /* No previous collection: always collect */
            true
        }
    }
}

/// Settings come from `AG_*` environment variables.
pub fn read_settings() -> Result<AguasGaiaConfig, config::ConfigError> {
    let mut settings = Config::default();
    settings
        .set_default("api_url", endpoint::API_URL)?
        .set_default("interval", DEFAULT_INTERVAL)?
        .merge(config::Environment::with_prefix("AG"))?;

    settings.try_into()
}

#[get("/metrics")]
async fn metrics_route(state: &State<StateData>) -> Result<String, api::Error> {
    if state.interval_elapsed(state.interval) {
        metrics::collect(&state.api).await?;
        state.touch();
    } else {
        log::info!("interval time not yet elapsed since last run; returning cached result")
    }
    metrics::read()
}

#[get("/dump-invoices")]
async fn dump_invoices_route(state: &State<StateData>) -> Result<String, api::Error> {
    let logged_in_api = api::login(&state.api).await?;
    let history = api::invoice_history(&logged_in_api, None).await?;

    serde_json::to_string_pretty(&history)
        .map_err(|e| api::Error::InternalError(e.to_string()))
}

#[launch]
fn rocket() -> Rocket<Build> {
    env_logger::init();

    let settings = match read_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let mut api = api::api(reqwest::Client::new(), settings.username, settings.password)
        .with_api_url(settings.api_url);
    if let Some(subscription_id) = settings.subscription_id {
        api = api.with_subscription_id(subscription_id);
    }

    let state = StateData {
        api,
        interval: settings.interval,
        timestamp: Mutex::new(None),
    };

    rocket::build()
        .manage(state)
        .mount("/", routes![metrics_route, dump_invoices_route])
}
