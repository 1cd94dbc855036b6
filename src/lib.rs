//! Client for the Águas de Gaia customer portal API: subscriptions, invoices and meter
//! readings of a residential account.
//!
//! ```no_run
//! # async fn run() -> Result<(), aguasgaia_rs::Error> {
//! let api = aguasgaia_rs::api::api(
//!     reqwest::Client::new(),
//!     "username".to_string(),
//!     "password".to_string(),
//! );
//! let mut session = aguasgaia_rs::Session::new(api);
//! session.login().await?;
//! let invoice = session.last_invoice(None).await?;
//! println!("{}", invoice.value);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod model;
mod session;

pub use api::Error;
pub use session::Session;
