pub mod last_document;
pub mod list_subscriptions;
pub mod login;
pub mod meters;
mod scalar;
