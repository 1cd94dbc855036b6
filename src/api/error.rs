use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    LoginError(String),
    NotLoggedIn,
    ApiError(String),
    /// (parse error, response body)
    InvalidResponse(String, String),
    UnexpectedApiResponse(String),
    NoSubscriptionId,
    NoSubscriptions,
    NoInvoiceData,
    NoConsumptionData,
    InternalError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LoginError(s) => write!(f, "login failed: {}", s),
            Error::NotLoggedIn => write!(f, "session is not logged in"),
            Error::ApiError(s) => write!(f, "API request failed: {}", s),
            Error::InvalidResponse(e, body) => {
                write!(f, "invalid JSON in API response ({}): {}", e, body)
            }
            Error::UnexpectedApiResponse(s) => write!(f, "unexpected API response shape: {}", s),
            Error::NoSubscriptionId => write!(f, "no subscription identifier available"),
            Error::NoSubscriptions => write!(f, "no subscriptions found for this account"),
            Error::NoInvoiceData => write!(f, "no invoice data"),
            Error::NoConsumptionData => write!(f, "no consumption data"),
            Error::InternalError(s) => write!(f, "internal error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

fn html(status: Status, title: &str, detail: String) -> response::Result<'static> {
    let body = format!(
        "<html><body><h3>{}</h3><code>{}</code></body></html>",
        title, detail
    );
    Response::build()
        .status(status)
        .sized_body(body.len(), Cursor::new(body))
        .header(ContentType::new("text", "html"))
        .ok()
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match self {
            Error::LoginError(_) | Error::NotLoggedIn => html(
                Status::Forbidden,
                "403 Forbidden",
                format!("Error while authenticating to downstream API: {}", self),
            ),
            Error::NoSubscriptionId
            | Error::NoSubscriptions
            | Error::NoInvoiceData
            | Error::NoConsumptionData => html(Status::NotFound, "404 Not Found", self.to_string()),
            _ => html(
                Status::InternalServerError,
                "Unknown exception",
                format!("{:?}", self),
            ),
        }
    }
}
