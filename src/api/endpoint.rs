pub type Endpoint = str;

pub const API_URL: &str = "https://uportal.livre.cgi.com/uPortal2/gaia";

pub const LOGIN: &Endpoint = "/login";
pub const SUBSCRIPTIONS: &Endpoint = "/Subscription/listSubscriptions";
pub const LAST_DOCUMENT: &Endpoint = "/Billing/getDadosUltimoDocumento";
pub const INVOICE_HISTORY: &Endpoint = "/Billing/getFaturasContractoByIntervalo";
pub const METERS: &Endpoint = "/leituras/getContadores";

/* Query and body parameter names */
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const SUBSCRIPTION_ID: &str = "subscriptionId";
pub const START_DATE: &str = "dataInicial";
pub const END_DATE: &str = "dataFinal";

/* Headers */
pub const AUTH_TOKEN: &str = "X-Auth-Token";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const JSON_CONTENT: &str = "application/json";
