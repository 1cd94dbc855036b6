use super::scalar;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    #[serde(deserialize_with = "scalar::string_or_number")]
    pub subscription_id: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "scalar::string_or_default")]
    pub client_address: String,
    #[serde(default, deserialize_with = "scalar::string_or_default")]
    pub activation_date: String,
}

pub type ListSubscriptions = Vec<Data>;
