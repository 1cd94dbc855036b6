use super::scalar;
use crate::model::Quantity;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Reading {
    #[serde(rename = "ultimaLeitura")]
    pub last_reading: Quantity,
    #[serde(rename = "dataUltimaLeitura", default)]
    pub reading_date: Option<String>,
}

#[derive(Deserialize)]
pub struct MeterKey {
    #[serde(
        rename = "numeroContador",
        default,
        deserialize_with = "scalar::optional_string_or_number"
    )]
    pub meter_number: Option<String>,
}

#[derive(Deserialize)]
pub struct Data {
    /* Required: a meter without a reading list is a malformed payload, an empty one is not */
    #[serde(rename = "funcoesContador")]
    pub readings: Vec<Reading>,
    #[serde(rename = "chaveContador", default)]
    pub meter_key: Option<MeterKey>,
    #[serde(rename = "descMarca", default)]
    pub brand: Option<String>,
    #[serde(rename = "descModelo", default)]
    pub model: Option<String>,
}

pub type GetMeters = Vec<Data>;
