use super::scalar;
use crate::model::Quantity;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct PaymentData {
    #[serde(rename = "valor")]
    pub value: Quantity,
}

#[derive(Deserialize)]
pub struct Data {
    #[serde(rename = "dadosPagamento")]
    pub payment: PaymentData,
    #[serde(rename = "liquidada", default)]
    pub paid: Option<bool>,
    #[serde(rename = "dataEmissao", default)]
    pub issued: Option<String>,
    #[serde(rename = "dataLimite", default)]
    pub due: Option<String>,
    #[serde(
        rename = "numeroFatura",
        default,
        deserialize_with = "scalar::optional_string_or_number"
    )]
    pub number: Option<String>,
    #[serde(
        rename = "referenciaFatura",
        default,
        deserialize_with = "scalar::optional_string_or_number"
    )]
    pub reference: Option<String>,
    #[serde(rename = "saneamento", default)]
    pub sanitation: Option<Quantity>,
    #[serde(rename = "residuos", default)]
    pub residues: Option<Quantity>,
    #[serde(rename = "consumo", default)]
    pub consumption: Option<Quantity>,
    #[serde(rename = "taxas", default)]
    pub taxes: Option<Quantity>,
    #[serde(rename = "iva", default)]
    pub vat: Option<Quantity>,
}

pub type GetLastDocument = Vec<Data>;
