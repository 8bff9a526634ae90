use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao_code: Option<String>,
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airline {
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao_code: Option<String>,
    pub name: String,
}
