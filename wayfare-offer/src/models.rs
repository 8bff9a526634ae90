use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_catalog::{Airline, Airport};
use wayfare_core::gds::{Aircraft, Dictionaries, Meta, Price, PricingOptions, TravelerPricing};

/// Search results in the storefront shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub flight_offers: Vec<FlightOfferDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionaries: Option<Dictionaries>,
}

/// A provider offer with airports and carriers resolved and durations as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOfferDetail {
    #[serde(rename = "type")]
    pub offer_type: String,
    pub id: String,
    pub source: String,
    #[serde(rename = "amaClientRef")]
    pub client_ref: String,
    #[serde(default)]
    pub instant_ticketing_required: bool,
    #[serde(default)]
    pub non_homogeneous: bool,
    #[serde(default)]
    pub one_way: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ticketing_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ticketing_date_time: Option<String>,
    #[serde(default)]
    pub number_of_bookable_seats: u32,
    #[serde(default)]
    pub duration_in_minutes: i64,
    pub itineraries: Vec<ItineraryDetail>,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_options: Option<PricingOptions>,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
    #[serde(default)]
    pub traveler_pricings: Vec<TravelerPricing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub duration_in_minutes: i64,
    pub segments: Vec<SegmentDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDetail {
    pub departure: EndpointDetail,
    pub arrival: EndpointDetail,
    pub carrier: Option<Airline>,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<Aircraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating: Option<OperatingDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub id: String,
    #[serde(default)]
    pub number_of_stops: u32,
    #[serde(default, rename = "blacklistedInEU")]
    pub blacklisted_in_eu: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDetail {
    pub location: Option<Airport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingDetail {
    pub carrier: Option<Airline>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRequest {
    pub request_id: Uuid,
}
