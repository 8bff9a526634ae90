use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::str::FromStr;

/// Trip shape selected on the search form. Numeric on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum RouteModel {
    OneWay = 1,
    RoundTrip = 2,
    MultiCity = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cabin {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl Cabin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cabin::Economy => "ECONOMY",
            Cabin::PremiumEconomy => "PREMIUM_ECONOMY",
            Cabin::Business => "BUSINESS",
            Cabin::First => "FIRST",
        }
    }
}

impl fmt::Display for Cabin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cabin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECONOMY" => Ok(Cabin::Economy),
            "PREMIUM_ECONOMY" => Ok(Cabin::PremiumEconomy),
            "BUSINESS" => Ok(Cabin::Business),
            "FIRST" => Ok(Cabin::First),
            other => Err(format!("unknown cabin: {}", other)),
        }
    }
}

/// One origin, destination and departure date triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    #[serde(default)]
    pub origin_location: String,
    #[serde(default)]
    pub destination_location: String,
    #[serde(default)]
    pub departure_date: String,
}

impl RouteLeg {
    pub fn new(origin: &str, destination: &str, departure_date: &str) -> Self {
        Self {
            origin_location: origin.to_string(),
            destination_location: destination.to_string(),
            departure_date: departure_date.to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.origin_location.trim().is_empty()
            && !self.destination_location.trim().is_empty()
            && !self.departure_date.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTripRoute {
    #[serde(flatten)]
    pub outbound: RouteLeg,
    #[serde(default)]
    pub return_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiCityRoute {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerCounts {
    #[serde(default)]
    pub number_of_adults: u32,
    #[serde(default)]
    pub number_of_children: u32,
    #[serde(default)]
    pub number_of_infants: u32,
}

/// Search form as submitted by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchForm {
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub direct_flight: bool,
    pub route_model: RouteModel,
    #[serde(default)]
    pub flight_cabin: String,
    #[serde(default)]
    pub travelers: TravelerCounts,
    #[serde(default)]
    pub one_way: Option<RouteLeg>,
    #[serde(default)]
    pub round_trip: Option<RoundTripRoute>,
    #[serde(default)]
    pub multi_city: Option<MultiCityRoute>,
}
