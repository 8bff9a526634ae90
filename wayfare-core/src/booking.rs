use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use wayfare_shared::Masked;

use crate::gds::{AccessToken, FlightOffer, FlightSearchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Initialized,
    Pending,
    Confirmed,
    Failed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Initialized => "INITIALIZED",
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIALIZED" => Ok(BookingStatus::Initialized),
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "FAILED" => Ok(BookingStatus::Failed),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Successful,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Successful => "SUCCESSFUL",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "SUCCESSFUL" => Ok(PaymentStatus::Successful),
            "FAILED" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelerType {
    Adult,
    Child,
    HeldInfant,
    SeatedInfant,
}

impl TravelerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelerType::Adult => "ADULT",
            TravelerType::Child => "CHILD",
            TravelerType::HeldInfant => "HELD_INFANT",
            TravelerType::SeatedInfant => "SEATED_INFANT",
        }
    }
}

impl FromStr for TravelerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADULT" => Ok(TravelerType::Adult),
            "CHILD" => Ok(TravelerType::Child),
            "HELD_INFANT" => Ok(TravelerType::HeldInfant),
            "SEATED_INFANT" => Ok(TravelerType::SeatedInfant),
            other => Err(format!("unknown traveler type: {}", other)),
        }
    }
}

impl fmt::Display for TravelerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub country_dialing_code: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub client_ref: String,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub order_id: Option<String>,
    pub pnr: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Booking {
    pub fn initialized(customer_id: Uuid, client_ref: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            client_ref: client_ref.to_string(),
            booking_status: BookingStatus::Initialized,
            payment_status: PaymentStatus::Pending,
            order_id: None,
            pnr: None,
            created_at: now,
            modified_at: now,
        }
    }
}

/// Passenger on a booking. `traveler_id` is the provider's traveler pricing id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub traveler_id: String,
    pub traveler_type: TravelerType,
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
}

/// Booking with its customer and travelers, as returned to the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub customer: Customer,
    pub travelers: Vec<Traveler>,
}

/// Snapshot of the provider offer a shopper verified, keyed by client ref.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOffer {
    pub client_ref: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl StoredOffer {
    pub fn new(client_ref: &str, offer: &FlightOffer, now: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        Ok(Self {
            client_ref: client_ref.to_string(),
            payload: serde_json::to_value(offer)?,
            created_at: now,
        })
    }

    pub fn flight_offer(&self) -> Result<FlightOffer, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRequestRecord {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub request: serde_json::Value,
    pub departure_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FlightRequestRecord {
    pub fn search_request(&self) -> Result<FlightSearchRequest, serde_json::Error> {
        serde_json::from_value(self.request.clone())
    }
}

/// Current provider access token. There is only ever one row.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCredential {
    pub token_kind: Option<String>,
    pub username: Option<String>,
    pub client_id: Option<String>,
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
    pub state: Option<String>,
    pub scope: Option<String>,
    pub refreshed_at: DateTime<Utc>,
}

impl ProviderCredential {
    pub fn from_token(token: AccessToken, now: DateTime<Utc>) -> Self {
        Self {
            token_kind: token.token_kind,
            username: token.username,
            client_id: token.client_id,
            token_type: token.token_type,
            access_token: token.access_token,
            expires_in: token.expires_in,
            state: token.state,
            scope: token.scope,
            refreshed_at: now,
        }
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("client_id", &self.client_id)
            .field("token_type", &self.token_type)
            .field("access_token", &Masked::new(self.access_token.as_str()))
            .field("expires_in", &self.expires_in)
            .field("refreshed_at", &self.refreshed_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_strings() {
        for status in [
            BookingStatus::Initialized,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert_eq!("HELD_INFANT".parse::<TravelerType>(), Ok(TravelerType::HeldInfant));
        assert!("INFANT".parse::<TravelerType>().is_err());
    }

    #[test]
    fn test_new_booking_is_initialized_and_unpaid() {
        let booking = Booking::initialized(Uuid::new_v4(), "ref-1", Utc::now());
        assert_eq!(booking.booking_status, BookingStatus::Initialized);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(booking.pnr.is_none());
    }

    #[test]
    fn test_credential_debug_hides_token() {
        let credential = ProviderCredential::from_token(
            AccessToken {
                token_kind: None,
                username: None,
                application_name: None,
                client_id: Some("client".into()),
                token_type: "Bearer".into(),
                access_token: "secret-token-value".into(),
                expires_in: 1799,
                state: None,
                scope: None,
            },
            Utc::now(),
        );
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("secret-token-value"));
    }
}
