//! Wire shapes exchanged with the flight provider.
//!
//! Everything serializes as camelCase with absent optionals omitted, which
//! is what the provider expects on requests and returns on responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::booking::TravelerType;
use crate::search::Cabin;

// ============================================================================
// Flight offers search
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    pub currency_code: String,
    pub origin_destinations: Vec<OriginDestination>,
    pub travelers: Vec<SearchTraveler>,
    pub sources: Vec<String>,
    pub search_criteria: SearchCriteria,
}

impl FlightSearchRequest {
    /// Departure date of the first leg, as submitted (`yyyy-MM-dd`).
    pub fn first_departure_date(&self) -> Option<&str> {
        self.origin_destinations
            .first()
            .map(|leg| leg.departure_date_time_range.date.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginDestination {
    pub id: String,
    pub origin_location_code: String,
    pub destination_location_code: String,
    pub departure_date_time_range: DepartureDateTimeRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureDateTimeRange {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTraveler {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_adult_id: Option<String>,
    pub traveler_type: TravelerType,
    pub fare_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub max_flight_offers: u32,
    pub flight_filters: FlightFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightFilters {
    pub cabin_restrictions: Vec<CabinRestriction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_restriction: Option<ConnectionRestriction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinRestriction {
    pub cabin: Cabin,
    pub coverage: String,
    pub origin_destination_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRestriction {
    pub max_number_of_connections: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub data: Vec<FlightOffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionaries: Option<Dictionaries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub count: u32,
}

// ============================================================================
// Flight offer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(rename = "type")]
    pub offer_type: String,
    pub id: String,
    pub source: String,
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
    pub itineraries: Vec<Itinerary>,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_options: Option<PricingOptions>,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
    #[serde(default)]
    pub traveler_pricings: Vec<TravelerPricing>,
}

impl FlightOffer {
    pub fn traveler_pricing(&self, traveler_id: &str) -> Option<&TravelerPricing> {
        self.traveler_pricings
            .iter()
            .find(|pricing| pricing.traveler_id == traveler_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    pub carrier_code: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<Aircraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating: Option<Operating>,
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
pub struct SegmentEndpoint {
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operating {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub currency: String,
    pub total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fees: Vec<ChargeItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_services: Vec<ChargeItem>,
}

/// Fee or additional service line on a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeItem {
    pub amount: String,
    #[serde(rename = "type")]
    pub charge_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOptions {
    #[serde(default)]
    pub fare_type: Vec<String>,
    #[serde(default)]
    pub included_checked_bags_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerPricing {
    pub traveler_id: String,
    pub fare_option: String,
    pub traveler_type: String,
    pub price: TravelerPrice,
    #[serde(default)]
    pub fare_details_by_segment: Vec<FareDetailsBySegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerPrice {
    pub currency: String,
    pub total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareDetailsBySegment {
    pub segment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare_basis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branded_fare: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branded_fare_label: Option<String>,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub booking_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_checked_bags: Option<IncludedCheckedBags>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<Amenity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedCheckedBags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub description: String,
    #[serde(default)]
    pub is_chargeable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenity_provider: Option<AmenityProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityProvider {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dictionaries {
    #[serde(default)]
    pub locations: HashMap<String, LocationEntry>,
    #[serde(default)]
    pub aircraft: HashMap<String, String>,
    #[serde(default)]
    pub currencies: HashMap<String, String>,
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

// ============================================================================
// Price verification
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub data: PricingRequestData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequestData {
    #[serde(rename = "type")]
    pub request_type: String,
    pub flight_offers: Vec<FlightOffer>,
}

impl PricingRequest {
    pub fn for_offer(offer: FlightOffer) -> Self {
        Self {
            data: PricingRequestData {
                request_type: "flight-offers-pricing".to_string(),
                flight_offers: vec![offer],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResponse {
    pub data: PricingResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionaries: Option<Dictionaries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    #[serde(rename = "type")]
    pub result_type: String,
    #[serde(default)]
    pub flight_offers: Vec<FlightOffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_requirements: Option<BookingRequirements>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequirements {
    #[serde(default)]
    pub email_address_required: bool,
    #[serde(default)]
    pub mobile_phone_number_required: bool,
}

// ============================================================================
// Flight order
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOrderRequest {
    pub data: FlightOrderData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOrderData {
    #[serde(rename = "type")]
    pub order_type: String,
    pub flight_offers: Vec<FlightOffer>,
    pub travelers: Vec<OrderTraveler>,
    pub remarks: Remarks,
    pub ticketing_agreement: TicketingAgreement,
    pub contacts: Vec<ContactInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTraveler {
    pub id: String,
    pub date_of_birth: String,
    pub name: PersonName,
    pub gender: String,
    pub contact: TravelerContactInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerContactInfo {
    pub email_address: String,
    pub phones: Vec<Phone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub device_type: String,
    pub country_calling_code: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remarks {
    pub general: Vec<GeneralRemark>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralRemark {
    pub sub_type: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketingAgreement {
    pub option: String,
    pub delay: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub addressee_name: PersonName,
    pub company_name: String,
    pub purpose: String,
    pub phones: Vec<Phone>,
    pub email_address: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub lines: Vec<String>,
    pub postal_code: String,
    pub city_name: String,
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOrderResponse {
    #[serde(default)]
    pub warnings: Vec<Issue>,
    pub data: FlightOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOrder {
    #[serde(rename = "type")]
    pub order_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queuing_office_id: Option<String>,
    #[serde(default)]
    pub associated_records: Vec<AssociatedRecord>,
    #[serde(default)]
    pub flight_offers: Vec<FlightOffer>,
}

impl FlightOrder {
    /// Record locator of the first associated record.
    pub fn pnr(&self) -> Option<&str> {
        self.associated_records
            .first()
            .map(|record| record.reference.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedRecord {
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_system_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_offer_id: Option<String>,
}

// ============================================================================
// Errors and authorization
// ============================================================================

/// One entry of the provider's `{ "errors": [...] }` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<IssueSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<Issue>,
}

/// Client-credentials grant response. Field names are snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "type", default)]
    pub token_kind: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub application_name: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_offer() -> serde_json::Value {
        json!({
            "type": "flight-offer",
            "id": "1",
            "source": "GDS",
            "instantTicketingRequired": false,
            "nonHomogeneous": false,
            "oneWay": false,
            "lastTicketingDate": "2024-02-20",
            "numberOfBookableSeats": 9,
            "itineraries": [{
                "duration": "PT6H35M",
                "segments": [{
                    "departure": { "iataCode": "LOS", "terminal": "I", "at": "2024-02-27T23:15:00" },
                    "arrival": { "iataCode": "LHR", "terminal": "5", "at": "2024-02-28T05:50:00" },
                    "carrierCode": "BA",
                    "number": "76",
                    "aircraft": { "code": "789" },
                    "operating": { "carrierCode": "BA" },
                    "duration": "PT6H35M",
                    "id": "1",
                    "numberOfStops": 0,
                    "blacklistedInEU": false
                }]
            }],
            "price": {
                "currency": "USD",
                "total": "912.40",
                "base": "410.00",
                "fees": [{ "amount": "0.00", "type": "SUPPLIER" }],
                "grandTotal": "912.40"
            },
            "pricingOptions": { "fareType": ["PUBLISHED"], "includedCheckedBagsOnly": true },
            "validatingAirlineCodes": ["BA"],
            "travelerPricings": [{
                "travelerId": "1",
                "fareOption": "STANDARD",
                "travelerType": "ADULT",
                "price": { "currency": "USD", "total": "912.40", "base": "410.00" },
                "fareDetailsBySegment": [{
                    "segmentId": "1",
                    "cabin": "ECONOMY",
                    "fareBasis": "OLN0Z9B3",
                    "class": "O",
                    "includedCheckedBags": { "quantity": 2 }
                }]
            }]
        })
    }

    #[test]
    fn test_offer_wire_names() {
        let offer: FlightOffer = serde_json::from_value(sample_offer()).unwrap();
        assert_eq!(offer.itineraries[0].segments[0].departure.terminal.as_deref(), Some("I"));
        assert_eq!(
            offer.traveler_pricings[0].fare_details_by_segment[0].booking_class.as_deref(),
            Some("O")
        );
        assert!(offer.traveler_pricing("1").is_some());
        assert!(offer.traveler_pricing("2").is_none());

        let value = serde_json::to_value(&offer).unwrap();
        assert_eq!(value["itineraries"][0]["segments"][0]["blacklistedInEU"], json!(false));
        assert_eq!(value["price"]["fees"][0]["type"], json!("SUPPLIER"));
        assert!(value.get("lastTicketingDateTime").is_none());
    }

    #[test]
    fn test_order_response_pnr() {
        let response: FlightOrderResponse = serde_json::from_value(json!({
            "data": {
                "type": "flight-order",
                "id": "eJzTd9f3NjIJdzUGAAp%2fAiY=",
                "queuingOfficeId": "LOSN828HJ",
                "associatedRecords": [{
                    "reference": "2ZYVJ4",
                    "creationDate": "2024-01-20T10:01:00.000",
                    "originSystemCode": "GDS",
                    "flightOfferId": "1"
                }]
            }
        }))
        .unwrap();

        assert_eq!(response.data.pnr(), Some("2ZYVJ4"));
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn test_access_token_snake_case() {
        let token: AccessToken = serde_json::from_value(json!({
            "type": "amadeusOAuth2Token",
            "username": "ops@example.com",
            "application_name": "wayfare",
            "client_id": "abc",
            "token_type": "Bearer",
            "access_token": "tok",
            "expires_in": 1799,
            "state": "approved",
            "scope": ""
        }))
        .unwrap();
        assert_eq!(token.token_kind.as_deref(), Some("amadeusOAuth2Token"));
        assert_eq!(token.expires_in, 1799);
    }
}
