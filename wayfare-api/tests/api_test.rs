use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wayfare_api::{app, metrics::ApiMetrics, AppState};
use wayfare_catalog::ReferenceCatalog;
use wayfare_core::gds::{
    Address, ContactInfo, FlightOffer, FlightOffersResponse, FlightOrderRequest,
    FlightOrderResponse, FlightSearchRequest, PersonName, PricingRequest, PricingResponse,
};
use wayfare_core::provider::{FlightProvider, ProviderError};
use wayfare_offer::{OfferExpiryPolicy, ShoppingService};
use wayfare_order::{AgencyProfile, BookingLifecycle};
use wayfare_store::app_config::RateLimitConfig;
use wayfare_store::InMemoryStore;

fn offer() -> FlightOffer {
    serde_json::from_value(json!({
        "type": "flight-offer",
        "id": "1",
        "source": "GDS",
        "itineraries": [{
            "duration": "PT6H30M",
            "segments": [{
                "departure": { "iataCode": "LOS", "at": "2024-02-27T23:15:00" },
                "arrival": { "iataCode": "LHR", "at": "2024-02-28T05:45:00" },
                "carrierCode": "BA",
                "number": "74",
                "duration": "PT6H30M",
                "id": "1",
                "numberOfStops": 0
            }]
        }],
        "price": { "currency": "USD", "total": "850.00" },
        "travelerPricings": [{
            "travelerId": "1",
            "fareOption": "STANDARD",
            "travelerType": "ADULT",
            "price": { "currency": "USD", "total": "850.00" }
        }]
    }))
    .unwrap()
}

struct StubProvider;

#[async_trait]
impl FlightProvider for StubProvider {
    async fn search_offers(
        &self,
        _client_ref: &str,
        _request: &FlightSearchRequest,
    ) -> Result<FlightOffersResponse, ProviderError> {
        Ok(FlightOffersResponse {
            meta: None,
            data: vec![offer()],
            dictionaries: None,
        })
    }

    async fn price_offers(
        &self,
        _client_ref: &str,
        request: &PricingRequest,
    ) -> Result<PricingResponse, ProviderError> {
        Ok(serde_json::from_value(json!({
            "data": {
                "type": "flight-offers-pricing",
                "flightOffers": request.data.flight_offers
            }
        }))
        .unwrap())
    }

    async fn create_order(
        &self,
        _client_ref: &str,
        _request: &FlightOrderRequest,
    ) -> Result<FlightOrderResponse, ProviderError> {
        Ok(serde_json::from_value(json!({
            "data": {
                "type": "flight-order",
                "id": "eJzTd9f",
                "associatedRecords": [{ "reference": "QWERTY" }]
            }
        }))
        .unwrap())
    }
}

fn test_app() -> axum::Router {
    let store = Arc::new(InMemoryStore::new());
    let provider = Arc::new(StubProvider);
    let agency = AgencyProfile::new(
        ContactInfo {
            addressee_name: PersonName {
                first_name: "PETE".to_string(),
                last_name: "MOSS".to_string(),
            },
            company_name: "ULTIMATE TRAVELS".to_string(),
            purpose: "STANDARD".to_string(),
            phones: vec![],
            email_address: "info@ultimatetravels.com".to_string(),
            address: Address {
                lines: vec![],
                postal_code: "100218".to_string(),
                city_name: "LAGOS".to_string(),
                country_code: "NG".to_string(),
            },
        },
        "ONLINE BOOKING FROM ULTIMATE TRAVELS",
    );

    let shopping = ShoppingService::new(
        provider.clone(),
        store.clone(),
        store.clone(),
        Arc::new(ReferenceCatalog::embedded().unwrap()),
    );
    let bookings = BookingLifecycle::new(
        store.clone(),
        store,
        provider,
        OfferExpiryPolicy::default(),
        agency,
    );

    app(AppState {
        shopping: Arc::new(shopping),
        bookings: Arc::new(bookings),
        redis: None,
        rate_limit: RateLimitConfig {
            requests_per_window: 100,
            window_seconds: 60,
        },
        metrics: ApiMetrics::new(),
    })
}

fn search_form() -> Value {
    json!({
        "routeModel": 1,
        "flightCabin": "ECONOMY",
        "travelers": { "numberOfAdults": 1 },
        "oneWay": {
            "originLocation": "LOS",
            "destinationLocation": "LHR",
            "departureDate": "2024-02-27"
        }
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_persist_request_returns_created_id() {
    let response = test_app()
        .oneshot(post_json("/api/flight-request/persist", &search_form()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(Uuid::parse_str(body["requestId"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_invalid_search_is_problem_response() {
    let mut form = search_form();
    form["travelers"]["numberOfAdults"] = json!(0);

    let response = test_app()
        .oneshot(post_json("/api/flight-offers/fetch", &form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let body = body_json(response).await;
    assert_eq!(body["title"], "BAD REQUEST");
    assert_eq!(body["status"], 400);
    assert_eq!(body["detail"], "At least one adult is required for a trip");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/flight-offers/fetch")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["title"], "BAD REQUEST");
}

#[tokio::test]
async fn test_unknown_request_id_is_not_found() {
    let uri = format!("/api/flight-offers/fetch?requestId={}", Uuid::new_v4());
    let response = test_app().oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["title"], "NOT FOUND");
    assert_eq!(body["detail"], "Flight request not found");
}

#[tokio::test]
async fn test_search_to_confirmed_booking() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/flight-offers/fetch", &search_form()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let offers = body_json(response).await;
    let selected = offers["flightOffers"][0].clone();
    let client_ref = selected["amaClientRef"].as_str().unwrap().to_string();
    assert_eq!(selected["durationInMinutes"], 390);

    let response = app
        .clone()
        .oneshot(post_json("/api/flight-offers-pricing/verify", &selected))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let initialize = json!({
        "amaClientRef": client_ref,
        "travelerCredentials": [{
            "id": "1",
            "type": "ADULT",
            "title": "MR",
            "firstName": "Emeka",
            "lastName": "Okafor",
            "gender": "male",
            "dateOfBirth": "1988-09-14"
        }],
        "travelerContact": {
            "email": "emeka@example.com",
            "phone": "8021234567",
            "countryDialingCode": "234",
            "firstName": "Emeka",
            "lastName": "Okafor"
        }
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/flight-booking/initialize", &initialize))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking_id = body_json(response).await["flightBookingId"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/flight-booking/fetch?id={}", booking_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let create = json!({ "flightBookingId": booking_id });
    let response = app
        .clone()
        .oneshot(post_json("/api/flight-booking/create", &create))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking = body_json(response).await;
    assert_eq!(booking["bookingStatus"], "CONFIRMED");
    assert_eq!(booking["pnr"], "QWERTY");

    let response = app
        .clone()
        .oneshot(post_json("/api/flight-booking/create", &create))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/flight-booking/fetch?id={}", booking_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["travelers"][0]["firstName"], "Emeka");
    assert_eq!(fetched["customer"]["email"], "emeka@example.com");

    let response = app.oneshot(get("/metrics")).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("wayfare_flight_searches_total"));
    assert!(text.contains("wayfare_bookings_total"));
}
