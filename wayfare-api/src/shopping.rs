use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use wayfare_core::search::FlightSearchForm;
use wayfare_offer::{FlightOfferDetail, FlightOffersResult, PersistedRequest};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOffersQuery {
    pub request_id: Uuid,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flight-request/persist", post(persist_request))
        .route(
            "/api/flight-offers/fetch",
            post(fetch_offers).get(fetch_offers_for_request),
        )
        .route("/api/flight-offers-pricing/verify", post(verify_price))
}

/// POST /api/flight-request/persist
async fn persist_request(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<FlightSearchForm>,
) -> Result<(StatusCode, Json<PersistedRequest>), ApiError> {
    let persisted = state.shopping.persist_request(&form).await?;
    Ok((StatusCode::CREATED, Json(persisted)))
}

/// GET /api/flight-offers/fetch?requestId=
async fn fetch_offers_for_request(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FetchOffersQuery>,
) -> Result<(StatusCode, Json<FlightOffersResult>), ApiError> {
    info!("Fetching offers for stored request {}", query.request_id);
    let result = state.shopping.fetch_offers_for_request(query.request_id).await;
    state.metrics.record_search(&result);
    Ok((StatusCode::CREATED, Json(result?)))
}

/// POST /api/flight-offers/fetch
async fn fetch_offers(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<FlightSearchForm>,
) -> Result<(StatusCode, Json<FlightOffersResult>), ApiError> {
    let result = state.shopping.fetch_offers(&form).await;
    state.metrics.record_search(&result);
    Ok((StatusCode::CREATED, Json(result?)))
}

/// POST /api/flight-offers-pricing/verify
async fn verify_price(
    State(state): State<AppState>,
    ApiJson(offer): ApiJson<FlightOfferDetail>,
) -> Result<Json<FlightOfferDetail>, ApiError> {
    let result = state.shopping.verify_price(offer).await;
    state.metrics.record_price_verification(&result);
    Ok(Json(result?))
}
