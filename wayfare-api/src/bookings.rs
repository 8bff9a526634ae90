use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use wayfare_core::booking::BookingDetails;
use wayfare_order::{CreateBookingRequest, InitializeBookingRequest, InitializedBooking};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FetchBookingQuery {
    pub id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flight-booking/initialize", post(initialize_booking))
        .route("/api/flight-booking/create", post(create_booking))
        .route("/api/flight-booking/fetch", get(fetch_booking))
}

/// POST /api/flight-booking/initialize
async fn initialize_booking(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<InitializeBookingRequest>,
) -> Result<(StatusCode, Json<InitializedBooking>), ApiError> {
    let result = state.bookings.initialize(&req).await;
    state.metrics.record_booking("initialize", &result);
    Ok((StatusCode::CREATED, Json(result?)))
}

/// POST /api/flight-booking/create
async fn create_booking(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingDetails>), ApiError> {
    let result = state.bookings.create(req.flight_booking_id).await;
    state.metrics.record_booking("create", &result);
    Ok((StatusCode::CREATED, Json(result?)))
}

/// GET /api/flight-booking/fetch?id=
async fn fetch_booking(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FetchBookingQuery>,
) -> Result<Json<BookingDetails>, ApiError> {
    let details = state.bookings.fetch(query.id).await?;
    Ok(Json(details))
}
