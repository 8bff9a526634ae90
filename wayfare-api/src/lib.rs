use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod shopping;
pub mod state;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::USER_AGENT]);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .merge(shopping::routes())
        .merge(bookings::routes())
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), metrics::track_metrics))
        .layer(cors)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.gather_and_encode() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("{}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Fixed-window limit per client IP. Requests pass when Redis is not
/// configured, the peer address is unknown, or Redis errors.
async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (Some(redis), Some(ConnectInfo(addr))) = (
        state.redis.as_ref(),
        req.extensions().get::<ConnectInfo<SocketAddr>>().copied(),
    ) else {
        return next.run(req).await;
    };

    let key = format!("ratelimit:{}", addr.ip());
    let limit = state.rate_limit.requests_per_window;
    let window = state.rate_limit.window_seconds;

    match redis.check_rate_limit(&key, limit, window).await {
        Ok(true) => next.run(req).await,
        Ok(false) => error::ApiError::TooManyRequests.into_response(),
        Err(e) => {
            // Fail open
            tracing::warn!("Rate limit check failed: {}", e);
            next.run(req).await
        }
    }
}
