//! Prometheus counters for HTTP traffic and booking-engine outcomes.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::state::AppState;

#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    searches_total: IntCounterVec,
    price_verifications_total: IntCounterVec,
    bookings_total: IntCounterVec,
}

impl ApiMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("wayfare_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "wayfare_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let searches_total = IntCounterVec::new(
            Opts::new("wayfare_flight_searches_total", "Flight offer searches by outcome"),
            &["outcome"],
        )
        .expect("metric can be created");

        let price_verifications_total = IntCounterVec::new(
            Opts::new(
                "wayfare_price_verifications_total",
                "Offer price verifications by outcome",
            ),
            &["outcome"],
        )
        .expect("metric can be created");

        let bookings_total = IntCounterVec::new(
            Opts::new("wayfare_bookings_total", "Booking operations by stage and outcome"),
            &["stage", "outcome"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(searches_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(price_verifications_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(bookings_total.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                searches_total,
                price_verifications_total,
                bookings_total,
            }),
        }
    }

    pub fn record_search<T, E>(&self, result: &Result<T, E>) {
        self.inner
            .searches_total
            .with_label_values(&[outcome(result)])
            .inc();
    }

    pub fn record_price_verification<T, E>(&self, result: &Result<T, E>) {
        self.inner
            .price_verifications_total
            .with_label_values(&[outcome(result)])
            .inc();
    }

    pub fn record_booking<T, E>(&self, stage: &str, result: &Result<T, E>) {
        self.inner
            .bookings_total
            .with_label_values(&[stage, outcome(result)])
            .inc();
    }

    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Prometheus text exposition of every registered metric.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.inner.registry.gather(), &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer).map_err(|e| format!("metrics are not UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn outcome<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "failure"
    }
}

/// Records count and latency per route template, so ids in query strings
/// never become labels.
pub async fn track_metrics(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    state.metrics.record_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counters_are_exported() {
        let metrics = ApiMetrics::new();
        metrics.record_search::<(), ()>(&Ok(()));
        metrics.record_booking::<(), ()>("create", &Err(()));

        let text = metrics.gather_and_encode().unwrap();
        assert!(text.contains("wayfare_flight_searches_total{outcome=\"success\"} 1"));
        assert!(text.contains("wayfare_bookings_total{"));
        assert!(text.contains("stage=\"create\""));
    }
}
