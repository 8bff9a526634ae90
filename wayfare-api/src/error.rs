use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use wayfare_core::CoreError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded")]
    TooManyRequests,
}

#[derive(Debug, Serialize)]
pub struct Problem {
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl ApiError {
    fn problem(&self) -> Problem {
        match self {
            ApiError::Core(err) => Problem {
                title: err.title().to_string(),
                status: err.status(),
                detail: err.detail().to_string(),
            },
            ApiError::InvalidRequest(detail) => Problem {
                title: "BAD REQUEST".to_string(),
                status: 400,
                detail: detail.clone(),
            },
            ApiError::TooManyRequests => Problem {
                title: "TOO MANY REQUESTS".to_string(),
                status: 429,
                detail: self.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = self.problem();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!("{}: {}", problem.title, problem.detail);
        }

        (
            status,
            [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            Json(problem),
        )
            .into_response()
    }
}

/// Renders a handler panic as a SYSTEM ERROR problem.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let cause = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    ApiError::from(CoreError::system("Handler panicked", cause)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_problem_keeps_provider_title() {
        let err = ApiError::from(CoreError::Provider {
            title: "INVALID DATA RECEIVED".to_string(),
            status: 400,
            detail: "Traveler name is missing".to_string(),
        });

        let problem = err.problem();
        assert_eq!(problem.title, "INVALID DATA RECEIVED");
        assert_eq!(problem.status, 400);
    }

    #[test]
    fn test_out_of_range_status_falls_back_to_500() {
        let response = ApiError::from(CoreError::Provider {
            title: "ODD".to_string(),
            status: 42,
            detail: "odd".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_system_problem() {
        use axum::{body::Body, http::Request, routing::get, Router};
        use http_body_util::BodyExt;
        use tower::ServiceExt;
        use tower_http::catch_panic::CatchPanicLayer;

        async fn explode() -> &'static str {
            panic!("offer cache poisoned")
        }

        let app = Router::new()
            .route("/explode", get(explode))
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_CONTENT_TYPE
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let problem: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem["title"], "SYSTEM ERROR");
        assert_eq!(problem["status"], 500);
        assert_eq!(problem["detail"], "An unknown error has occurred");
    }
}
