pub mod booking;
pub mod gds;
pub mod provider;
pub mod repository;
pub mod search;

pub const UNKNOWN_ERROR: &str = "An unknown error has occurred";

/// Outcome of every shopping and booking operation.
///
/// Each variant carries what the HTTP layer needs to render a problem
/// response: a title, a status code and a human readable detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{title}: {detail}")]
    Provider {
        title: String,
        status: u16,
        detail: String,
    },
    #[error("{0}")]
    System(String),
}

impl CoreError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(detail.into())
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(detail.into())
    }

    /// Logs the underlying cause and returns a generic system error.
    pub fn system<E: std::fmt::Display>(context: &str, err: E) -> Self {
        tracing::error!("{}: {}", context, err);
        Self::System(UNKNOWN_ERROR.to_string())
    }

    pub fn title(&self) -> &str {
        match self {
            Self::BadRequest(_) => "BAD REQUEST",
            Self::NotFound(_) => "NOT FOUND",
            Self::Provider { title, .. } => title,
            Self::System(_) => "SYSTEM ERROR",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Provider { status, .. } => *status,
            Self::System(_) => 500,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::BadRequest(detail) | Self::NotFound(detail) | Self::System(detail) => detail,
            Self::Provider { detail, .. } => detail,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_and_statuses() {
        let err = CoreError::bad_request("At least one adult is required for a trip");
        assert_eq!(err.title(), "BAD REQUEST");
        assert_eq!(err.status(), 400);
        assert_eq!(err.detail(), "At least one adult is required for a trip");

        assert_eq!(CoreError::not_found("Booking not found").status(), 404);

        let system = CoreError::system("db", "connection refused");
        assert_eq!(system.title(), "SYSTEM ERROR");
        assert_eq!(system.detail(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_provider_error_keeps_provider_title() {
        let err = CoreError::Provider {
            title: "SEGMENT SELL FAILURE".into(),
            status: 400,
            detail: "Could not sell segment 1".into(),
        };
        assert_eq!(err.title(), "SEGMENT SELL FAILURE");
        assert_eq!(err.status(), 400);
    }
}
