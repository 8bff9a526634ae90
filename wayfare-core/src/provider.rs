use async_trait::async_trait;

use crate::gds::{
    FlightOffersResponse, FlightOrderRequest, FlightOrderResponse, FlightSearchRequest, Issue,
    PricingRequest, PricingResponse,
};
use crate::{CoreError, UNKNOWN_ERROR};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("provider rejected {endpoint} with status {status}")]
    Rejected {
        endpoint: String,
        status: u16,
        issues: Vec<Issue>,
    },

    #[error("could not decode provider response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("no provider credential available")]
    MissingCredential,
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected { status, issues, .. } if !issues.is_empty() => {
                let issue = &issues[0];
                CoreError::Provider {
                    title: issue.title.clone().unwrap_or_else(|| "SYSTEM ERROR".to_string()),
                    status: issue.status.unwrap_or(status),
                    detail: issue.detail.clone().unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                }
            }
            other => {
                tracing::error!("Flight provider call failed: {}", other);
                CoreError::System(UNKNOWN_ERROR.to_string())
            }
        }
    }
}

/// The external GDS. Every call carries the client ref used to correlate
/// search, pricing and booking on the provider's side.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search_offers(
        &self,
        client_ref: &str,
        request: &FlightSearchRequest,
    ) -> Result<FlightOffersResponse, ProviderError>;

    async fn price_offers(
        &self,
        client_ref: &str,
        request: &PricingRequest,
    ) -> Result<PricingResponse, ProviderError>;

    async fn create_order(
        &self,
        client_ref: &str,
        request: &FlightOrderRequest,
    ) -> Result<FlightOrderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_issue_becomes_provider_error() {
        let err = ProviderError::Rejected {
            endpoint: "/v1/booking/flight-orders".into(),
            status: 400,
            issues: vec![
                Issue {
                    status: Some(400),
                    code: Some(34651),
                    title: Some("SEGMENT SELL FAILURE".into()),
                    detail: Some("Could not sell segment 1".into()),
                    source: None,
                },
                Issue::default(),
            ],
        };

        let core: CoreError = err.into();
        assert_eq!(
            core,
            CoreError::Provider {
                title: "SEGMENT SELL FAILURE".into(),
                status: 400,
                detail: "Could not sell segment 1".into(),
            }
        );
    }

    #[test]
    fn test_unstructured_failure_is_system_error() {
        let err = ProviderError::Rejected {
            endpoint: "/v2/shopping/flight-offers".into(),
            status: 502,
            issues: vec![],
        };
        let core: CoreError = err.into();
        assert_eq!(core.title(), "SYSTEM ERROR");
        assert_eq!(core.status(), 500);
        assert_eq!(core.detail(), UNKNOWN_ERROR);
    }
}
