use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use wayfare_core::gds::{
    ErrorEnvelope, FlightOffersResponse, FlightOrderRequest, FlightOrderResponse,
    FlightSearchRequest, PricingRequest, PricingResponse,
};
use wayfare_core::provider::{FlightProvider, ProviderError};
use wayfare_core::repository::CredentialRepository;

use crate::config::{
    GdsConfig, CLIENT_REF_HEADER, FLIGHT_OFFERS_ENDPOINT, FLIGHT_ORDERS_ENDPOINT, PRICING_ENDPOINT,
};

pub struct GdsClient {
    http: reqwest::Client,
    config: GdsConfig,
    credentials: Arc<dyn CredentialRepository>,
}

impl GdsClient {
    pub fn new(
        config: GdsConfig,
        credentials: Arc<dyn CredentialRepository>,
    ) -> Result<Self, ProviderError> {
        let http = config.http_client().map_err(|e| ProviderError::Transport {
            endpoint: config.base_url.clone(),
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    async fn bearer_token(&self) -> Result<String, ProviderError> {
        match self.credentials.get_credential().await {
            Ok(Some(credential)) => Ok(credential.access_token),
            Ok(None) => Err(ProviderError::MissingCredential),
            Err(e) => {
                warn!("Failed to read provider credential: {}", e);
                Err(ProviderError::MissingCredential)
            }
        }
    }

    /// POSTs `body` as JSON and decodes a 2xx answer as `T`. Anything else
    /// becomes `Rejected`, carrying the provider's error envelope when the
    /// body has one.
    async fn post<B, T>(&self, endpoint: &str, client_ref: &str, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let token = self.bearer_token().await?;
        let url = self.config.url(endpoint);

        debug!("POST {} ({})", endpoint, client_ref);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(CLIENT_REF_HEADER, client_ref)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ProviderError::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let issues = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| envelope.errors)
                .unwrap_or_default();
            warn!(
                "Provider {} answered {} with {} issue(s)",
                endpoint,
                status.as_u16(),
                issues.len()
            );
            return Err(ProviderError::Rejected {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                issues,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl FlightProvider for GdsClient {
    async fn search_offers(
        &self,
        client_ref: &str,
        request: &FlightSearchRequest,
    ) -> Result<FlightOffersResponse, ProviderError> {
        self.post(FLIGHT_OFFERS_ENDPOINT, client_ref, request).await
    }

    async fn price_offers(
        &self,
        client_ref: &str,
        request: &PricingRequest,
    ) -> Result<PricingResponse, ProviderError> {
        self.post(PRICING_ENDPOINT, client_ref, request).await
    }

    async fn create_order(
        &self,
        client_ref: &str,
        request: &FlightOrderRequest,
    ) -> Result<FlightOrderResponse, ProviderError> {
        self.post(FLIGHT_ORDERS_ENDPOINT, client_ref, request).await
    }
}
