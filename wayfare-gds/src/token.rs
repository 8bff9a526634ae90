use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use wayfare_core::booking::ProviderCredential;
use wayfare_core::gds::{AccessToken, AuthorizationError};
use wayfare_core::repository::CredentialRepository;

use crate::config::{GdsConfig, TOKEN_ENDPOINT};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Transport(String),

    #[error("token request rejected with status {status}")]
    Rejected { status: u16, error: AuthorizationError },

    #[error("could not decode token response: {0}")]
    Decode(String),

    #[error("could not store credential: {0}")]
    Store(String),
}

/// Fetches a client-credentials token and stores it as the current
/// credential. A failed refresh leaves the stored credential untouched.
pub struct TokenService {
    http: reqwest::Client,
    config: GdsConfig,
    credentials: Arc<dyn CredentialRepository>,
}

impl TokenService {
    pub fn new(
        config: GdsConfig,
        credentials: Arc<dyn CredentialRepository>,
    ) -> Result<Self, TokenError> {
        let http = config
            .http_client()
            .map_err(|e| TokenError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    pub async fn refresh(&self) -> Result<ProviderCredential, TokenError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.config.url(TOKEN_ENDPOINT))
            .form(&form)
            .send()
            .await
            .map_err(|e| TokenError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TokenError::Transport(e.to_string()))?;

        if !status.is_success() {
            let auth_error: AuthorizationError = serde_json::from_slice(&bytes).unwrap_or_default();
            error!(
                "Token request failed: title={:?} error={:?} description={:?} code={:?}",
                auth_error.title, auth_error.error, auth_error.error_description, auth_error.code
            );
            return Err(TokenError::Rejected {
                status: status.as_u16(),
                error: auth_error,
            });
        }

        let token: AccessToken =
            serde_json::from_slice(&bytes).map_err(|e| TokenError::Decode(e.to_string()))?;
        let credential = ProviderCredential::from_token(token, Utc::now());

        self.credentials
            .save_credential(&credential)
            .await
            .map_err(|e| TokenError::Store(e.to_string()))?;

        info!("Provider credential refreshed, expires in {}s", credential.expires_in);
        Ok(credential)
    }
}
