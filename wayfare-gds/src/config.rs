use std::time::Duration;

pub const TOKEN_ENDPOINT: &str = "/v1/security/oauth2/token";
pub const FLIGHT_OFFERS_ENDPOINT: &str = "/v2/shopping/flight-offers";
pub const PRICING_ENDPOINT: &str = "/v1/shopping/flight-offers/pricing";
pub const FLIGHT_ORDERS_ENDPOINT: &str = "/v1/booking/flight-orders";

/// Correlates search, pricing and order calls on the provider side.
pub const CLIENT_REF_HEADER: &str = "ama-client-ref";

#[derive(Debug, Clone)]
pub struct GdsConfig {
    /// e.g. `https://test.api.amadeus.com`
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout_secs: u64,
}

impl GdsConfig {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = GdsConfig::new("https://test.api.amadeus.com/", "id", "secret");
        assert_eq!(
            config.url(FLIGHT_OFFERS_ENDPOINT),
            "https://test.api.amadeus.com/v2/shopping/flight-offers"
        );
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.with_timeout(5).timeout_secs, 5);
    }
}
