use serde::Deserialize;
use std::env;
use wayfare_core::gds::{Address, ContactInfo, PersonName, Phone};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub rate_limit: RateLimitConfig,
    pub provider: ProviderConfig,
    pub offers: OfferConfig,
    pub jobs: JobsConfig,
    pub agency: AgencyConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Without a URL the service keeps everything in memory.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Rate limiting is off without a URL.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub requests_per_window: i64,
    pub window_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct OfferConfig {
    pub ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    pub token_refresh_minutes: u64,
    pub offer_cleanup_minutes: u64,
    pub request_cleanup_hours: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    pub assets_dir: Option<String>,
}

/// Agency identity sent as the contact block and remark on every order.
#[derive(Debug, Deserialize, Clone)]
pub struct AgencyConfig {
    pub company_name: String,
    pub addressee_first_name: String,
    pub addressee_last_name: String,
    pub purpose: String,
    pub phone_country_code: String,
    pub phone_number: String,
    pub email: String,
    pub address_lines: Vec<String>,
    pub postal_code: String,
    pub city_name: String,
    pub country_code: String,
}

impl AgencyConfig {
    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            addressee_name: PersonName {
                first_name: self.addressee_first_name.clone(),
                last_name: self.addressee_last_name.clone(),
            },
            company_name: self.company_name.clone(),
            purpose: self.purpose.clone(),
            phones: vec![Phone {
                device_type: "MOBILE".to_string(),
                country_calling_code: self.phone_country_code.clone(),
                number: self.phone_number.clone(),
            }],
            email_address: self.email.clone(),
            address: Address {
                lines: self.address_lines.clone(),
                postal_code: self.postal_code.clone(),
                city_name: self.city_name.clone(),
                country_code: self.country_code.clone(),
            },
        }
    }

    pub fn remark(&self) -> String {
        format!("ONLINE BOOKING FROM {}", self.company_name.to_uppercase())
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layers `{dir}/default`, `{dir}/{RUN_MODE}`, `{dir}/local` and
    /// `WAYFARE__*` environment variables, later sources winning.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // e.g. `WAYFARE__PROVIDER__CLIENT_SECRET=...`
            .add_source(config::Environment::with_prefix("WAYFARE").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the service cannot run with, such as a zero job interval.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let intervals = [
            ("jobs.token_refresh_minutes", self.jobs.token_refresh_minutes),
            ("jobs.offer_cleanup_minutes", self.jobs.offer_cleanup_minutes),
            ("jobs.request_cleanup_hours", self.jobs.request_cleanup_hours),
        ];
        for (key, value) in intervals {
            if value == 0 {
                return Err(config::ConfigError::Message(format!("{} must be positive", key)));
            }
        }

        if self.offers.ttl_minutes <= 0 {
            return Err(config::ConfigError::Message(
                "offers.ttl_minutes must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
