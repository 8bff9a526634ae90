use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfare_api::{app, metrics::ApiMetrics, worker, AppState};
use wayfare_catalog::ReferenceCatalog;
use wayfare_core::repository::{
    BookingRepository, CredentialRepository, FlightRequestRepository, OfferRepository,
};
use wayfare_gds::{GdsClient, GdsConfig, TokenService};
use wayfare_offer::{OfferExpiryPolicy, ShoppingService};
use wayfare_order::{AgencyProfile, BookingLifecycle};
use wayfare_store::app_config::Config;
use wayfare_store::{
    DbClient, InMemoryStore, PgBookingRepository, PgCredentialRepository,
    PgFlightRequestRepository, PgOfferRepository, RedisClient,
};

struct Repositories {
    bookings: Arc<dyn BookingRepository>,
    offers: Arc<dyn OfferRepository>,
    requests: Arc<dyn FlightRequestRepository>,
    credentials: Arc<dyn CredentialRepository>,
}

async fn repositories(config: &Config) -> anyhow::Result<Repositories> {
    match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;

            Ok(Repositories {
                bookings: Arc::new(PgBookingRepository::new(db.pool.clone())),
                offers: Arc::new(PgOfferRepository::new(db.pool.clone())),
                requests: Arc::new(PgFlightRequestRepository::new(db.pool.clone())),
                credentials: Arc::new(PgCredentialRepository::new(db.pool)),
            })
        }
        None => {
            tracing::warn!("No database configured, keeping all state in memory");
            let store = Arc::new(InMemoryStore::new());
            Ok(Repositories {
                bookings: store.clone(),
                offers: store.clone(),
                requests: store.clone(),
                credentials: store,
            })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfare_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Wayfare API on port {}", config.server.port);

    let repos = repositories(&config).await?;

    let catalog = match &config.catalog.assets_dir {
        Some(dir) => ReferenceCatalog::load_dir(Path::new(dir)),
        None => ReferenceCatalog::embedded(),
    }
    .context("Failed to load reference data")?;

    let gds_config = GdsConfig::new(
        config.provider.base_url.clone(),
        config.provider.client_id.clone(),
        config.provider.client_secret.clone(),
    )
    .with_timeout(config.provider.timeout_secs);

    let provider = Arc::new(
        GdsClient::new(gds_config.clone(), repos.credentials.clone())
            .context("Failed to build provider client")?,
    );
    let tokens = Arc::new(
        TokenService::new(gds_config, repos.credentials.clone())
            .context("Failed to build token service")?,
    );

    let redis = match &config.redis.url {
        Some(url) => Some(Arc::new(
            RedisClient::new(url).await.context("Failed to connect to Redis")?,
        )),
        None => {
            tracing::warn!("No Redis configured, rate limiting is disabled");
            None
        }
    };

    let expiry = OfferExpiryPolicy::new(config.offers.ttl_minutes);
    let agency = AgencyProfile::new(config.agency.contact(), config.agency.remark());

    let shopping = ShoppingService::new(
        provider.clone(),
        repos.requests.clone(),
        repos.offers.clone(),
        Arc::new(catalog),
    );
    let bookings = BookingLifecycle::new(
        repos.bookings.clone(),
        repos.offers.clone(),
        provider,
        expiry,
        agency,
    );

    worker::spawn_jobs(
        &config.jobs,
        tokens,
        repos.offers.clone(),
        repos.requests.clone(),
        expiry,
    );

    let app_state = AppState {
        shopping: Arc::new(shopping),
        bookings: Arc::new(bookings),
        redis,
        rate_limit: config.rate_limit.clone(),
        metrics: ApiMetrics::new(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
