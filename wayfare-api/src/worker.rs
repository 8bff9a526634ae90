use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{error, info};
use wayfare_core::repository::{FlightRequestRepository, OfferRepository, RepoResult};
use wayfare_gds::TokenService;
use wayfare_offer::OfferExpiryPolicy;
use wayfare_store::app_config::JobsConfig;

/// Deletes stored offers that have outlived the TTL.
pub async fn prune_offers(
    offers: &dyn OfferRepository,
    expiry: &OfferExpiryPolicy,
    now: DateTime<Utc>,
) -> RepoResult<u64> {
    offers.delete_offers_created_before(expiry.cutoff(now)).await
}

/// Deletes persisted searches whose first departure is already in the past.
pub async fn prune_requests(
    requests: &dyn FlightRequestRepository,
    today: NaiveDate,
) -> RepoResult<u64> {
    requests.delete_requests_departing_before(today).await
}

/// Starts the credential refresh and the two cleanup loops. Each loop runs
/// its first pass immediately and keeps going after failures.
pub fn spawn_jobs(
    config: &JobsConfig,
    tokens: Arc<TokenService>,
    offers: Arc<dyn OfferRepository>,
    requests: Arc<dyn FlightRequestRepository>,
    expiry: OfferExpiryPolicy,
) -> Vec<JoinHandle<()>> {
    let token_period = Duration::from_secs(config.token_refresh_minutes * 60);
    let offer_period = Duration::from_secs(config.offer_cleanup_minutes * 60);
    let request_period = Duration::from_secs(config.request_cleanup_hours * 60 * 60);

    let token_job = tokio::spawn(async move {
        let mut ticker = interval(token_period);
        loop {
            ticker.tick().await;
            if let Err(e) = tokens.refresh().await {
                error!("Provider token refresh failed: {}", e);
            }
        }
    });

    let offer_job = tokio::spawn(async move {
        let mut ticker = interval(offer_period);
        loop {
            ticker.tick().await;
            match prune_offers(offers.as_ref(), &expiry, Utc::now()).await {
                Ok(0) => {}
                Ok(removed) => info!("Removed {} expired flight offers", removed),
                Err(e) => error!("Flight offer cleanup failed: {}", e),
            }
        }
    });

    let request_job = tokio::spawn(async move {
        let mut ticker = interval(request_period);
        loop {
            ticker.tick().await;
            match prune_requests(requests.as_ref(), Utc::now().date_naive()).await {
                Ok(0) => {}
                Ok(removed) => info!("Removed {} past flight requests", removed),
                Err(e) => error!("Flight request cleanup failed: {}", e),
            }
        }
    });

    info!(
        "Background jobs started (token every {:?}, offers every {:?}, requests every {:?})",
        token_period, offer_period, request_period
    );
    vec![token_job, offer_job, request_job]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use uuid::Uuid;
    use wayfare_core::booking::{FlightRequestRecord, StoredOffer};
    use wayfare_store::InMemoryStore;

    #[tokio::test]
    async fn test_prune_offers_uses_ttl() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        for (client_ref, age) in [("stale", 61), ("fresh", 59)] {
            store
                .save_offer(&StoredOffer {
                    client_ref: client_ref.to_string(),
                    payload: serde_json::json!({}),
                    created_at: now - ChronoDuration::minutes(age),
                })
                .await
                .unwrap();
        }

        let removed = prune_offers(&store, &OfferExpiryPolicy::new(60), now)
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(store.get_offer("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_prune_requests_keeps_today() {
        let store = InMemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let mut kept = None;
        for departure in [today.pred_opt().unwrap(), today] {
            let record = FlightRequestRecord {
                id: Uuid::new_v4(),
                customer_id: None,
                request: serde_json::json!({}),
                departure_date: departure,
                created_at: Utc::now(),
            };
            store.save_request(&record).await.unwrap();
            kept = Some(record.id);
        }

        let removed = prune_requests(&store, today).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.get_request(kept.unwrap()).await.unwrap().is_some());
    }
}
