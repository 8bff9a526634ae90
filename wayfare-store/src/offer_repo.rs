use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use wayfare_core::booking::StoredOffer;
use wayfare_core::repository::{OfferRepository, RepoResult};

pub struct PgOfferRepository {
    pool: PgPool,
}

impl PgOfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OfferRow {
    client_ref: String,
    payload: serde_json::Value,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl OfferRepository for PgOfferRepository {
    async fn save_offer(&self, offer: &StoredOffer) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO flight_offers (client_ref, payload, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (client_ref) DO UPDATE
            SET payload = EXCLUDED.payload, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(&offer.client_ref)
        .bind(&offer.payload)
        .bind(offer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_offer(&self, client_ref: &str) -> RepoResult<Option<StoredOffer>> {
        let row = sqlx::query_as::<_, OfferRow>(
            "SELECT client_ref, payload, created_at FROM flight_offers WHERE client_ref = $1",
        )
        .bind(client_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| StoredOffer {
            client_ref: r.client_ref,
            payload: r.payload,
            created_at: r.created_at,
        }))
    }

    async fn delete_offers_created_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM flight_offers WHERE created_at <= $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
