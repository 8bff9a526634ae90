use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_core::booking::FlightRequestRecord;
use wayfare_core::repository::{FlightRequestRepository, RepoResult};

pub struct PgFlightRequestRepository {
    pool: PgPool,
}

impl PgFlightRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRequestRow {
    id: Uuid,
    customer_id: Option<Uuid>,
    request: serde_json::Value,
    departure_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<FlightRequestRow> for FlightRequestRecord {
    fn from(row: FlightRequestRow) -> Self {
        FlightRequestRecord {
            id: row.id,
            customer_id: row.customer_id,
            request: row.request,
            departure_date: row.departure_date,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl FlightRequestRepository for PgFlightRequestRepository {
    async fn save_request(&self, request: &FlightRequestRecord) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO flight_requests (id, customer_id, request, departure_date, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(request.id)
        .bind(request.customer_id)
        .bind(&request.request)
        .bind(request.departure_date)
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> RepoResult<Option<FlightRequestRecord>> {
        let row = sqlx::query_as::<_, FlightRequestRow>(
            r#"
            SELECT id, customer_id, request, departure_date, created_at
            FROM flight_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FlightRequestRecord::from))
    }

    async fn delete_requests_departing_before(&self, date: NaiveDate) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM flight_requests WHERE departure_date < $1")
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
