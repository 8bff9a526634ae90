use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use wayfare_core::booking::ProviderCredential;
use wayfare_core::repository::{CredentialRepository, RepoResult};

pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    token_kind: Option<String>,
    username: Option<String>,
    client_id: Option<String>,
    token_type: String,
    access_token: String,
    expires_in: i64,
    state: Option<String>,
    scope: Option<String>,
    refreshed_at: DateTime<Utc>,
}

#[async_trait]
impl CredentialRepository for PgCredentialRepository {
    async fn get_credential(&self) -> RepoResult<Option<ProviderCredential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT token_kind, username, client_id, token_type, access_token, expires_in, state, scope, refreshed_at
            FROM provider_credentials
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| ProviderCredential {
            token_kind: r.token_kind,
            username: r.username,
            client_id: r.client_id,
            token_type: r.token_type,
            access_token: r.access_token,
            expires_in: r.expires_in,
            state: r.state,
            scope: r.scope,
            refreshed_at: r.refreshed_at,
        }))
    }

    async fn save_credential(&self, credential: &ProviderCredential) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO provider_credentials (id, token_kind, username, client_id, token_type, access_token, expires_in, state, scope, refreshed_at)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                token_kind = EXCLUDED.token_kind,
                username = EXCLUDED.username,
                client_id = EXCLUDED.client_id,
                token_type = EXCLUDED.token_type,
                access_token = EXCLUDED.access_token,
                expires_in = EXCLUDED.expires_in,
                state = EXCLUDED.state,
                scope = EXCLUDED.scope,
                refreshed_at = EXCLUDED.refreshed_at
            "#,
        )
        .bind(&credential.token_kind)
        .bind(&credential.username)
        .bind(&credential.client_id)
        .bind(&credential.token_type)
        .bind(&credential.access_token)
        .bind(credential.expires_in)
        .bind(&credential.state)
        .bind(&credential.scope)
        .bind(credential.refreshed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
