//! PostgreSQL implementation for client storage

use crate::errors::StorageError;
use crate::oauth::types::{Client, ClientId, HashedSecret};
use crate::storage::traits::{ClientStore, InsertOutcome, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

/// PostgreSQL implementation of client storage
pub struct PostgresClientStore {
    pool: PgPool,
}

impl PostgresClientStore {
    /// Create a new PostgreSQL client store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    fn row_to_client(row: &PgRow) -> Result<Client> {
        let id: Uuid = row
            .try_get("id")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get id: {}", e)))?;
        let secret_hash: String = row.try_get("secret_hash").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get secret_hash: {}", e))
        })?;
        let redirect_url: String = row.try_get("redirect_url").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get redirect_url: {}", e))
        })?;

        Ok(Client {
            client_id: ClientId::from(id),
            secret_hash: HashedSecret::from_phc(secret_hash),
            redirect_url,
        })
    }
}

#[async_trait]
impl ClientStore for PostgresClientStore {
    async fn insert_client_if_absent(&self, client: &Client) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (id, secret_hash, redirect_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (redirect_url) DO NOTHING
            "#,
        )
        .bind(client.client_id.as_uuid())
        .bind(client.secret_hash.as_str())
        .bind(&client.redirect_url)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(InsertOutcome::RedirectUrlTaken);
        }
        Ok(InsertOutcome::Inserted)
    }

    async fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT id, secret_hash, redirect_url FROM clients WHERE id = $1")
            .bind(client_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_client).transpose()
    }

    async fn count_clients(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(count as u64)
    }
}
