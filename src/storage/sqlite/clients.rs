//! SQLite implementation for client storage

use crate::errors::StorageError;
use crate::oauth::types::{Client, ClientId, HashedSecret};
use crate::storage::traits::{ClientStore, InsertOutcome, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

/// SQLite implementation of client storage
pub struct SqliteClientStore {
    pool: SqlitePool,
}

impl SqliteClientStore {
    /// Create a new SQLite client store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    /// Convert SQLite row to Client
    fn row_to_client(row: &SqliteRow) -> Result<Client> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get id: {}", e)))?;
        let client_id = id
            .parse::<ClientId>()
            .map_err(|e| StorageError::InvalidData(format!("Invalid client id {}: {}", id, e)))?;

        let secret_hash: String = row.try_get("secret_hash").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get secret_hash: {}", e))
        })?;
        let redirect_url: String = row.try_get("redirect_url").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get redirect_url: {}", e))
        })?;

        Ok(Client {
            client_id,
            secret_hash: HashedSecret::from_phc(secret_hash),
            redirect_url,
        })
    }
}

#[async_trait]
impl ClientStore for SqliteClientStore {
    async fn insert_client_if_absent(&self, client: &Client) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (id, secret_hash, redirect_url)
            VALUES (?, ?, ?)
            ON CONFLICT(redirect_url) DO NOTHING
            "#,
        )
        .bind(client.client_id.to_string())
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
        let row = sqlx::query("SELECT id, secret_hash, redirect_url FROM clients WHERE id = ?")
            .bind(client_id.to_string())
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

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteClientStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let store = SqliteClientStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn client(redirect_url: &str) -> Client {
        Client {
            client_id: ClientId::generate(),
            secret_hash: HashedSecret::from_phc("$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA"),
            redirect_url: redirect_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_client() {
        let store = store().await;
        let client = client("https://app.example/cb");

        let outcome = store.insert_client_if_absent(&client).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        let stored = store.get_client(&client.client_id).await.unwrap();
        assert_eq!(stored, Some(client));
    }

    #[tokio::test]
    async fn test_duplicate_redirect_url_is_not_written() {
        let store = store().await;

        store
            .insert_client_if_absent(&client("https://app.example/cb"))
            .await
            .unwrap();
        let outcome = store
            .insert_client_if_absent(&client("https://app.example/cb"))
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::RedirectUrlTaken);
        assert_eq!(store.count_clients().await.unwrap(), 1);
    }
}
