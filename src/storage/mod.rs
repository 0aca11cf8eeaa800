//! Trait-based client storage with in-memory, SQLite, and PostgreSQL backends.

pub mod inmemory;
pub mod traits;

// Feature-gated storage implementations
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use inmemory::MemoryClientStore;
pub use traits::*;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteClientStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresClientStore;

use crate::errors::StorageError;
use std::sync::Arc;

/// Storage backend configuration and factory
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite(String), // Connection string/path
    #[cfg(feature = "postgres")]
    Postgres(String), // Connection string
}

/// Create the configured client store, running migrations for database backends
pub async fn create_client_store(
    backend: StorageBackend,
) -> std::result::Result<Arc<dyn ClientStore>, StorageError> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryClientStore::new())),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite(database_url) => {
            let options = database_url
                .parse::<sqlx::sqlite::SqliteConnectOptions>()
                .map_err(|e| {
                    StorageError::ConnectionFailed(format!("Invalid SQLite URL: {}", e))
                })?
                .create_if_missing(true);
            let pool = sqlx::SqlitePool::connect_with(options)
                .await
                .map_err(|e| {
                    StorageError::ConnectionFailed(format!("SQLite connection failed: {}", e))
                })?;

            let storage = SqliteClientStore::new(pool);

            // Run migrations
            storage.migrate().await?;

            Ok(Arc::new(storage))
        }
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres(database_url) => {
            let pool = sqlx::postgres::PgPool::connect(&database_url)
                .await
                .map_err(|e| {
                    StorageError::ConnectionFailed(format!("PostgreSQL connection failed: {}", e))
                })?;

            let storage = PostgresClientStore::new(pool);

            // Run migrations
            storage.migrate().await?;

            Ok(Arc::new(storage))
        }
    }
}

/// Parse storage backend from configuration string
pub fn parse_storage_backend(
    backend_name: &str,
    database_url: Option<&str>,
) -> std::result::Result<StorageBackend, StorageError> {
    match backend_name {
        "memory" => Ok(StorageBackend::Memory),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let url = database_url.unwrap_or("sqlite:authfront.db");
            Ok(StorageBackend::Sqlite(url.to_string()))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let url = database_url.ok_or_else(|| {
                StorageError::InvalidData("DATABASE_URL required for postgres backend".to_string())
            })?;
            Ok(StorageBackend::Postgres(url.to_string()))
        }
        _ => Err(StorageError::InvalidData(format!(
            "Unknown storage backend: {}",
            backend_name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_backend() {
        let backend = parse_storage_backend("memory", None).unwrap();
        assert_eq!(backend, StorageBackend::Memory);
    }

    #[test]
    fn test_parse_unknown_backend() {
        let result = parse_storage_backend("redis", None);
        assert!(matches!(result, Err(StorageError::InvalidData(_))));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_parse_sqlite_backend_defaults_url() {
        let backend = parse_storage_backend("sqlite", None).unwrap();
        assert_eq!(
            backend,
            StorageBackend::Sqlite("sqlite:authfront.db".to_string())
        );
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_parse_postgres_backend_requires_url() {
        assert!(parse_storage_backend("postgres", None).is_err());
        let backend =
            parse_storage_backend("postgres", Some("postgres://localhost/authfront")).unwrap();
        assert_eq!(
            backend,
            StorageBackend::Postgres("postgres://localhost/authfront".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_memory_store() {
        let store = create_client_store(StorageBackend::Memory).await.unwrap();
        assert_eq!(store.count_clients().await.unwrap(), 0);
    }
}
