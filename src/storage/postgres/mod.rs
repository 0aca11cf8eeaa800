//! PostgreSQL storage implementations
//!
//! PostgreSQL is suitable for production deployments running several
//! server instances against one registry.

mod clients;

pub use clients::PostgresClientStore;
