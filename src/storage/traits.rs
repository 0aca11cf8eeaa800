//! Storage trait definitions for registered clients.

use crate::errors::StorageError;
use crate::oauth::types::{Client, ClientId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Outcome of an atomic insert keyed on the client's redirect URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The client was written
    Inserted,
    /// Another client already holds the redirect URL; nothing was written
    RedirectUrlTaken,
}

/// Trait for storing and retrieving registered clients
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a client unless its redirect URL is already registered.
    ///
    /// The uniqueness check and the write happen as one atomic step in the
    /// backing store, so concurrent callers racing on the same redirect URL
    /// observe exactly one `Inserted`.
    async fn insert_client_if_absent(&self, client: &Client) -> Result<InsertOutcome>;

    /// Retrieve a client by ID
    async fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>>;

    /// Number of registered clients
    async fn count_clients(&self) -> Result<u64>;
}
