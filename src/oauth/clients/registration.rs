//! Client registration and lookup.
//!
//! The registry is the only writer of client records. Secrets are hashed
//! before a record is built and the plaintext is dropped once hashed.

use crate::errors::{HashError, RegistrationError, StorageError};
use crate::oauth::authorize::ClientLookup;
use crate::oauth::hashing::SecretHasher;
use crate::oauth::types::*;
use crate::storage::traits::{ClientStore, InsertOutcome};
use async_trait::async_trait;
use std::sync::Arc;

/// Client Registry
pub struct ClientRegistry {
    storage: Arc<dyn ClientStore>,
    hasher: Arc<dyn SecretHasher>,
}

impl ClientRegistry {
    /// Create a new client registry over an explicit store handle
    pub fn new(storage: Arc<dyn ClientStore>, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { storage, hasher }
    }

    /// Register a new client.
    ///
    /// Performs a single atomic insert keyed on `redirect_url`. When another
    /// client already holds the URL nothing is written and
    /// [`RegistrationError::DuplicateRedirectUrl`] is returned.
    pub async fn register(
        &self,
        secret: &ClientSecret,
        redirect_url: &str,
    ) -> Result<ClientId, RegistrationError> {
        let secret_hash = self.hasher.hash_secret(secret).await.inspect_err(|err| {
            tracing::error!(error = ?err, "client secret hashing failed");
        })?;

        let client = Client {
            client_id: ClientId::generate(),
            secret_hash,
            redirect_url: redirect_url.to_string(),
        };

        match self.storage.insert_client_if_absent(&client).await {
            Ok(InsertOutcome::Inserted) => {
                tracing::info!(client_id = %client.client_id, "registered client");
                Ok(client.client_id)
            }
            Ok(InsertOutcome::RedirectUrlTaken) => {
                tracing::debug!(redirect_url, "registration rejected, redirect URL taken");
                Err(RegistrationError::DuplicateRedirectUrl)
            }
            Err(err) => {
                tracing::error!(error = ?err, "client store write failed");
                Err(RegistrationError::StoreUnavailable(err))
            }
        }
    }

    /// Look up a client by its public identifier.
    ///
    /// Identifiers that are not well-formed cannot belong to any client and
    /// resolve to `None` without touching the store.
    pub async fn find_by_id(&self, client_id: &str) -> Result<Option<Client>, StorageError> {
        let Ok(client_id) = client_id.parse::<ClientId>() else {
            return Ok(None);
        };
        self.storage.get_client(&client_id).await
    }

    /// Verify a plaintext secret against a client's stored hash
    pub async fn verify_secret(
        &self,
        client: &Client,
        secret: &ClientSecret,
    ) -> Result<bool, HashError> {
        self.hasher
            .verify_secret(secret, &client.secret_hash)
            .await
    }
}

#[async_trait]
impl ClientLookup for ClientRegistry {
    async fn find_by_id(&self, client_id: &str) -> Result<Option<Client>, StorageError> {
        ClientRegistry::find_by_id(self, client_id).await
    }
}
