//! In-memory client storage implementation

use crate::errors::StorageError;
use crate::oauth::types::{Client, ClientId};
use crate::storage::traits::{ClientStore, InsertOutcome, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct ClientTable {
    clients: HashMap<ClientId, Client>,
    redirect_index: HashMap<String, ClientId>, // redirect_url -> client_id
}

/// In-memory implementation of client storage
#[derive(Default)]
pub struct MemoryClientStore {
    table: Mutex<ClientTable>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ClientTable>> {
        self.table
            .lock()
            .map_err(|e| StorageError::LockFailed(format!("Lock error: {}", e)))
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn insert_client_if_absent(&self, client: &Client) -> Result<InsertOutcome> {
        let mut table = self.lock()?;

        if table.redirect_index.contains_key(&client.redirect_url) {
            return Ok(InsertOutcome::RedirectUrlTaken);
        }
        if table.clients.contains_key(&client.client_id) {
            return Err(StorageError::InvalidData(format!(
                "Client ID already in use: {}",
                client.client_id
            )));
        }

        table
            .redirect_index
            .insert(client.redirect_url.clone(), client.client_id);
        table.clients.insert(client.client_id, client.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>> {
        let table = self.lock()?;
        Ok(table.clients.get(client_id).cloned())
    }

    async fn count_clients(&self) -> Result<u64> {
        let table = self.lock()?;
        Ok(table.clients.len() as u64)
    }
}
