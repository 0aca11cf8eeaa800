//! Application state shared by request handlers.

use axum::extract::FromRef;
use std::sync::Arc;

use crate::config::Config;
use crate::oauth::{authorize::AuthorizationValidator, clients::ClientRegistry};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Client registry for registration and lookup
    pub client_registry: Arc<ClientRegistry>,
    pub validator: AuthorizationValidator,
}

impl FromRef<AppState> for Arc<ClientRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.client_registry.clone()
    }
}
