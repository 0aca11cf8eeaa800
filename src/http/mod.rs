//! Axum HTTP server handlers for client registration and authorization.

pub mod context;
mod handler_authorize;
mod handler_clients;
pub mod server;

pub use context::AppState;
pub use handler_authorize::CONSENT_PAGE;
pub use server::build_router;
