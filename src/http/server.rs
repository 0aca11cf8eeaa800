//! Main router configuration assembling the client and authorization endpoints.

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::{
    context::AppState, handler_authorize::authorize_handler,
    handler_clients::register_client_handler,
};

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    Router::new()
        .route("/clients", put(register_client_handler))
        .route("/authorize", get(authorize_handler))
        .nest_service("/static", ServeDir::new(&ctx.config.http_static_path))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
