//! Handles GET /authorize - authorization request validation and consent page

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::path::Path;

use crate::{
    errors::{AuthorizationError, HttpError, Result},
    http::context::AppState,
    oauth::types::AuthorizationParams,
};

/// File served once an authorization request is accepted
pub const CONSENT_PAGE: &str = "auth.html";

pub async fn authorize_handler(
    State(state): State<AppState>,
    Query(params): Query<AuthorizationParams>,
) -> Response {
    match state
        .validator
        .validate(&params, &*state.client_registry)
        .await
    {
        Ok(_accepted) => match consent_page(&state.config.http_static_path).await {
            Ok(page) => Html(page).into_response(),
            Err(e) => e.into_response(),
        },
        Err(AuthorizationError::Rejected(reason)) => {
            (StatusCode::BAD_REQUEST, reason.description()).into_response()
        }
        Err(e @ AuthorizationError::StoreUnavailable(_)) => {
            HttpError::RequestProcessingFailed(e.to_string()).into_response()
        }
    }
}

async fn consent_page(static_path: &str) -> Result<String> {
    let path = Path::new(static_path).join(CONSENT_PAGE);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| HttpError::ConsentPageUnavailable(format!("{}: {}", path.display(), e)))
}
