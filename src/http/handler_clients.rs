//! Handles PUT /clients - client registration

use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json as ResponseJson,
};
use std::sync::Arc;

use crate::{
    errors::RegistrationError,
    oauth::{
        clients::ClientRegistry,
        types::{ClientRegistrationRequest, ClientRegistrationResponse, ErrorResponse},
    },
};

type ErrorReply = (StatusCode, ResponseJson<ErrorResponse>);

fn error_reply(status: StatusCode, error: &str, description: Option<String>) -> ErrorReply {
    (
        status,
        ResponseJson(ErrorResponse {
            error: error.to_string(),
            error_description: description,
        }),
    )
}

fn invalid_request(description: impl Into<String>) -> ErrorReply {
    error_reply(
        StatusCode::BAD_REQUEST,
        "invalid_request",
        Some(description.into()),
    )
}

pub async fn register_client_handler(
    State(registry): State<Arc<ClientRegistry>>,
    request: Result<Json<ClientRegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<ClientRegistrationResponse>), ErrorReply> {
    let Json(request) = request.map_err(|rejection| invalid_request(rejection.body_text()))?;

    let secret = request
        .client_secret
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| invalid_request("client_secret is required"))?;
    let redirect_url = request
        .redirect_url
        .filter(|redirect_url| !redirect_url.is_empty())
        .ok_or_else(|| invalid_request("redirect_url is required"))?;
    url::Url::parse(&redirect_url)
        .map_err(|e| invalid_request(format!("redirect_url is not an absolute URL: {}", e)))?;

    match registry.register(&secret, &redirect_url).await {
        Ok(client_id) => Ok((
            StatusCode::CREATED,
            ResponseJson(ClientRegistrationResponse { client_id }),
        )),
        Err(RegistrationError::DuplicateRedirectUrl) => {
            Err(error_reply(StatusCode::CONFLICT, "already exists", None))
        }
        Err(e) => {
            tracing::error!(error = ?e, "client registration failed");
            Err(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                None,
            ))
        }
    }
}
