//! Authorization request validation.
//!
//! An authorization attempt runs through [`VALIDATION_PIPELINE`] in order and
//! stops at the first failing check, so the reported rejection reason always
//! reflects the earliest problem with the request.

use crate::errors::{AuthorizationError, RejectionReason, StorageError};
use crate::oauth::types::*;
use async_trait::async_trait;

/// Read-only client lookup used while validating authorization requests
#[async_trait]
pub trait ClientLookup: Send + Sync {
    /// Resolve a client identifier; malformed or unknown identifiers are `None`
    async fn find_by_id(&self, client_id: &str) -> Result<Option<Client>, StorageError>;
}

/// A single validation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// All four parameters are present and non-empty
    Presence,
    /// `client_id` resolves to a registered client
    ClientExists,
    /// `response_type` is `code`
    ResponseType,
    /// `redirect_url` equals the client's registered redirect URL byte for byte
    RedirectMatch,
    /// `scopes` contains `openid`
    OpenIdScope,
}

/// Checks in precedence order
pub const VALIDATION_PIPELINE: [Check; 5] = [
    Check::Presence,
    Check::ClientExists,
    Check::ResponseType,
    Check::RedirectMatch,
    Check::OpenIdScope,
];

impl Check {
    /// The rejection reported when this check fails
    pub fn rejection(&self) -> RejectionReason {
        match self {
            Check::Presence => RejectionReason::MissingParameters,
            Check::ClientExists => RejectionReason::UnknownClient,
            Check::ResponseType => RejectionReason::UnsupportedResponseType,
            Check::RedirectMatch => RejectionReason::RedirectMismatch,
            Check::OpenIdScope => RejectionReason::ScopeNotSupported,
        }
    }

    async fn apply(
        &self,
        params: &AuthorizationParams,
        client: &mut Option<Client>,
        lookup: &dyn ClientLookup,
    ) -> Result<bool, StorageError> {
        let passed = match self {
            Check::Presence => [
                &params.client_id,
                &params.redirect_url,
                &params.response_type,
                &params.scopes,
            ]
            .iter()
            .all(|value| value.as_deref().is_some_and(|value| !value.is_empty())),
            Check::ClientExists => {
                let client_id = params.client_id.as_deref().unwrap_or_default();
                *client = lookup.find_by_id(client_id).await?;
                client.is_some()
            }
            Check::ResponseType => params.response_type.as_deref() == Some(RESPONSE_TYPE_CODE),
            Check::RedirectMatch => match (client.as_ref(), params.redirect_url.as_deref()) {
                (Some(client), Some(redirect_url)) => client.redirect_url == redirect_url,
                _ => false,
            },
            Check::OpenIdScope => params
                .scopes
                .as_deref()
                .is_some_and(|scopes| scope_tokens(scopes).any(|scope| scope == OPENID_SCOPE)),
        };
        Ok(passed)
    }
}

/// Stateless validator for authorization attempts
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationValidator;

impl AuthorizationValidator {
    pub fn new() -> Self {
        Self
    }

    /// Checks this validator runs, in the order it runs them
    pub fn pipeline(&self) -> &'static [Check] {
        &VALIDATION_PIPELINE
    }

    /// Decide whether an authorization attempt may proceed to consent.
    ///
    /// Returns [`AuthorizationError::Rejected`] with the reason of the first
    /// failing check, or [`AuthorizationError::StoreUnavailable`] when the
    /// client lookup itself fails.
    pub async fn validate(
        &self,
        params: &AuthorizationParams,
        lookup: &dyn ClientLookup,
    ) -> Result<Accepted, AuthorizationError> {
        let mut client = None;

        for check in self.pipeline() {
            if !check.apply(params, &mut client, lookup).await? {
                let reason = check.rejection();
                tracing::debug!(?check, ?reason, "authorization request rejected");
                return Err(reason.into());
            }
        }

        let client = client.ok_or(RejectionReason::UnknownClient)?;
        tracing::debug!(client_id = %client.client_id, "authorization request accepted");
        Ok(Accepted { client })
    }
}
