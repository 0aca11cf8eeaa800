//! Standardized error types following the `error-authfront-<domain>-<number>` format.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when PORT cannot be parsed
    #[error("error-authfront-config-1 Parsing HTTP_PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-authfront-config-2 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when a secret hashing cost parameter cannot be parsed
    #[error("error-authfront-config-3 Failed to parse {0} '{1}': {2}")]
    HashCostParsingFailed(&'static str, String, std::num::ParseIntError),

    /// Error when the secret hashing cost parameters are rejected by the hasher
    #[error("error-authfront-config-4 Invalid secret hashing parameters: {0}")]
    InvalidHashCost(String),
}

/// HTTP server errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Error when the consent page cannot be loaded
    #[error("error-authfront-http-1 Consent page unavailable: {0}")]
    ConsentPageUnavailable(String),

    /// Error when request processing fails
    #[error("error-authfront-http-2 Request processing failed: {0}")]
    RequestProcessingFailed(String),
}

/// Secret hashing errors
#[derive(Debug, Error)]
pub enum HashError {
    /// Error when the hashing primitive cannot be configured
    #[error("error-authfront-hash-1 Hasher configuration rejected: {0}")]
    InvalidConfiguration(String),

    /// Error when hashing a secret fails
    #[error("error-authfront-hash-2 Hashing failed: {0}")]
    HashingFailed(String),

    /// Error when a stored hash cannot be parsed
    #[error("error-authfront-hash-3 Stored hash is malformed: {0}")]
    MalformedHash(String),

    /// Error when the blocking hashing task does not complete
    #[error("error-authfront-hash-4 Hashing task failed: {0}")]
    TaskFailed(String),
}

/// Client registration errors
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Another client already holds the requested redirect URL
    #[error("error-authfront-client-1 Redirect URL is already registered")]
    DuplicateRedirectUrl,

    /// The durable store could not complete the write
    #[error("error-authfront-client-2 Client store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    /// The client secret could not be hashed
    #[error("error-authfront-client-3 Client secret could not be secured: {0}")]
    HashingFailed(#[from] HashError),
}

/// Reasons an authorization attempt is turned away, one per validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// One of client_id, redirect_url, response_type or scopes is absent or empty
    #[error("error-authfront-authorize-1 Missing required query parameters")]
    MissingParameters,

    /// client_id does not resolve to a registered client
    #[error("error-authfront-authorize-2 Invalid client_id")]
    UnknownClient,

    /// response_type is not "code"
    #[error("error-authfront-authorize-3 Response type not supported")]
    UnsupportedResponseType,

    /// redirect_url differs from the registered one
    #[error("error-authfront-authorize-4 Invalid redirect_url")]
    RedirectMismatch,

    /// scopes does not contain "openid"
    #[error("error-authfront-authorize-5 Not an openid request")]
    ScopeNotSupported,
}

impl RejectionReason {
    /// Message returned to the requesting client.
    pub fn description(&self) -> &'static str {
        match self {
            RejectionReason::MissingParameters => "Missing required query parameters",
            RejectionReason::UnknownClient => "Invalid client_id",
            RejectionReason::UnsupportedResponseType => "Response type not supported",
            RejectionReason::RedirectMismatch => "Invalid redirect_url",
            RejectionReason::ScopeNotSupported => "Not an openid request",
        }
    }
}

/// Outcome of a failed authorization validation
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// The request failed one of the validation checks
    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    /// The client lookup could not reach the durable store
    #[error("error-authfront-authorize-6 Client lookup failed: {0}")]
    StoreUnavailable(#[from] StorageError),
}

/// Database/storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when database connection fails
    #[error("error-authfront-storage-1 Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when query execution fails
    #[error("error-authfront-storage-2 Query execution failed: {0}")]
    QueryFailed(String),

    /// Error when database operation fails
    #[error("error-authfront-storage-3 Database error: {0}")]
    DatabaseError(String),

    /// Error when data validation fails
    #[error("error-authfront-storage-4 Invalid data: {0}")]
    InvalidData(String),

    /// Error when an in-process lock is poisoned
    #[error("error-authfront-storage-5 Lock error: {0}")]
    LockFailed(String),
}

pub type Result<T> = std::result::Result<T, HttpError>;

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self, "internal server error");
        (StatusCode::INTERNAL_SERVER_ERROR).into_response()
    }
}
