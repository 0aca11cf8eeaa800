//! Client registry and authorization request types.
//!
//! Defines the persisted client record, its identifier and secret wrappers,
//! and the request/response bodies exchanged with the transport layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The only response type accepted at the authorization endpoint
pub const RESPONSE_TYPE_CODE: &str = "code";

/// The scope every authorization request must carry
pub const OPENID_SCOPE: &str = "openid";

/// Public identifier of a registered client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Generate a fresh, never before issued client identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ClientId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for ClientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext client secret as supplied at registration
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret([redacted])")
    }
}

/// Salted one-way hash of a client secret in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret(String);

impl HashedSecret {
    pub fn from_phc(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedSecret(..)")
    }
}

/// Registered client record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// Unique client identifier
    pub client_id: ClientId,
    /// Hash of the client secret
    pub secret_hash: HashedSecret,
    /// The one redirect URL this client may receive results at
    pub redirect_url: String,
}

/// Query parameters of an authorization attempt
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationParams {
    pub client_id: Option<String>,
    pub redirect_url: Option<String>,
    pub response_type: Option<String>,
    /// Space-delimited scope tokens
    pub scopes: Option<String>,
}

/// Successful validation of an authorization attempt
#[derive(Debug, Clone)]
pub struct Accepted {
    pub client: Client,
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct ClientRegistrationRequest {
    pub client_secret: Option<ClientSecret>,
    pub redirect_url: Option<String>,
}

/// Registration response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientRegistrationResponse {
    pub client_id: ClientId,
}

/// OAuth-style error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// Split a scope string on single spaces, the way clients send it
pub fn scope_tokens(scopes: &str) -> impl Iterator<Item = &str> {
    scopes.split(' ')
}
