//! Client credential registry and authorization request validation.

pub mod authorize;
pub mod clients;
pub mod hashing;
pub mod types;

// Re-export frequently used items from each module
pub use authorize::{AuthorizationValidator, Check, ClientLookup, VALIDATION_PIPELINE};
pub use clients::ClientRegistry;
pub use hashing::{Argon2SecretHasher, HashCost, SecretHasher};
pub use types::{
    Accepted, AuthorizationParams, Client, ClientId, ClientRegistrationRequest,
    ClientRegistrationResponse, ClientSecret, ErrorResponse, HashedSecret,
};
