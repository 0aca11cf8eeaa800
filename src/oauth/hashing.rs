//! Client secret hashing.
//!
//! Secrets are Argon2id-hashed into PHC strings, optionally mixed with a
//! server-side pepper. Hashing is CPU-bound and runs on the blocking pool.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use async_trait::async_trait;
use rand::rngs::OsRng;
use std::sync::Arc;

use crate::errors::HashError;
use crate::oauth::types::{ClientSecret, HashedSecret};

/// Hashing primitive used to secure client secrets at rest
#[async_trait]
pub trait SecretHasher: Send + Sync {
    /// Produce a salted one-way hash of a plaintext secret
    async fn hash_secret(&self, secret: &ClientSecret) -> Result<HashedSecret, HashError>;

    /// Check a plaintext secret against a hash produced by `hash_secret`
    async fn verify_secret(
        &self,
        secret: &ClientSecret,
        hashed: &HashedSecret,
    ) -> Result<bool, HashError>;
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl TryFrom<HashCost> for Params {
    type Error = HashError;

    fn try_from(cost: HashCost) -> Result<Self, Self::Error> {
        Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| HashError::InvalidConfiguration(e.to_string()))
    }
}

/// Argon2id implementation of [`SecretHasher`]
#[derive(Clone)]
pub struct Argon2SecretHasher {
    params: Params,
    pepper: Arc<Vec<u8>>,
}

impl Argon2SecretHasher {
    /// Create a hasher, rejecting cost parameters Argon2 would not accept
    pub fn new(cost: HashCost, pepper: Option<Vec<u8>>) -> Result<Self, HashError> {
        let hasher = Self {
            params: cost.try_into()?,
            pepper: Arc::new(pepper.unwrap_or_default()),
        };
        hasher.argon2()?;
        Ok(hasher)
    }

    fn argon2(&self) -> Result<Argon2<'_>, HashError> {
        if self.pepper.is_empty() {
            return Ok(Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                self.params.clone(),
            ));
        }
        Argon2::new_with_secret(
            &self.pepper,
            Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        )
        .map_err(|e| HashError::InvalidConfiguration(e.to_string()))
    }

    fn hash_blocking(&self, secret: &[u8]) -> Result<HashedSecret, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(secret, &salt)
            .map_err(|e| HashError::HashingFailed(e.to_string()))?;
        Ok(HashedSecret::from_phc(hash.to_string()))
    }

    fn verify_blocking(&self, secret: &[u8], hashed: &str) -> Result<bool, HashError> {
        let parsed =
            PasswordHash::new(hashed).map_err(|e| HashError::MalformedHash(e.to_string()))?;
        match self.argon2()?.verify_password(secret, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::HashingFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl SecretHasher for Argon2SecretHasher {
    async fn hash_secret(&self, secret: &ClientSecret) -> Result<HashedSecret, HashError> {
        let hasher = self.clone();
        let secret = secret.clone();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(secret.expose().as_bytes()))
            .await
            .map_err(|e| HashError::TaskFailed(e.to_string()))?
    }

    async fn verify_secret(
        &self,
        secret: &ClientSecret,
        hashed: &HashedSecret,
    ) -> Result<bool, HashError> {
        let hasher = self.clone();
        let secret = secret.clone();
        let hashed = hashed.clone();
        tokio::task::spawn_blocking(move || {
            hasher.verify_blocking(secret.expose().as_bytes(), hashed.as_str())
        })
        .await
        .map_err(|e| HashError::TaskFailed(e.to_string()))?
    }
}
