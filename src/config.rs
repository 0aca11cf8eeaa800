//! Environment-based configuration types for authfront server runtime settings.

use anyhow::Result;

use crate::errors::ConfigError;
use crate::oauth::hashing::HashCost;

/// HTTP server port configuration
#[derive(Clone)]
pub struct HttpPort(u16);

/// Argon2 cost configuration for client secret hashing
#[derive(Clone, Copy)]
pub struct SecretHashCost(HashCost);

/// Optional server-side pepper mixed into every secret hash
#[derive(Clone, Default)]
pub struct SecretHashPepper(Option<Vec<u8>>);

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub http_static_path: String,
    pub storage_backend: String,
    pub database_url: Option<String>,
    pub secret_hash_cost: SecretHashCost,
    pub secret_hash_pepper: SecretHashPepper,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let http_static_path = optional_env("HTTP_STATIC_PATH")
            .unwrap_or_else(|| format!("{}/static", env!("CARGO_MANIFEST_DIR")));
        let storage_backend = default_env("STORAGE_BACKEND", "memory");
        let database_url = optional_env("DATABASE_URL");

        let secret_hash_cost = SecretHashCost::from_env_values(
            optional_env("SECRET_HASH_MEMORY_KIB"),
            optional_env("SECRET_HASH_ITERATIONS"),
            optional_env("SECRET_HASH_PARALLELISM"),
            HashCost::default(),
        )?;
        let secret_hash_pepper: SecretHashPepper = optional_env("SECRET_HASH_PEPPER").into();

        Ok(Self {
            version: version()?,
            http_port,
            http_static_path,
            storage_backend,
            database_url,
            secret_hash_cost,
            secret_hash_pepper,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl SecretHashCost {
    /// Build the cost from raw environment values, falling back to `defaults`
    /// for unset or empty variables
    pub fn from_env_values(
        memory_kib: Option<String>,
        iterations: Option<String>,
        parallelism: Option<String>,
        defaults: HashCost,
    ) -> Result<Self, ConfigError> {
        let cost = HashCost {
            memory_kib: parse_cost("SECRET_HASH_MEMORY_KIB", memory_kib, defaults.memory_kib)?,
            iterations: parse_cost("SECRET_HASH_ITERATIONS", iterations, defaults.iterations)?,
            parallelism: parse_cost(
                "SECRET_HASH_PARALLELISM",
                parallelism,
                defaults.parallelism,
            )?,
        };

        argon2::Params::try_from(cost).map_err(|e| ConfigError::InvalidHashCost(e.to_string()))?;

        Ok(Self(cost))
    }
}

fn parse_cost(
    name: &'static str,
    value: Option<String>,
    default: u32,
) -> Result<u32, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => v
            .parse::<u32>()
            .map_err(|e| ConfigError::HashCostParsingFailed(name, v, e)),
    }
}

impl From<HashCost> for SecretHashCost {
    fn from(value: HashCost) -> Self {
        Self(value)
    }
}

impl AsRef<HashCost> for SecretHashCost {
    fn as_ref(&self) -> &HashCost {
        &self.0
    }
}

impl From<Option<String>> for SecretHashPepper {
    fn from(value: Option<String>) -> Self {
        Self(value.filter(|v| !v.is_empty()).map(String::into_bytes))
    }
}

impl AsRef<Option<Vec<u8>>> for SecretHashPepper {
    fn as_ref(&self) -> &Option<Vec<u8>> {
        &self.0
    }
}
