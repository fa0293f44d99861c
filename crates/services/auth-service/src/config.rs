//! Auth service configuration.
//!
//! Built by the startup layer and handed to the service; nothing here reads
//! the environment.

use std::time::Duration;

use common::{HashingConfig, JwtConfig};
use domain::{HashAlgorithm, MAX_HASH_COST, MIN_HASH_COST, MIN_JWT_SECRET_LENGTH};
use thiserror::Error;

/// Default bound on a single store or hashing call, in milliseconds
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 10_000;

/// Default bound on a single store or hashing call
pub const DEFAULT_OPERATION_TIMEOUT: Duration =
    Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS);

/// Configuration problems detected at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing settings
    pub jwt: JwtConfig,
    /// Password hashing settings
    pub hashing: HashingConfig,
    /// Upper bound for each store and hashing call
    pub operation_timeout: Duration,
}

impl AuthConfig {
    /// Check the settings before any component is built from them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {} bytes", MIN_JWT_SECRET_LENGTH),
            ));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::invalid(
                "JWT_EXPIRATION_HOURS",
                "must be positive",
            ));
        }
        if self.hashing.algorithm == HashAlgorithm::Bcrypt
            && !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.hashing.cost)
        {
            return Err(ConfigError::invalid(
                "HASH_COST",
                format!("must be between {} and {}", MIN_HASH_COST, MAX_HASH_COST),
            ));
        }
        if self.operation_timeout.is_zero() {
            return Err(ConfigError::invalid("AUTH_TIMEOUT_MS", "must be positive"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            hashing: HashingConfig::default(),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}
