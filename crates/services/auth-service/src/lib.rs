//! Auth Service Library
//!
//! Account creation, registration and login with salted password digests
//! and signed bearer tokens. Storage, hashing and signing are injected, so
//! the service runs the same against Postgres or the in-memory store.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
pub mod token;

use std::sync::Arc;

use tracing::info;

use domain::CredentialHasher;

use crate::config::{AuthConfig, ConfigError};
use crate::repository::AccountStore;
use crate::service::Authenticator;
use crate::token::JwtIssuer;

/// Build the auth service from validated configuration and a store.
pub fn build_authenticator(
    config: &AuthConfig,
    store: Arc<dyn AccountStore>,
) -> Result<Authenticator, ConfigError> {
    config.validate()?;

    let hasher: Arc<dyn CredentialHasher> =
        Arc::from(config.hashing.algorithm.hasher(config.hashing.cost));
    let issuer = Arc::new(JwtIssuer::from_config(&config.jwt));

    info!(
        algorithm = %config.hashing.algorithm,
        cost = config.hashing.cost,
        token_hours = config.jwt.expiration_hours,
        "Auth service configured"
    );

    Ok(Authenticator::new(store, hasher, issuer, config.operation_timeout))
}
