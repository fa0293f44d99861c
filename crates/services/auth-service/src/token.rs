//! Token issuing.
//!
//! Tokens are HS256 JWTs. Anyone holding the signing secret can check them
//! offline; the service keeps no per-token state.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use common::JwtConfig;
use domain::SECONDS_PER_HOUR;

/// What a token asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPayload {
    pub account_id: Uuid,
}

impl TokenPayload {
    pub fn new(account_id: Uuid) -> Self {
        Self { account_id }
    }
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Signs payloads into bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, payload: &TokenPayload) -> Result<String, TokenError>;
}

/// HMAC-SHA256 JWT issuer.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtIssuer {
    pub fn new(secret: &[u8], expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiration_hours,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.expiration_hours)
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.expiration_hours * SECONDS_PER_HOUR
    }

    /// Check signature and expiry and return the claims.
    ///
    /// The service never calls this itself; it is here for consumers that
    /// share the secret.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(TokenError::Invalid)?;

        Ok(token_data.claims)
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: payload.account_id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Signing)
    }
}
