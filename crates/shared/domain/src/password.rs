//! Password hashing - digests and the hashers that produce them.
//!
//! Plain text passwords only ever pass through `hash` and `verify`.
//! What gets stored is a [`PasswordDigest`], which never prints its contents.

use std::fmt;
use std::str::FromStr;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use bcrypt::BcryptError;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HASH_COST, MAX_PASSWORD_BYTES};
use crate::error::{DomainError, DomainResult};

/// Stored, salted password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

// Don't expose the digest in debug output
impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordDigest").field(&"[REDACTED]").finish()
    }
}

impl PasswordDigest {
    /// Wrap a digest loaded from storage.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Get the digest string for storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the digest string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<PasswordDigest> for String {
    fn from(digest: PasswordDigest) -> Self {
        digest.0
    }
}

/// One-way password transform.
///
/// `hash` must salt randomly so equal inputs yield different digests.
/// `verify` returns `false` for any mismatch, including digests it cannot parse.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, plain_text: &str) -> DomainResult<PasswordDigest>;

    /// Check a plain text password against a stored digest.
    fn verify(&self, plain_text: &str, digest: &PasswordDigest) -> bool;
}

/// Supported hashing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Bcrypt,
    Argon2,
}

impl HashAlgorithm {
    /// Build the hasher for this algorithm. `cost` only applies to bcrypt.
    ///
    /// New digests use this algorithm; stored digests from the other one
    /// still verify.
    pub fn hasher(self, cost: u32) -> Box<dyn CredentialHasher> {
        Box::new(AdaptiveHasher::new(self, cost))
    }

    /// Identify the algorithm that produced a digest from its prefix.
    pub fn of_digest(digest: &PasswordDigest) -> Option<Self> {
        let digest = digest.as_str();
        if ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| digest.starts_with(prefix))
        {
            Some(HashAlgorithm::Bcrypt)
        } else if digest.starts_with("$argon2") {
            Some(HashAlgorithm::Argon2)
        } else {
            None
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(HashAlgorithm::Bcrypt),
            "argon2" | "argon2id" => Ok(HashAlgorithm::Argon2),
            other => Err(DomainError::validation(format!(
                "Unknown hash algorithm '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Bcrypt => write!(f, "bcrypt"),
            HashAlgorithm::Argon2 => write!(f, "argon2"),
        }
    }
}

/// bcrypt with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

// Over-long passwords are refused, never truncated
impl CredentialHasher for BcryptHasher {
    fn hash(&self, plain_text: &str) -> DomainResult<PasswordDigest> {
        bcrypt::non_truncating_hash(plain_text, self.cost)
            .map(PasswordDigest)
            .map_err(|e| match e {
                BcryptError::Truncation(_) => DomainError::validation(format!(
                    "Password must be at most {} bytes",
                    MAX_PASSWORD_BYTES
                )),
                other => {
                    tracing::error!("bcrypt hashing failed: {}", other);
                    DomainError::StorageFailure
                }
            })
    }

    fn verify(&self, plain_text: &str, digest: &PasswordDigest) -> bool {
        bcrypt::non_truncating_verify(plain_text, digest.as_str()).unwrap_or(false)
    }
}

/// Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> DomainResult<PasswordDigest> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("argon2 hashing failed: {}", e);
                DomainError::StorageFailure
            })?;
        Ok(PasswordDigest(hash.to_string()))
    }

    fn verify(&self, plain_text: &str, digest: &PasswordDigest) -> bool {
        match PasswordHash::new(digest.as_str()) {
            Ok(parsed) => Self::argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Hashes with the configured algorithm and verifies any supported digest.
///
/// Stored digests are checked by the algorithm that produced them, whatever
/// the configured one is.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveHasher {
    algorithm: HashAlgorithm,
    bcrypt: BcryptHasher,
    argon2: Argon2Hasher,
}

impl AdaptiveHasher {
    pub fn new(algorithm: HashAlgorithm, cost: u32) -> Self {
        Self {
            algorithm,
            bcrypt: BcryptHasher::new(cost),
            argon2: Argon2Hasher,
        }
    }

    /// Algorithm used for new digests
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn for_algorithm(&self, algorithm: HashAlgorithm) -> &dyn CredentialHasher {
        match algorithm {
            HashAlgorithm::Bcrypt => &self.bcrypt,
            HashAlgorithm::Argon2 => &self.argon2,
        }
    }
}

impl CredentialHasher for AdaptiveHasher {
    fn hash(&self, plain_text: &str) -> DomainResult<PasswordDigest> {
        self.for_algorithm(self.algorithm).hash(plain_text)
    }

    fn verify(&self, plain_text: &str, digest: &PasswordDigest) -> bool {
        match HashAlgorithm::of_digest(digest) {
            Some(algorithm) => {
                if algorithm != self.algorithm {
                    tracing::debug!(
                        stored = %algorithm,
                        configured = %self.algorithm,
                        "Verifying digest from a non-default algorithm"
                    );
                }
                self.for_algorithm(algorithm).verify(plain_text, digest)
            }
            None => {
                tracing::warn!("Stored password digest has an unrecognised format");
                false
            }
        }
    }
}
