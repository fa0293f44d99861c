//! Domain-level errors.
//!
//! Every credential operation resolves to one of these. They carry no
//! transport or storage detail, so callers can match on them directly and
//! the HTTP layer can map them without leaking internals.

use thiserror::Error;

/// Coarse error category a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller input violated a precondition
    Validation,
    /// Email already registered
    DuplicateIdentity,
    /// Unknown email or wrong password
    InvalidCredentials,
    /// Opaque internal failure
    StorageFailure,
}

/// Errors returned by the credential operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password and its confirmation differ
    #[error("The password and its confirmation must be the same")]
    PasswordMismatch,

    /// Email already taken by another account
    #[error("The email {0} has already been used")]
    DuplicateIdentity(String),

    /// Email unknown or password incorrect; the two are never told apart
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Persistence, hashing or signing failed; details stay in the logs
    #[error("Internal error")]
    StorageFailure,
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a duplicate identity error for `email`
    pub fn duplicate(email: impl Into<String>) -> Self {
        DomainError::DuplicateIdentity(email.into())
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) | DomainError::PasswordMismatch => ErrorKind::Validation,
            DomainError::DuplicateIdentity(_) => ErrorKind::DuplicateIdentity,
            DomainError::InvalidCredentials => ErrorKind::InvalidCredentials,
            DomainError::StorageFailure => ErrorKind::StorageFailure,
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_mismatch_is_validation_kind() {
        assert_eq!(DomainError::PasswordMismatch.kind(), ErrorKind::Validation);
        assert_eq!(DomainError::validation("bad").kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_duplicate_message_names_email() {
        let err = DomainError::duplicate("a@x.com");
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);
        assert_eq!(err.to_string(), "The email a@x.com has already been used");
    }

    #[test]
    fn test_storage_failure_message_is_opaque() {
        assert_eq!(DomainError::StorageFailure.to_string(), "Internal error");
    }
}
