//! Domain layer - accounts, credentials and the error taxonomy.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod account;
pub mod constants;
pub mod error;
pub mod password;

pub use account::{
    Account, AccountResponse, CreateAccount, Credentials, LoginResponse, NewAccount,
    RegisterAccount,
};
pub use constants::*;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use password::{
    AdaptiveHasher, Argon2Hasher, BcryptHasher, CredentialHasher, HashAlgorithm, PasswordDigest,
};
