//! Repository layer for account persistence.

mod account_repository;
pub mod entities;
mod memory;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use domain::{Account, NewAccount};

pub use account_repository::AccountRepository;
pub use memory::InMemoryAccountStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another account already uses this email
    #[error("account with email {0} already exists")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Account persistence contract.
///
/// `insert` must be atomic with respect to email uniqueness: of any number
/// of concurrent inserts sharing an email, exactly one succeeds and the
/// rest get [`StoreError::Conflict`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account, assigning its id and creation time
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Find an account by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Check the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
