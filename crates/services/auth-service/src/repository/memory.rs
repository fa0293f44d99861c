//! In-process account store for tests and local development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{AccountStore, StoreError};
use domain::{Account, NewAccount};

/// Accounts held in a map keyed by email.
///
/// The check and the insert happen under one write lock, which gives the
/// same single-winner guarantee as a unique index within one process.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("account map lock poisoned".to_string())
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;

        if accounts.contains_key(&account.email) {
            return Err(StoreError::Conflict(account.email));
        }

        let stored = Account {
            id: Uuid::new_v4(),
            email: account.email,
            name: account.name,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        accounts.insert(stored.email.clone(), stored.clone());

        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.get(email).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.accounts.read().map(|_| ()).map_err(|_| poisoned())
    }
}
