//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password::PasswordDigest;

/// Registered account.
///
/// Deliberately not `Serialize`: the only view that leaves the service is
/// [`AccountResponse`], built through [`Account::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    /// Unique, matched exactly (case-sensitive, untrimmed)
    pub email: String,
    pub name: String,
    pub password_hash: PasswordDigest,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Project the account to the view returned to callers.
    pub fn sanitize(&self) -> AccountResponse {
        AccountResponse::from(self)
    }
}

/// Account ready for insertion; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub password_hash: PasswordDigest,
}

/// Account creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    /// Account email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Plain text password
    pub password: String,
}

/// Registration input: creation plus a confirmation of the password
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAccount {
    pub email: String,
    pub name: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterAccount {
    /// Whether the confirmation matches the password exactly.
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }
}

impl From<RegisterAccount> for CreateAccount {
    fn from(register: RegisterAccount) -> Self {
        Self {
            email: register.email,
            name: register.name,
            password: register.password,
        }
    }
}

/// Login input
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Account email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            created_at: account.created_at,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            created_at: account.created_at,
        }
    }
}

/// Successful register/login envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginResponse {
    /// Sanitized account
    pub account: AccountResponse,
    /// Signed bearer token
    #[cfg_attr(feature = "openapi", schema(example = "eyJhbGciOiJIUzI1NiJ9..."))]
    pub token: String,
}
