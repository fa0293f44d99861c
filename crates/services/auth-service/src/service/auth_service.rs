//! Authentication service - account creation, registration and login.
//!
//! Composes the account store, the credential hasher and the token issuer.
//! Every failure leaves here as a [`DomainError`]; store and signing details
//! are logged and replaced by `StorageFailure`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use domain::{
    Account, AccountResponse, CreateAccount, CredentialHasher, Credentials, DomainError,
    DomainResult, LoginResponse, NewAccount, PasswordDigest, RegisterAccount,
};

use crate::repository::{AccountStore, StoreError};
use crate::token::{TokenIssuer, TokenPayload};

/// Hashed once and verified against when the email is unknown, so both
/// login failure paths do the same amount of work.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and return it without credential material
    async fn create_account(&self, input: CreateAccount) -> DomainResult<AccountResponse>;

    /// Create an account after checking the password confirmation, then log in
    async fn register(&self, input: RegisterAccount) -> DomainResult<LoginResponse>;

    /// Verify credentials and issue a token
    async fn login(&self, credentials: Credentials) -> DomainResult<LoginResponse>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
    issuer: Arc<dyn TokenIssuer>,
    operation_timeout: Duration,
    decoy_digest: OnceCell<PasswordDigest>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn CredentialHasher>,
        issuer: Arc<dyn TokenIssuer>,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            issuer,
            operation_timeout,
            decoy_digest: OnceCell::new(),
        }
    }

    /// Run `operation` under the configured timeout.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    operation,
                    timeout = ?self.operation_timeout,
                    "Operation timed out"
                );
                Err(DomainError::StorageFailure)
            }
        }
    }

    /// Hash on the blocking pool; bcrypt at cost 10 takes tens of milliseconds.
    async fn hash_password(&self, password: String) -> DomainResult<PasswordDigest> {
        let hasher = Arc::clone(&self.hasher);
        self.bounded("hash_password", async move {
            tokio::task::spawn_blocking(move || hasher.hash(&password))
                .await
                .map_err(|e| {
                    error!("Hashing task failed: {}", e);
                    DomainError::StorageFailure
                })?
        })
        .await
    }

    async fn verify_password(
        &self,
        password: String,
        digest: PasswordDigest,
    ) -> DomainResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        self.bounded("verify_password", async move {
            tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
                .await
                .map_err(|e| {
                    error!("Verification task failed: {}", e);
                    DomainError::StorageFailure
                })
        })
        .await
    }

    async fn decoy_digest(&self) -> DomainResult<&PasswordDigest> {
        self.decoy_digest
            .get_or_try_init(|| self.hash_password(DECOY_PASSWORD.to_string()))
            .await
    }

    async fn find_account(&self, email: &str) -> DomainResult<Option<Account>> {
        self.bounded("find_by_email", async {
            self.store.find_by_email(email).await.map_err(storage_failure)
        })
        .await
    }

    async fn insert_account(&self, account: NewAccount) -> DomainResult<Account> {
        self.bounded("insert", async {
            self.store.insert(account).await.map_err(|err| match err {
                StoreError::Conflict(email) => DomainError::duplicate(email),
                other => storage_failure(other),
            })
        })
        .await
    }

    fn issue_token(&self, account: &Account) -> DomainResult<String> {
        self.issuer
            .issue(&TokenPayload::new(account.id))
            .map_err(|e| {
                error!("Token signing failed: {}", e);
                DomainError::StorageFailure
            })
    }
}

fn storage_failure(err: StoreError) -> DomainError {
    error!("Account store failure: {}", err);
    DomainError::StorageFailure
}

#[async_trait]
impl AuthService for Authenticator {
    async fn create_account(&self, input: CreateAccount) -> DomainResult<AccountResponse> {
        let CreateAccount {
            email,
            name,
            password,
        } = input;

        let password_hash = self.hash_password(password).await?;

        let account = match self
            .insert_account(NewAccount {
                email,
                name,
                password_hash,
            })
            .await
        {
            Ok(account) => account,
            Err(err @ DomainError::DuplicateIdentity(_)) => {
                info!("Account creation rejected: email already registered");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        info!(account_id = %account.id, "Account created");
        Ok(account.sanitize())
    }

    async fn register(&self, input: RegisterAccount) -> DomainResult<LoginResponse> {
        // Checked before any hashing or store access
        if !input.passwords_match() {
            warn!("Registration rejected: password confirmation mismatch");
            return Err(DomainError::PasswordMismatch);
        }

        let credentials = Credentials {
            email: input.email.clone(),
            password: input.password.clone(),
        };

        self.create_account(CreateAccount::from(input)).await?;

        // Same path as an ordinary login, plaintext password included
        self.login(credentials).await
    }

    async fn login(&self, credentials: Credentials) -> DomainResult<LoginResponse> {
        let Credentials { email, password } = credentials;

        let account = self.find_account(&email).await?;

        let digest = match &account {
            Some(account) => account.password_hash.clone(),
            None => match self.decoy_digest().await {
                Ok(decoy) => decoy.clone(),
                Err(_) => return Err(DomainError::InvalidCredentials),
            },
        };

        let password_valid = self.verify_password(password, digest).await?;

        // One outcome and one log line for unknown email and wrong password
        let account = match account {
            Some(account) if password_valid => account,
            _ => {
                warn!("Login rejected: invalid credentials");
                return Err(DomainError::InvalidCredentials);
            }
        };

        let token = self.issue_token(&account)?;

        info!(account_id = %account.id, "Login succeeded");
        Ok(LoginResponse {
            account: account.sanitize(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use sea_orm::DbErr;
    use uuid::Uuid;

    use crate::repository::MockAccountStore;
    use crate::token::{JwtIssuer, TokenError};
    use domain::{BcryptHasher, ErrorKind};

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn hasher() -> Arc<dyn CredentialHasher> {
        Arc::new(BcryptHasher::new(4))
    }

    fn authenticator(store: MockAccountStore) -> Authenticator {
        Authenticator::new(
            Arc::new(store),
            hasher(),
            Arc::new(JwtIssuer::new(SECRET, 1)),
            Duration::from_secs(5),
        )
    }

    fn stored_account(email: &str, password: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: BcryptHasher::new(4).hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn create_input() -> CreateAccount {
        CreateAccount {
            email: "a@x.com".to_string(),
            name: "A".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_account_stores_digest_not_plaintext() {
        let mut store = MockAccountStore::new();
        store.expect_insert().times(1).returning(|new_account| {
            assert_ne!(new_account.password_hash.as_str(), "secret123");
            assert!(BcryptHasher::new(4).verify("secret123", &new_account.password_hash));
            Ok(Account {
                id: Uuid::new_v4(),
                email: new_account.email,
                name: new_account.name,
                password_hash: new_account.password_hash,
                created_at: Utc::now(),
            })
        });

        let created = authenticator(store).create_account(create_input()).await.unwrap();

        assert_eq!(created.email, "a@x.com");
        assert_eq!(created.name, "A");
    }

    #[tokio::test]
    async fn test_create_account_conflict_is_duplicate_identity() {
        let mut store = MockAccountStore::new();
        store
            .expect_insert()
            .returning(|new_account| Err(StoreError::Conflict(new_account.email)));

        let err = authenticator(store)
            .create_account(create_input())
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::DuplicateIdentity("a@x.com".to_string()));
    }

    #[tokio::test]
    async fn test_create_account_database_error_is_opaque() {
        let mut store = MockAccountStore::new();
        store.expect_insert().returning(|_| {
            Err(StoreError::Database(DbErr::Conn(sea_orm::RuntimeErr::Internal(
                "connection refused at db:5432".to_string(),
            ))))
        });

        let err = authenticator(store)
            .create_account(create_input())
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::StorageFailure);
        assert!(!err.to_string().contains("5432"));
    }

    #[tokio::test]
    async fn test_register_mismatch_never_touches_store() {
        let mut store = MockAccountStore::new();
        store.expect_insert().times(0);
        store.expect_find_by_email().times(0);

        let err = authenticator(store)
            .register(RegisterAccount {
                email: "a@x.com".to_string(),
                name: "A".to_string(),
                password: "secret123".to_string(),
                password_confirmation: "secret321".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::PasswordMismatch);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_identical() {
        let mut store = MockAccountStore::new();
        store.expect_find_by_email().returning(|email| {
            if email == "known@x.com" {
                Ok(Some(stored_account("known@x.com", "secret123")))
            } else {
                Ok(None)
            }
        });
        let auth = authenticator(store);

        let unknown = auth
            .login(Credentials {
                email: "unknown@x.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();
        let wrong = auth
            .login(Credentials {
                email: "known@x.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(unknown, DomainError::InvalidCredentials);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_login_decoy_password_on_unknown_email_still_rejected() {
        let mut store = MockAccountStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));

        let err = authenticator(store)
            .login(Credentials {
                email: "ghost@x.com".to_string(),
                password: DECOY_PASSWORD.to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_store_failure_is_storage_failure() {
        let mut store = MockAccountStore::new();
        store
            .expect_find_by_email()
            .returning(|_| Err(StoreError::Unavailable("pool exhausted".to_string())));

        let err = authenticator(store)
            .login(Credentials {
                email: "a@x.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[tokio::test]
    async fn test_login_signing_failure_is_storage_failure() {
        struct FailingIssuer;

        impl TokenIssuer for FailingIssuer {
            fn issue(&self, _payload: &TokenPayload) -> Result<String, TokenError> {
                Err(TokenError::Signing(
                    jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into(),
                ))
            }
        }

        let mut store = MockAccountStore::new();
        store
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_account("a@x.com", "secret123"))));

        let auth = Authenticator::new(
            Arc::new(store),
            hasher(),
            Arc::new(FailingIssuer),
            Duration::from_secs(5),
        );
        let err = auth
            .login(Credentials {
                email: "a@x.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::StorageFailure);
    }

    #[tokio::test]
    async fn test_slow_store_times_out_as_storage_failure() {
        struct SlowStore;

        #[async_trait]
        impl AccountStore for SlowStore {
            async fn insert(&self, _account: NewAccount) -> Result<Account, StoreError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(StoreError::Unavailable("unreachable".to_string()))
            }

            async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, StoreError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(None)
            }

            async fn ping(&self) -> Result<(), StoreError> {
                Ok(())
            }
        }

        let auth = Authenticator::new(
            Arc::new(SlowStore),
            hasher(),
            Arc::new(JwtIssuer::new(SECRET, 1)),
            Duration::from_millis(50),
        );

        let err = auth
            .login(Credentials {
                email: "a@x.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::StorageFailure);
    }

    #[tokio::test]
    async fn test_login_looks_up_exact_email() {
        let mut store = MockAccountStore::new();
        store
            .expect_find_by_email()
            .times(1)
            .returning(|email| {
                assert_eq!(email, "Mixed@X.com");
                Ok(None)
            });

        let _ = authenticator(store)
            .login(Credentials {
                email: "Mixed@X.com".to_string(),
                password: "secret123".to_string(),
            })
            .await;
    }
}
