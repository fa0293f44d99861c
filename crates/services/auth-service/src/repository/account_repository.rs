//! SeaORM-backed account store.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, SqlErr, Statement,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use super::{AccountStore, StoreError};
use domain::{Account, NewAccount};

/// Account store on a relational database.
///
/// Email uniqueness rests on the `accounts.email` unique index, so it holds
/// across every service instance sharing the database.
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let email = account.email.clone();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(account.email),
            name: Set(account.name),
            password_hash: Set(account.password_hash.into_string()),
            created_at: Set(Utc::now()),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(Account::from(model)),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(StoreError::Conflict(email)),
                _ => Err(StoreError::Database(err)),
            },
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
