//! SeaORM account store against an in-memory SQLite database.

use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use auth_service_lib::infra::Database;
use auth_service_lib::repository::entities::account::{self, Entity as AccountEntity};
use auth_service_lib::repository::{AccountRepository, AccountStore, StoreError};
use common::DatabaseConfig;
use domain::{NewAccount, PasswordDigest};

// One connection: every SQLite in-memory connection is its own database.
async fn database() -> Database {
    Database::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .unwrap()
}

fn new_account(email: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        name: "Test User".to_string(),
        password_hash: PasswordDigest::from_hash("$2b$04$stored-digest"),
    }
}

async fn count_by_email(db: &Database, email: &str) -> u64 {
    AccountEntity::find()
        .filter(account::Column::Email.eq(email))
        .count(&db.get_connection())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_insert_and_find_round_trip() {
    let db = database().await;
    let repo = AccountRepository::new(db.get_connection());

    let created = repo.insert(new_account("a@x.com")).await.unwrap();
    let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();

    assert_eq!(found.id, created.id);
    assert_eq!(found.email, "a@x.com");
    assert_eq!(found.name, "Test User");
    assert_eq!(found.password_hash.as_str(), "$2b$04$stored-digest");
}

#[tokio::test]
async fn test_unique_index_maps_to_conflict() {
    let db = database().await;
    let repo = AccountRepository::new(db.get_connection());
    repo.insert(new_account("a@x.com")).await.unwrap();

    let result = repo.insert(new_account("a@x.com")).await;

    assert!(matches!(result, Err(StoreError::Conflict(email)) if email == "a@x.com"));
    assert_eq!(count_by_email(&db, "a@x.com").await, 1);
}

#[tokio::test]
async fn test_missing_email_is_none() {
    let db = database().await;
    let repo = AccountRepository::new(db.get_connection());

    assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_inserts_single_winner() {
    let db = database().await;
    let repo = Arc::new(AccountRepository::new(db.get_connection()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.insert(new_account("race@x.com")).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert!(matches!(err, StoreError::Conflict(_))),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(count_by_email(&db, "race@x.com").await, 1);
}

#[tokio::test]
async fn test_ping_and_migration_status() {
    let db = database().await;
    let repo = AccountRepository::new(db.get_connection());

    assert!(repo.ping().await.is_ok());

    let status = db.migration_status().await.unwrap();
    assert_eq!(status.len(), 1);
    assert!(status.iter().all(|(_, applied)| *applied));
}
