//! Auth Gateway Library
//!
//! HTTP front end for the auth service: account creation, registration and
//! login over JSON, plus health and OpenAPI routes.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use auth_service_lib::build_authenticator;
use auth_service_lib::config::{AuthConfig, ConfigError};
use auth_service_lib::infra::Database;
use auth_service_lib::repository::{AccountRepository, AccountStore, InMemoryAccountStore};
use common::DatabaseConfig;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the application router over the given store.
pub fn build_app(config: &AuthConfig, store: Arc<dyn AccountStore>) -> Result<Router, ConfigError> {
    let auth_service = Arc::new(build_authenticator(config, Arc::clone(&store))?);
    let state = AppState::new(auth_service, store);

    Ok(create_router(state).layer(TraceLayer::new_for_http()))
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(
    config: GatewayConfig,
    in_memory: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Pick the account store
    let store: Arc<dyn AccountStore> = if in_memory {
        warn!("Using the in-memory account store; accounts are lost on exit");
        Arc::new(InMemoryAccountStore::new())
    } else {
        let db = Database::connect(&config.database).await?;
        Arc::new(AccountRepository::new(db.get_connection()))
    };

    // Build router
    let app = build_app(&config.auth, store)?;

    // Build address
    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    info!("Auth gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run a migration command against the account database.
pub async fn run_migrations(
    config: &DatabaseConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            warn!("Resetting database and running all migrations");
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}
