//! Auth Gateway - HTTP API for account creation, registration and login.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::config::{database_from_env, GatewayConfig};
use gateway_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "auth-gateway")]
#[command(about = "Credential service HTTP API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
        /// Keep accounts in process memory instead of the database
        #[arg(long)]
        in_memory: bool,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateCommand,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateCommand {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            let mut config = GatewayConfig::from_env()?;
            if let Some(host) = host {
                config.service.host = host;
            }
            if let Some(port) = port {
                config.service.port = port;
            }

            gateway_lib::run_server(config, in_memory).await?;
        }
        Commands::Migrate { action } => {
            let database = database_from_env()?;
            gateway_lib::run_migrations(&database, action.into()).await?;
        }
    }

    Ok(())
}
