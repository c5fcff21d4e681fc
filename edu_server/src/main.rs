//! Main entry point for the education platform API server

use anyhow::{Context, Result};
use chrono::Utc;
use edu_core::{
    config::{LogFormat, LoggingConfig},
    create_app_with_config,
    database::MigrationManager,
    get_database_pool, run_migrations, run_server,
    utils::format_date,
    AppConfig, AppState, DatabaseManager, StorageBackend,
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("Invalid bind address")?;

    let state = match config.database.backend {
        StorageBackend::Sqlite => {
            let db_manager = initialize_database(&config).await?;
            AppState::with_database(db_manager)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory()
        }
    };

    info!(
        "{} v{} starting on {} ({:?} storage)",
        state.app_name,
        state.version,
        format_date(Utc::now()),
        state.storage_backend
    );

    let db_manager = state.db_manager.clone();
    let app = create_app_with_config(state, &config);

    run_server(app, addr).await?;

    if let Some(db_manager) = db_manager {
        db_manager.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn initialize_database(config: &AppConfig) -> Result<DatabaseManager> {
    info!("Initializing database connection: {}", config.database.url);

    let pool = get_database_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    if config.database.migrate_on_start {
        run_migrations(pool.clone())
            .await
            .context("Failed to run database migrations")?;
    }

    match MigrationManager::new(pool.clone()).get_migration_history().await {
        Ok(history) => match history.last() {
            Some(latest) => info!(
                "Database schema at version {} ({}, applied {})",
                latest.version,
                latest.name,
                format_date(latest.applied_at)
            ),
            None => warn!("Database has no applied migrations; tables may be missing"),
        },
        Err(e) => warn!("Could not read migration history: {}", e),
    }

    Ok(DatabaseManager::new(pool))
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "edu_core={level},edu_server={level},tower_http=info",
            level = logging.level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init(),
    }
}
