//! Core library for the education platform API: response envelope, the
//! generic repository contract with memory and SQLite adapters, and the
//! axum routes that expose them.

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
pub mod validation;

pub use config::{AppConfig, StorageBackend};
pub use database::{
    get_database_pool, run_migrations, ContentRepository, DatabaseManager, GameSessionRepository,
    Repository, UserRepository,
};
pub use error::{AppError, Result};
pub use handlers::create_routes;
pub use models::{ApiResponse, ApiResponseParts};
pub use services::{ContentService, GameSessionService, ResourceService, UserService};
pub use store::{MemoryRepository, Record};

use axum::{extract::FromRef, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use crate::models::{ContentItem, GameSession, User};

const APP_NAME: &str = "Education Platform API";

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub storage_backend: StorageBackend,
    pub db_manager: Option<DatabaseManager>,
    pub content: ContentService,
    pub users: UserService,
    pub game_sessions: GameSessionService,
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl AppState {
    /// Every resource backed by its own [`MemoryRepository`]. Game sessions
    /// reference users the same way the SQLite schema does.
    pub fn in_memory() -> Self {
        let users = MemoryRepository::<User>::new();
        let game_sessions = MemoryRepository::<GameSession>::new().references(&users);

        Self {
            app_name: APP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage_backend: StorageBackend::Memory,
            db_manager: None,
            content: ContentService::new(
                Arc::new(MemoryRepository::<ContentItem>::new()),
                "Content item",
            ),
            users: UserService::new(Arc::new(users), "User"),
            game_sessions: GameSessionService::new(Arc::new(game_sessions), "Game session"),
        }
    }

    /// Every resource backed by SQLite through `db_manager`'s pool. Migrations
    /// are expected to have run already.
    pub fn with_database(db_manager: DatabaseManager) -> Self {
        let pool = db_manager.pool().clone();

        Self {
            app_name: APP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage_backend: StorageBackend::Sqlite,
            content: ContentService::new(
                Arc::new(ContentRepository::new(pool.clone())),
                "Content item",
            ),
            users: UserService::new(Arc::new(UserRepository::new(pool.clone())), "User"),
            game_sessions: GameSessionService::new(
                Arc::new(GameSessionRepository::new(pool)),
                "Game session",
            ),
            db_manager: Some(db_manager),
        }
    }
}

impl FromRef<AppState> for ContentService {
    fn from_ref(state: &AppState) -> Self {
        state.content.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for GameSessionService {
    fn from_ref(state: &AppState) -> Self {
        state.game_sessions.clone()
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    create_routes()
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Other(anyhow::Error::new(e).context(format!("Failed to bind {}", addr))))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Other(e.into()))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
