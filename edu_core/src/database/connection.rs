use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Row, SqlitePool,
};
use std::str::FromStr;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::constants::{DB_ACQUIRE_TIMEOUT, DB_BUSY_TIMEOUT, DB_IDLE_TIMEOUT, DB_MAX_LIFETIME};
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as test")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                AppError::from(e)
            })?;

        let test_value: i32 = row.try_get("test").map_err(AppError::from)?;

        if test_value == 1 {
            Ok(())
        } else {
            Err(AppError::Storage("Unexpected health check result".to_string()))
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Opens a pool against `config.url`. Pragmas are set on the connect
/// options so every pooled connection gets them, not just the first.
pub async fn get_database_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!("Connecting to database: {}", config.url);

    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(AppError::from)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(DB_BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .idle_timeout(DB_IDLE_TIMEOUT)
        .max_lifetime(DB_MAX_LIFETIME)
        .test_before_acquire(true)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_connection() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            backend: StorageBackend::Sqlite,
            url: format!("sqlite:{}", dir.path().join("edu.db").display()),
            ..Default::default()
        };

        let pool = get_database_pool(&config).await.unwrap();
        let db_manager = DatabaseManager::new(pool);

        db_manager.health_check().await.unwrap();

        let row = sqlx::query("PRAGMA foreign_keys")
            .fetch_one(db_manager.pool())
            .await
            .unwrap();
        let enabled: i64 = row.try_get(0).unwrap();
        assert_eq!(enabled, 1);

        db_manager.close().await;
    }
}
