use sqlx::{SqlitePool, Row};
use tracing::{info, error};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};

pub struct MigrationManager {
    pool: SqlitePool,
}

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Starting database migrations");

        self.create_migrations_table().await?;

        let current_version = self.get_current_version().await?;
        info!("Current migration version: {}", current_version);

        let mut applied_count = 0;

        for migration in self.get_migrations() {
            if migration.version > current_version {
                info!("Applying migration {}: {}", migration.version, migration.name);
                self.apply_migration(&migration).await?;
                applied_count += 1;
            }
        }

        if applied_count > 0 {
            info!("Applied {} migrations successfully", applied_count);
        } else {
            info!("No new migrations to apply");
        }

        Ok(())
    }

    async fn create_migrations_table(&self) -> Result<()> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )
        "#)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn get_current_version(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COALESCE(MAX(version), 0) as version FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        row.try_get("version").map_err(AppError::from)
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        for statement in migration.sql_statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to execute migration {} statement: {}", migration.version, e);
                    AppError::from(e)
                })?;
        }

        sqlx::query(r#"
            INSERT INTO _migrations (version, name, checksum)
            VALUES (?, ?, ?)
        "#)
        .bind(migration.version)
        .bind(migration.name)
        .bind(migration.checksum)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(())
    }

    fn get_migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                version: 1,
                name: "create_users_table",
                checksum: "users_v1",
                sql_statements: &[
                    r#"
                    CREATE TABLE users (
                        id TEXT PRIMARY KEY,
                        email TEXT NOT NULL UNIQUE,
                        display_name TEXT NOT NULL,
                        role TEXT NOT NULL DEFAULT 'student',
                        is_active BOOLEAN NOT NULL DEFAULT 1,
                        created_at TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    )
                    "#,
                    "CREATE INDEX idx_users_role ON users(role)",
                    "CREATE INDEX idx_users_created_at ON users(created_at)",
                ],
            },
            Migration {
                version: 2,
                name: "create_content_items_table",
                checksum: "content_items_v1",
                sql_statements: &[
                    r#"
                    CREATE TABLE content_items (
                        id TEXT PRIMARY KEY,
                        name TEXT NOT NULL,
                        description TEXT,
                        subject TEXT,
                        grade_level INTEGER CHECK (grade_level BETWEEN 1 AND 12),
                        created_at TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    )
                    "#,
                    "CREATE INDEX idx_content_items_name ON content_items(name)",
                    "CREATE INDEX idx_content_items_created_at ON content_items(created_at)",
                ],
            },
            Migration {
                version: 3,
                name: "create_game_sessions_table",
                checksum: "game_sessions_v1",
                sql_statements: &[
                    r#"
                    CREATE TABLE game_sessions (
                        id TEXT PRIMARY KEY,
                        user_id TEXT NOT NULL,
                        game_key TEXT NOT NULL,
                        score INTEGER NOT NULL DEFAULT 0 CHECK (score >= 0),
                        status TEXT NOT NULL DEFAULT 'in_progress',
                        completed_at TEXT,
                        created_at TEXT NOT NULL,
                        updated_at TEXT NOT NULL,
                        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                    )
                    "#,
                    "CREATE INDEX idx_game_sessions_user_id ON game_sessions(user_id)",
                    "CREATE INDEX idx_game_sessions_game_key ON game_sessions(game_key)",
                ],
            },
        ]
    }

    pub async fn get_migration_history(&self) -> Result<Vec<MigrationRecord>> {
        let rows = sqlx::query(r#"
            SELECT version, name, applied_at, checksum
            FROM _migrations
            ORDER BY version
        "#)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        rows.into_iter()
            .map(|row| -> std::result::Result<MigrationRecord, sqlx::Error> {
                Ok(MigrationRecord {
                    version: row.try_get("version")?,
                    name: row.try_get("name")?,
                    applied_at: row.try_get("applied_at")?,
                    checksum: row.try_get("checksum")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }
}

struct Migration {
    version: i64,
    name: &'static str,
    checksum: &'static str,
    sql_statements: &'static [&'static str],
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

pub async fn run_migrations(pool: SqlitePool) -> Result<()> {
    let migration_manager = MigrationManager::new(pool);
    migration_manager.run_migrations().await
}
