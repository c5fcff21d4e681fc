//! The generic repository contract and its SQLite adapters

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{DbContentItem, DbGameSession, DbUser};
use crate::error::{AppError, Result};
use crate::models::{
    game_session::SessionStatus, user::normalize_email, ContentItem, CreateContentInput,
    CreateGameSessionInput, CreateUserInput, GameSession, UpdateContentInput,
    UpdateGameSessionInput, UpdateUserInput, User,
};

/// CRUD surface every persistence adapter exposes for one entity type.
///
/// Identifiers are opaque text chosen by the adapter. `find_by_id` reports
/// absence as `None`; `update` and `delete` report it as
/// [`AppError::NotFound`]. Store rejections surface as
/// [`AppError::Storage`] or [`AppError::Conflict`] and are never retried here.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    type CreateInput;
    type UpdateInput;

    async fn find_all(&self) -> Result<Vec<T>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;
    async fn create(&self, input: Self::CreateInput) -> Result<T>;
    async fn update(&self, id: &str, input: Self::UpdateInput) -> Result<T>;
    async fn delete(&self, id: &str) -> Result<()>;
}

fn not_found(kind: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", kind, id))
}

/// Like `AppError::from`, but names the resource on uniqueness violations.
fn store_error(kind: &str, err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::Conflict(_) => AppError::Conflict(format!("{} already exists", kind)),
        other => other,
    }
}

async fn delete_row(pool: &SqlitePool, sql: &str, kind: &str, id: &str) -> Result<()> {
    let result = sqlx::query(sql)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| store_error(kind, e))?;

    if result.rows_affected() == 0 {
        return Err(not_found(kind, id));
    }

    Ok(())
}

#[derive(Clone)]
pub struct ContentRepository {
    pool: SqlitePool,
}

impl ContentRepository {
    const KIND: &'static str = "Content item";

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<ContentItem> for ContentRepository {
    type CreateInput = CreateContentInput;
    type UpdateInput = UpdateContentInput;

    async fn find_all(&self) -> Result<Vec<ContentItem>> {
        let rows = sqlx::query_as::<_, DbContentItem>(r#"
            SELECT id, name, description, subject, grade_level, created_at, updated_at
            FROM content_items
            ORDER BY created_at, id
        "#)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list content items: {}", e);
            AppError::from(e)
        })?;

        rows.into_iter().map(DbContentItem::into_entity).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContentItem>> {
        let row = sqlx::query_as::<_, DbContentItem>(r#"
            SELECT id, name, description, subject, grade_level, created_at, updated_at
            FROM content_items
            WHERE id = ?
        "#)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        row.map(DbContentItem::into_entity).transpose()
    }

    async fn create(&self, input: CreateContentInput) -> Result<ContentItem> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, DbContentItem>(r#"
            INSERT INTO content_items (id, name, description, subject, grade_level, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, subject, grade_level, created_at, updated_at
        "#)
        .bind(Uuid::new_v4().to_string())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.subject)
        .bind(input.grade_level.map(i64::from))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(Self::KIND, e))?;

        row.into_entity()
    }

    async fn update(&self, id: &str, input: UpdateContentInput) -> Result<ContentItem> {
        let row = sqlx::query_as::<_, DbContentItem>(r#"
            UPDATE content_items
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                subject = COALESCE(?, subject),
                grade_level = COALESCE(?, grade_level),
                updated_at = ?
            WHERE id = ?
            RETURNING id, name, description, subject, grade_level, created_at, updated_at
        "#)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.subject)
        .bind(input.grade_level.map(i64::from))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(Self::KIND, e))?;

        match row {
            Some(row) => row.into_entity(),
            None => Err(not_found(Self::KIND, id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        delete_row(&self.pool, "DELETE FROM content_items WHERE id = ?", Self::KIND, id).await
    }
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    const KIND: &'static str = "User";

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    type CreateInput = CreateUserInput;
    type UpdateInput = UpdateUserInput;

    async fn find_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, DbUser>(r#"
            SELECT id, email, display_name, role, is_active, created_at, updated_at
            FROM users
            ORDER BY created_at, id
        "#)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {}", e);
            AppError::from(e)
        })?;

        rows.into_iter().map(DbUser::into_entity).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, DbUser>(r#"
            SELECT id, email, display_name, role, is_active, created_at, updated_at
            FROM users
            WHERE id = ?
        "#)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        row.map(DbUser::into_entity).transpose()
    }

    async fn create(&self, input: CreateUserInput) -> Result<User> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, DbUser>(r#"
            INSERT INTO users (id, email, display_name, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, email, display_name, role, is_active, created_at, updated_at
        "#)
        .bind(Uuid::new_v4().to_string())
        .bind(normalize_email(&input.email))
        .bind(&input.display_name)
        .bind(input.role.unwrap_or_default().to_string())
        .bind(true)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(Self::KIND, e))?;

        row.into_entity()
    }

    async fn update(&self, id: &str, input: UpdateUserInput) -> Result<User> {
        let row = sqlx::query_as::<_, DbUser>(r#"
            UPDATE users
            SET display_name = COALESCE(?, display_name),
                role = COALESCE(?, role),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING id, email, display_name, role, is_active, created_at, updated_at
        "#)
        .bind(&input.display_name)
        .bind(input.role.map(|role| role.to_string()))
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(Self::KIND, e))?;

        match row {
            Some(row) => row.into_entity(),
            None => Err(not_found(Self::KIND, id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        delete_row(&self.pool, "DELETE FROM users WHERE id = ?", Self::KIND, id).await
    }
}

#[derive(Clone)]
pub struct GameSessionRepository {
    pool: SqlitePool,
}

impl GameSessionRepository {
    const KIND: &'static str = "Game session";

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<GameSession> for GameSessionRepository {
    type CreateInput = CreateGameSessionInput;
    type UpdateInput = UpdateGameSessionInput;

    async fn find_all(&self) -> Result<Vec<GameSession>> {
        let rows = sqlx::query_as::<_, DbGameSession>(r#"
            SELECT id, user_id, game_key, score, status, completed_at, created_at, updated_at
            FROM game_sessions
            ORDER BY created_at, id
        "#)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list game sessions: {}", e);
            AppError::from(e)
        })?;

        rows.into_iter().map(DbGameSession::into_entity).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<GameSession>> {
        let row = sqlx::query_as::<_, DbGameSession>(r#"
            SELECT id, user_id, game_key, score, status, completed_at, created_at, updated_at
            FROM game_sessions
            WHERE id = ?
        "#)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        row.map(DbGameSession::into_entity).transpose()
    }

    async fn create(&self, input: CreateGameSessionInput) -> Result<GameSession> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, DbGameSession>(r#"
            INSERT INTO game_sessions (id, user_id, game_key, score, status, completed_at, created_at, updated_at)
            VALUES (?, ?, ?, 0, ?, NULL, ?, ?)
            RETURNING id, user_id, game_key, score, status, completed_at, created_at, updated_at
        "#)
        .bind(Uuid::new_v4().to_string())
        .bind(&input.user_id)
        .bind(&input.game_key)
        .bind(SessionStatus::InProgress.to_string())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(Self::KIND, e))?;

        row.into_entity()
    }

    async fn update(&self, id: &str, input: UpdateGameSessionInput) -> Result<GameSession> {
        let now = Utc::now();
        let status = input.status.map(|status| status.to_string());

        // SET expressions see the pre-update row, so `COALESCE(?, status)` is the new status.
        let row = sqlx::query_as::<_, DbGameSession>(r#"
            UPDATE game_sessions
            SET score = COALESCE(?, score),
                status = COALESCE(?, status),
                completed_at = CASE
                    WHEN completed_at IS NULL AND COALESCE(?, status) = 'completed' THEN ?
                    ELSE completed_at
                END,
                updated_at = ?
            WHERE id = ?
            RETURNING id, user_id, game_key, score, status, completed_at, created_at, updated_at
        "#)
        .bind(input.score)
        .bind(&status)
        .bind(&status)
        .bind(now)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(Self::KIND, e))?;

        match row {
            Some(row) => row.into_entity(),
            None => Err(not_found(Self::KIND, id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        delete_row(&self.pool, "DELETE FROM game_sessions WHERE id = ?", Self::KIND, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use crate::config::DatabaseConfig;
    use crate::database::{get_database_pool, run_migrations};

    async fn setup_test_db() -> (TempDir, SqlitePool) {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("edu.db").display()),
            ..Default::default()
        };

        let pool = get_database_pool(&config).await.unwrap();
        run_migrations(pool.clone()).await.unwrap();

        (dir, pool)
    }

    fn user_input(email: &str) -> CreateUserInput {
        CreateUserInput {
            email: email.to_string(),
            display_name: "Grace".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_content_repository_crud() {
        let (_dir, pool) = setup_test_db().await;
        let repo = ContentRepository::new(pool);

        let created = repo
            .create(CreateContentInput {
                subject: Some("Mathematics".to_string()),
                grade_level: Some(9),
                ..CreateContentInput::named("Alg101")
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Alg101");
        assert_eq!(created.grade_level, Some(9));

        let fetched = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created.clone()));

        let updated = repo
            .update(
                &created.id,
                UpdateContentInput {
                    name: Some("Algebra I".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Algebra I");
        assert_eq!(updated.subject.as_deref(), Some("Mathematics"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_repository_unique_email() {
        let (_dir, pool) = setup_test_db().await;
        let repo = UserRepository::new(pool);

        let user = repo.create(user_input("grace@example.com")).await.unwrap();
        assert_eq!(user.role, crate::models::UserRole::Student);

        let err = repo.create(user_input("GRACE@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "User already exists"));
        assert_eq!(repo.find_all().await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn test_game_session_completion_and_foreign_key() {
        let (_dir, pool) = setup_test_db().await;
        let users = UserRepository::new(pool.clone());
        let sessions = GameSessionRepository::new(pool);

        let orphan = sessions
            .create(CreateGameSessionInput {
                user_id: "no-such-user".to_string(),
                game_key: "fraction-race".to_string(),
            })
            .await
            .unwrap_err();
        assert!(orphan.is_storage_error());

        let user = users.create(user_input("kid@example.com")).await.unwrap();
        let session = sessions
            .create(CreateGameSessionInput {
                user_id: user.id.clone(),
                game_key: "fraction-race".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.score, 0);

        let completed = sessions
            .update(
                &session.id,
                UpdateGameSessionInput {
                    score: Some(90),
                    status: Some(SessionStatus::Completed),
                },
            )
            .await
            .unwrap();
        let stamped = completed.completed_at.unwrap();

        let rescored = sessions
            .update(
                &session.id,
                UpdateGameSessionInput {
                    score: Some(95),
                    status: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(rescored.score, 95);
        assert_eq!(rescored.status, SessionStatus::Completed);
        assert_eq!(rescored.completed_at, Some(stamped));

        users.delete(&user.id).await.unwrap();
        assert!(sessions.find_by_id(&session.id).await.unwrap().is_none());
    }
}
