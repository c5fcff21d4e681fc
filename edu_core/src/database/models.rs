//! Row shapes as stored in SQLite and their conversion into API entities

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{ContentItem, GameSession, SessionStatus, User, UserRole};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbContentItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbContentItem {
    pub fn into_entity(self) -> Result<ContentItem> {
        let grade_level = self
            .grade_level
            .map(u8::try_from)
            .transpose()
            .map_err(|_| {
                AppError::Storage(format!("Content item {} has an invalid grade level", self.id))
            })?;

        Ok(ContentItem {
            id: self.id,
            name: self.name,
            description: self.description,
            subject: self.subject,
            grade_level,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbUser {
    pub fn into_entity(self) -> Result<User> {
        let role: UserRole = self.role.parse().map_err(AppError::Storage)?;

        Ok(User {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGameSession {
    pub id: String,
    pub user_id: String,
    pub game_key: String,
    pub score: i64,
    pub status: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbGameSession {
    pub fn into_entity(self) -> Result<GameSession> {
        let status: SessionStatus = self.status.parse().map_err(AppError::Storage)?;

        Ok(GameSession {
            id: self.id,
            user_id: self.user_id,
            game_key: self.game_key,
            score: self.score,
            status,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
