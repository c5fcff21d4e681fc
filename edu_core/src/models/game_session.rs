//! Recorded plays of the learning games

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::Record;
use crate::validation::validate_slug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
    Abandoned,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::InProgress => write!(f, "in_progress"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "abandoned" => Ok(SessionStatus::Abandoned),
            _ => Err(format!("Invalid session status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: String,
    pub user_id: String,
    pub game_key: String,
    pub score: i64,
    pub status: SessionStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGameSessionInput {
    #[validate(length(min = 1, max = 64, message = "User id is required"))]
    pub user_id: String,

    #[validate(
        length(min = 1, max = 64, message = "Game key must be between 1 and 64 characters"),
        custom(function = "validate_slug", message = "Game key must be a lowercase slug")
    )]
    pub game_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGameSessionInput {
    #[validate(range(min = 0, message = "Score cannot be negative"))]
    pub score: Option<i64>,

    pub status: Option<SessionStatus>,
}

/// `completed_at` is stamped the first time a session reaches `completed`
/// and never moves afterwards.
pub(crate) fn completion_time(
    current: Option<DateTime<Utc>>,
    status: SessionStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (current, status) {
        (Some(at), _) => Some(at),
        (None, SessionStatus::Completed) => Some(now),
        (None, _) => None,
    }
}

impl Record for GameSession {
    type CreateInput = CreateGameSessionInput;
    type UpdateInput = UpdateGameSessionInput;

    const KIND: &'static str = "Game session";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }

    fn materialize(id: String, input: CreateGameSessionInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: input.user_id,
            game_key: input.game_key,
            score: 0,
            status: SessionStatus::InProgress,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: UpdateGameSessionInput, now: DateTime<Utc>) {
        if let Some(score) = input.score {
            self.score = score;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        self.completed_at = completion_time(self.completed_at, self.status, now);
        self.updated_at = now;
    }
}
