use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use crate::{
    config::StorageBackend,
    error::Result,
    models::{ApiResponse, ApiResponseParts},
    utils::now_iso,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: String,
    pub storage: StorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<RecordCounts>,
    pub checked_at: String,
}

#[derive(Debug, Serialize)]
pub struct RecordCounts {
    pub content: usize,
    pub users: usize,
    pub game_sessions: usize,
}

async fn count_records(state: &AppState) -> Result<RecordCounts> {
    Ok(RecordCounts {
        content: state.content.count().await?,
        users: state.users.count().await?,
        game_sessions: state.game_sessions.count().await?,
    })
}

/// Reports `503` with the report attached when the database stops answering
/// or the stores cannot be read.
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let mut problems = Vec::new();

    let database = match &state.db_manager {
        None => None,
        Some(db_manager) => match db_manager.health_check().await {
            Ok(()) => Some("healthy"),
            Err(e) => {
                warn!("Health check found database unavailable: {}", e);
                problems.push("database unavailable");
                Some("unhealthy")
            }
        },
    };

    let records = match count_records(&state).await {
        Ok(counts) => Some(counts),
        Err(e) => {
            warn!("Health check could not count records: {}", e);
            problems.push("records unreadable");
            None
        }
    };

    let report = HealthReport {
        status: if problems.is_empty() { "healthy" } else { "unhealthy" },
        version: state.version.clone(),
        storage: state.storage_backend,
        database,
        records,
        checked_at: now_iso(),
    };

    if problems.is_empty() {
        return (StatusCode::OK, Json(ApiResponse::success(report)));
    }

    let body = ApiResponse::from_parts(ApiResponseParts {
        success: false,
        data: Some(report),
        error: Some(format!("Service degraded: {}", problems.join(", "))),
        ..Default::default()
    });
    (StatusCode::SERVICE_UNAVAILABLE, Json(body))
}
