use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    error::Result,
    extractors::{EnvelopePath, EnvelopeQuery},
    models::{ApiResponse, GameSession, ListQuery},
    AppState,
};

/// Paged game sessions of one user. An unknown user is a `404`, not an
/// empty page.
pub async fn handle_user_game_sessions(
    State(state): State<AppState>,
    EnvelopePath(user_id): EnvelopePath<String>,
    EnvelopeQuery(query): EnvelopeQuery<ListQuery>,
) -> Result<impl IntoResponse> {
    let user = state.users.get(&user_id).await?;

    let page = state
        .game_sessions
        .list_matching(query, |session: &GameSession| session.user_id == user.id)
        .await?;

    Ok(Json(ApiResponse::success(page)))
}
