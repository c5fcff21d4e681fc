use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::{
    handlers::{
        fallback::{handle_method_not_allowed, handle_not_found},
        health::handle_health,
        resources::resource_routes,
        users::handle_user_game_sessions,
    },
    models::{
        ApiResponse, ContentItem, CreateContentInput, CreateGameSessionInput, CreateUserInput,
        GameSession, UpdateContentInput, UpdateGameSessionInput, UpdateUserInput, User,
    },
    AppState,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .nest(
            "/api/v1/content",
            resource_routes::<ContentItem, CreateContentInput, UpdateContentInput>(),
        )
        .nest(
            "/api/v1/users",
            resource_routes::<User, CreateUserInput, UpdateUserInput>()
                .route("/:id/game-sessions", get(handle_user_game_sessions)),
        )
        .nest(
            "/api/v1/game-sessions",
            resource_routes::<GameSession, CreateGameSessionInput, UpdateGameSessionInput>(),
        )
        // Must come after every route so it reaches the nested ones too.
        .method_not_allowed_fallback(handle_method_not_allowed)
        .fallback(handle_not_found)
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/health",
            "content": "/api/v1/content",
            "users": "/api/v1/users",
            "user_game_sessions": "/api/v1/users/{id}/game-sessions",
            "game_sessions": "/api/v1/game-sessions"
        }
    })))
}
