use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};

use crate::models::ApiResponse;

pub async fn handle_not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(format!(
            "No route for {} {}",
            method,
            uri.path()
        ))),
    )
}

pub async fn handle_method_not_allowed(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::<()>::error(format!(
            "Method {} is not allowed on {}",
            method,
            uri.path()
        ))),
    )
}
