//! JSON body extractor whose rejections use the response envelope

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::models::ApiResponse;

/// Drop-in for [`axum::Json`] that answers a malformed body with a 400
/// envelope instead of axum's plain-text rejection.
pub struct EnvelopeJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for EnvelopeJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = EnvelopeJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(EnvelopeJson(value)),
            Err(rejection) => Err(EnvelopeJsonRejection::from(rejection)),
        }
    }
}

#[derive(Debug)]
pub enum EnvelopeJsonRejection {
    MissingContentType,
    Syntax(String),
    Data(String),
    Other(String),
}

impl From<JsonRejection> for EnvelopeJsonRejection {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => EnvelopeJsonRejection::MissingContentType,
            JsonRejection::JsonSyntaxError(err) => EnvelopeJsonRejection::Syntax(err.body_text()),
            JsonRejection::JsonDataError(err) => EnvelopeJsonRejection::Data(err.body_text()),
            other => EnvelopeJsonRejection::Other(other.body_text()),
        }
    }
}

impl IntoResponse for EnvelopeJsonRejection {
    fn into_response(self) -> Response {
        tracing::debug!("Rejected request body: {}", self);

        let message = match self {
            EnvelopeJsonRejection::MissingContentType => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            EnvelopeJsonRejection::Syntax(_) => "Invalid JSON format".to_string(),
            EnvelopeJsonRejection::Data(msg) => msg,
            EnvelopeJsonRejection::Other(_) => "Failed to parse JSON request".to_string(),
        };

        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(message)),
        )
            .into_response()
    }
}

impl std::fmt::Display for EnvelopeJsonRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeJsonRejection::MissingContentType => write!(f, "Missing JSON content type"),
            EnvelopeJsonRejection::Syntax(msg) => write!(f, "Invalid JSON: {}", msg),
            EnvelopeJsonRejection::Data(msg) => write!(f, "Unexpected JSON shape: {}", msg),
            EnvelopeJsonRejection::Other(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for EnvelopeJsonRejection {}
