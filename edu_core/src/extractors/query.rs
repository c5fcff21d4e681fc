//! Query string and path extractors whose rejections use the response envelope

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// [`axum::extract::Query`] that fails with a `400` envelope.
pub struct EnvelopeQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for EnvelopeQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(EnvelopeQuery(value)),
            Err(rejection) => {
                tracing::debug!("Rejected query string: {}", rejection);
                Err(AppError::BadRequest(rejection.body_text()))
            }
        }
    }
}

/// [`axum::extract::Path`] that fails with a `400` envelope.
pub struct EnvelopePath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for EnvelopePath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(EnvelopePath(value)),
            Err(rejection) => {
                tracing::debug!("Rejected path parameters: {}", rejection);
                Err(AppError::BadRequest(rejection.body_text()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};

    use crate::models::ListQuery;

    fn parts(uri: &str) -> Parts {
        Request::builder().uri(uri).body(Body::empty()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_query_parses_list_window() {
        let mut parts = parts("/content?limit=5&offset=10");

        let EnvelopeQuery(query) = EnvelopeQuery::<ListQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.offset, Some(10));
    }

    #[tokio::test]
    async fn test_bad_query_is_bad_request() {
        let mut parts = parts("/content?offset=-1");

        let err = EnvelopeQuery::<ListQuery>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("query string")));
    }
}
