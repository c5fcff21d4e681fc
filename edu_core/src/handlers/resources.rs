//! CRUD handlers written once over [`ResourceService`] and mounted per resource

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    error::Result,
    extractors::{EnvelopeJson, EnvelopePath, EnvelopeQuery},
    models::{ApiResponse, ApiResponseParts, ListQuery},
    services::ResourceService,
    AppState,
};

/// `GET /`, `POST /`, `GET /:id`, `PATCH /:id` and `DELETE /:id` for one
/// resource, resolved against whichever service `AppState` hands out for it.
pub fn resource_routes<T, C, U>() -> Router<AppState>
where
    T: Serialize + Send + 'static,
    C: DeserializeOwned + Validate + Send + 'static,
    U: DeserializeOwned + Validate + Send + 'static,
    ResourceService<T, C, U>: FromRef<AppState>,
{
    Router::new()
        .route("/", get(handle_list::<T, C, U>).post(handle_create::<T, C, U>))
        .route(
            "/:id",
            get(handle_get::<T, C, U>)
                .patch(handle_update::<T, C, U>)
                .delete(handle_delete::<T, C, U>),
        )
}

async fn handle_list<T, C, U>(
    State(service): State<ResourceService<T, C, U>>,
    EnvelopeQuery(query): EnvelopeQuery<ListQuery>,
) -> Result<impl IntoResponse>
where
    T: Serialize,
    C: Validate + Send,
    U: Validate + Send,
{
    info!(
        "Listing {} - limit: {:?}, offset: {:?}",
        service.resource(),
        query.limit,
        query.offset
    );

    let page = service.list(query).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn handle_get<T, C, U>(
    State(service): State<ResourceService<T, C, U>>,
    EnvelopePath(id): EnvelopePath<String>,
) -> Result<impl IntoResponse>
where
    T: Serialize,
    C: Validate + Send,
    U: Validate + Send,
{
    let entity = service.get(&id).await?;
    Ok(Json(ApiResponse::success(entity)))
}

async fn handle_create<T, C, U>(
    State(service): State<ResourceService<T, C, U>>,
    EnvelopeJson(input): EnvelopeJson<C>,
) -> Result<impl IntoResponse>
where
    T: Serialize,
    C: Validate + Send,
    U: Validate + Send,
{
    let entity = service.create(input).await?;
    let message = format!("{} created", service.resource());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(entity, message)),
    ))
}

async fn handle_update<T, C, U>(
    State(service): State<ResourceService<T, C, U>>,
    EnvelopePath(id): EnvelopePath<String>,
    EnvelopeJson(input): EnvelopeJson<U>,
) -> Result<impl IntoResponse>
where
    T: Serialize,
    C: Validate + Send,
    U: Validate + Send,
{
    let entity = service.update(&id, input).await?;
    Ok(Json(ApiResponse::success(entity)))
}

async fn handle_delete<T, C, U>(
    State(service): State<ResourceService<T, C, U>>,
    EnvelopePath(id): EnvelopePath<String>,
) -> Result<impl IntoResponse>
where
    C: Validate + Send,
    U: Validate + Send,
{
    service.delete(&id).await?;

    Ok(Json(ApiResponse::<()>::from_parts(ApiResponseParts {
        success: true,
        message: Some(format!("{} deleted", service.resource())),
        ..Default::default()
    })))
}
