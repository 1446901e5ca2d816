//! Entity HTTP Routes
//!
//! One generic route set per entity type, mounted under the type's table
//! name (`/teams`, `/matches`, `/reports`). Collection paths answer both with
//! and without a trailing slash.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::errors::{ApiError, ApiResult};
use crate::model::{Entity, Filterable, Stored};
use crate::storage::ArchivedRow;
use crate::store::RecordStore;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create CRUD and history routes for entity type `E`
pub fn entity_routes<E: Entity>(store: Arc<RecordStore<E>>) -> Router {
    let base = format!("/{}", E::KIND.table_name());

    Router::new()
        .route(&base, get(list_handler::<E>).post(create_handler::<E>))
        .route(
            &format!("{}/", base),
            get(list_handler::<E>).post(create_handler::<E>),
        )
        .route(&format!("{}/history", base), get(history_handler::<E>))
        .route(
            &format!("{}/:id", base),
            get(get_handler::<E>)
                .put(update_handler::<E>)
                .delete(delete_handler::<E>),
        )
        .with_state(store)
}

/// Create the `/<table>/<filter field>/:value` lookup route
pub fn filter_routes<E: Filterable>(store: Arc<RecordStore<E>>) -> Router {
    let path = format!("/{}/{}/:value", E::KIND.table_name(), E::FILTER_FIELD);

    Router::new()
        .route(&path, get(filter_handler::<E>))
        .with_state(store)
}

async fn create_handler<E: Entity>(
    State(store): State<Arc<RecordStore<E>>>,
    body: Result<Json<E>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Stored<E>>)> {
    let Json(candidate) = body?;
    let created = store.create(candidate).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_handler<E: Entity>(
    State(store): State<Arc<RecordStore<E>>>,
) -> ApiResult<Json<Vec<Stored<E>>>> {
    Ok(Json(store.list_all().await?))
}

async fn get_handler<E: Entity>(
    State(store): State<Arc<RecordStore<E>>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Stored<E>>> {
    let Path(id) = id?;
    Ok(Json(store.get_by_id(id).await?))
}

async fn update_handler<E: Entity>(
    State(store): State<Arc<RecordStore<E>>>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<E>, JsonRejection>,
) -> ApiResult<Json<Stored<E>>> {
    let Path(id) = id?;
    let Json(replacement) = body?;
    Ok(Json(store.update(id, replacement).await?))
}

async fn delete_handler<E: Entity>(
    State(store): State<Arc<RecordStore<E>>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    if !store.delete(id).await? {
        return Err(ApiError::NotFound(format!(
            "{} with id {} not found",
            E::KIND,
            id
        )));
    }

    Ok(Json(MessageResponse {
        message: format!("{} {} deleted successfully", E::KIND, id),
    }))
}

async fn history_handler<E: Entity>(
    State(store): State<Arc<RecordStore<E>>>,
) -> ApiResult<Json<Vec<ArchivedRow>>> {
    Ok(Json(store.history().await?))
}

async fn filter_handler<E: Filterable>(
    State(store): State<Arc<RecordStore<E>>>,
    Path(value): Path<String>,
) -> ApiResult<Json<Vec<Stored<E>>>> {
    let found = store.filter_by(&value).await?;

    if found.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no {} found with {} '{}'",
            E::KIND.table_name(),
            E::FILTER_FIELD,
            value
        )));
    }

    Ok(Json(found))
}
