//! Generic CRUD handlers, written once against [`Resource`].
//!
//! GET    /{prefix}/      - list (filtered, paginated when the resource asks for it)
//! POST   /{prefix}/      - create
//! GET    /{prefix}/{id}/ - retrieve
//! PUT    /{prefix}/{id}/ - full update
//! PATCH  /{prefix}/{id}/ - partial update
//! DELETE /{prefix}/{id}/ - delete
//!
//! [`list_create`] and [`retrieve_update_destroy`] bundle the handlers for a
//! collection path and an item path respectively.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{OriginalUri, Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::{Extension, Json};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::filters::filter_items;
use crate::pagination::PaginatedResponse;
use crate::resource::Resource;
use crate::state::AppState;
use crate::validation::expect_object;

/// GET (list) + POST (create) for a collection path.
pub fn list_create<R: Resource>() -> MethodRouter {
    get(list::<R>).post(create::<R>)
}

/// GET (retrieve) + PUT/PATCH (update) + DELETE (destroy) for an item path.
pub fn retrieve_update_destroy<R: Resource>() -> MethodRouter {
    get(retrieve::<R>)
        .put(update::<R>)
        .patch(partial_update::<R>)
        .delete(destroy::<R>)
}

/// Absolute URL of the current request without its query string. Falls back
/// to the bare path when the request carries no `Host` header.
pub fn request_base_url(headers: &HeaderMap, uri: &OriginalUri) -> String {
    let path = uri.0.path();
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}{path}"),
        None => path.to_string(),
    }
}

fn item_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    // A non-integer id never matches an item route.
    path.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

fn payload_of(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(value) = payload?;
    Ok(value)
}

async fn represent_one<R: Resource>(row: R, state: &AppState) -> Result<Value, ApiError> {
    R::represent(vec![row], state)
        .await?
        .pop()
        .ok_or(ApiError::NotFound)
}

pub async fn list<R: Resource>(
    Extension(state): Extension<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    uri: OriginalUri,
) -> Result<Response, ApiError> {
    let rows = R::repository(&state).list().await?;
    let rows = filter_items(rows, &params)?;

    if !R::PAGINATED {
        let body = R::represent(rows, &state).await?;
        return Ok(Json(body).into_response());
    }

    let base_url = request_base_url(&headers, &uri);
    let page = state.pagination.paginate(rows, &params, &base_url)?;
    let results = R::represent(page.results, &state).await?;
    let body = PaginatedResponse {
        count: page.count,
        next: page.next,
        previous: page.previous,
        results,
    };
    Ok(Json(body).into_response())
}

pub async fn create<R: Resource>(
    Extension(state): Extension<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = payload_of(payload)?;
    let draft = R::validate(expect_object(&payload)?, None)?;
    R::check_relations(&draft, &state).await?;

    let row = R::repository(&state).insert(draft).await?;
    info!("Created {} {}", R::NAME, row.id());

    let body = represent_one(row, &state).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn retrieve<R: Resource>(
    Extension(state): Extension<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = item_id(path)?;
    let row = R::repository(&state)
        .get(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(represent_one(row, &state).await?))
}

pub async fn update<R: Resource>(
    Extension(state): Extension<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    save::<R>(state, item_id(path)?, payload, false).await
}

pub async fn partial_update<R: Resource>(
    Extension(state): Extension<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    save::<R>(state, item_id(path)?, payload, true).await
}

async fn save<R: Resource>(
    state: AppState,
    id: i32,
    payload: Result<Json<Value>, JsonRejection>,
    partial: bool,
) -> Result<Json<Value>, ApiError> {
    let repo = R::repository(&state);
    let current = repo.get(id).await?.ok_or(ApiError::NotFound)?;

    let payload = payload_of(payload)?;
    let draft = R::validate(expect_object(&payload)?, partial.then_some(&current))?;
    R::check_relations(&draft, &state).await?;

    let row = repo.update(id, draft).await?.ok_or(ApiError::NotFound)?;
    info!("Updated {} {}", R::NAME, id);

    Ok(Json(represent_one(row, &state).await?))
}

pub async fn destroy<R: Resource>(
    Extension(state): Extension<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = item_id(path)?;
    let repo = R::repository(&state);
    let row = repo.get(id).await?.ok_or(ApiError::NotFound)?;

    row.before_delete(&state).await?;
    if !repo.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    info!("Deleted {} {}", R::NAME, id);

    Ok(StatusCode::NO_CONTENT)
}
