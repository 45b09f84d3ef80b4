//! HTTP adapter for the item service.
//!
//! # Responsibility
//! - Map HTTP verbs and paths onto `ItemService` operations.
//! - Map the service result taxonomy onto HTTP status codes.
//!
//! # Invariants
//! - No business rule lives here; handlers stay one-call thin.
//! - Each request is a short-lived unit of work against the shared store.

use std::sync::{Arc, Mutex};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::error;
use rusqlite::Connection;
use tasklist_core::{
    core_version, Item, ItemId, ItemService, ServiceError, ServiceResult, SqliteItemStore,
    StoreError,
};

/// Shared connection handle; one store instance per hosting process.
pub type SharedConn = Arc<Mutex<Connection>>;

/// Builds the API router over a bootstrapped connection handle.
pub fn app(conn: SharedConn) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .with_state(conn)
}

/// Adapter-level wrapper turning service errors into responses.
struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Store(err) => {
                error!("event=request_failed module=http status=error error={err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status.into_response()
    }
}

/// Runs one operation as a short-lived unit of work: lock the connection,
/// build store and service, perform exactly one service call.
fn with_service<T>(
    conn: &SharedConn,
    op: impl FnOnce(&ItemService<SqliteItemStore<'_>>) -> ServiceResult<T>,
) -> Result<T, ApiError> {
    let guard = conn
        .lock()
        .map_err(|_| ApiError(ServiceError::Store(StoreError::LockPoisoned)))?;
    let store = SqliteItemStore::try_new(&guard).map_err(ServiceError::Store)?;
    let service = ItemService::new(store);
    op(&service).map_err(ApiError::from)
}

async fn health() -> String {
    format!("tasklist {}", core_version())
}

async fn list_items(State(conn): State<SharedConn>) -> Result<Json<Vec<Item>>, ApiError> {
    with_service(&conn, |service| service.list()).map(Json)
}

async fn get_item(
    State(conn): State<SharedConn>,
    Path(id): Path<ItemId>,
) -> Result<Json<Item>, ApiError> {
    with_service(&conn, |service| service.get(id)).map(Json)
}

async fn create_item(
    State(conn): State<SharedConn>,
    body: Result<Json<Item>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // An absent or undecodable body reaches the service as a missing
    // candidate, which the taxonomy maps to a client error.
    let candidate = body.ok().map(|Json(item)| item);
    let created = with_service(&conn, |service| service.create(candidate))?;

    let location = format!("/api/items/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

async fn update_item(
    State(conn): State<SharedConn>,
    Path(id): Path<ItemId>,
    body: Result<Json<Item>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let candidate = body.ok().map(|Json(item)| item);
    with_service(&conn, |service| service.update(id, candidate))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_item(
    State(conn): State<SharedConn>,
    Path(id): Path<ItemId>,
) -> Result<StatusCode, ApiError> {
    with_service(&conn, |service| service.delete(id))?;
    Ok(StatusCode::NO_CONTENT)
}
