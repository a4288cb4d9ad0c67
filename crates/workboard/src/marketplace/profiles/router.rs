use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::ProfileUpdate;
use super::repository::ProfileStore;
use super::service::{ProfileService, ProfileServiceError};
use crate::marketplace::store::RepositoryError;

pub fn profile_router<S>(service: Arc<ProfileService<S>>) -> Router
where
    S: ProfileStore + 'static,
{
    Router::new()
        .route("/api/v1/profiles", get(list_handler::<S>))
        .route(
            "/api/v1/profiles/:worker_id",
            get(get_handler::<S>).put(upsert_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn upsert_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Path(worker_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match service.upsert(&worker_id, update) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Path(worker_id): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match service.get(&worker_id) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S>(State(service): State<Arc<ProfileService<S>>>) -> Response
where
    S: ProfileStore + 'static,
{
    match service.list() {
        Ok(profiles) => (
            StatusCode::OK,
            Json(json!({ "total": profiles.len(), "items": profiles })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ProfileServiceError) -> Response {
    let (status, payload) = match &error {
        ProfileServiceError::MissingWorker => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": error.to_string() }),
        ),
        ProfileServiceError::Invalid { errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": error.to_string(), "fields": errors }),
        ),
        ProfileServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "profile not found" }),
        ),
        ProfileServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        ProfileServiceError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        ),
    };
    (status, Json(payload)).into_response()
}
