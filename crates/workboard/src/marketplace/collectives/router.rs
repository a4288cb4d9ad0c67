use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{CollectiveId, CollectiveMember};
use super::repository::CollectiveStore;
use super::service::{CollectiveService, CollectiveServiceError, NewCollective};
use crate::marketplace::store::RepositoryError;
use crate::marketplace::sublist::EntryId;

pub fn collective_router<S>(service: Arc<CollectiveService<S>>) -> Router
where
    S: CollectiveStore + 'static,
{
    Router::new()
        .route("/api/v1/collectives", post(create_handler::<S>))
        .route("/api/v1/collectives/:collective_id", get(get_handler::<S>))
        .route(
            "/api/v1/collectives/:collective_id/members",
            post(add_member_handler::<S>),
        )
        .route(
            "/api/v1/collectives/:collective_id/members/:entry_id",
            delete(remove_member_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<CollectiveService<S>>>,
    Json(request): Json<NewCollective>,
) -> Response
where
    S: CollectiveStore + 'static,
{
    match service.create(request) {
        Ok(collective) => (StatusCode::CREATED, Json(collective)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<S>(
    State(service): State<Arc<CollectiveService<S>>>,
    Path(collective_id): Path<String>,
) -> Response
where
    S: CollectiveStore + 'static,
{
    match service.get(&CollectiveId(collective_id)) {
        Ok(collective) => (StatusCode::OK, Json(collective)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_member_handler<S>(
    State(service): State<Arc<CollectiveService<S>>>,
    Path(collective_id): Path<String>,
    Json(member): Json<CollectiveMember>,
) -> Response
where
    S: CollectiveStore + 'static,
{
    match service.add_member(&CollectiveId(collective_id), member) {
        Ok((collective, entry_id)) => (
            StatusCode::CREATED,
            Json(json!({ "entryId": entry_id, "collective": collective })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_member_handler<S>(
    State(service): State<Arc<CollectiveService<S>>>,
    Path((collective_id, entry_id)): Path<(String, String)>,
) -> Response
where
    S: CollectiveStore + 'static,
{
    let Ok(entry_id) = entry_id.parse::<EntryId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "entry id must be a UUID" })),
        )
            .into_response();
    };

    match service.remove_member(&CollectiveId(collective_id), entry_id) {
        Ok(collective) => (StatusCode::OK, Json(collective)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: CollectiveServiceError) -> Response {
    let status = match &error {
        CollectiveServiceError::MissingName | CollectiveServiceError::MissingWorker => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CollectiveServiceError::AlreadyMember(_)
        | CollectiveServiceError::LastMember
        | CollectiveServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CollectiveServiceError::MemberNotFound(_)
        | CollectiveServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CollectiveServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
