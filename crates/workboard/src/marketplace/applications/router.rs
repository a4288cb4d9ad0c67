use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus, JobApplication};
use super::repository::ApplicationRepository;
use super::service::{ApplicationServiceError, JobApplicationService};
use crate::marketplace::store::{Notifier, RepositoryError};
use crate::marketplace::wizard::WizardForm;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveApplicationDraftRequest {
    #[serde(default)]
    pub draft_id: Option<ApplicationId>,
    pub application: JobApplication,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ApplicationStatus,
}

/// Router builder exposing HTTP endpoints for application intake and review.
pub fn application_router<R, N>(service: Arc<JobApplicationService<R, N>>) -> Router
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<R, N>))
        .route("/api/v1/applications/drafts", post(save_draft_handler::<R, N>))
        .route(
            "/api/v1/applications/validate/:step",
            post(validate_step_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/submit",
            post(submit_draft_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(transition_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<JobApplicationService<R, N>>>,
    Json(application): Json<JobApplication>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    match service.submit(application) {
        Ok(record) => (StatusCode::ACCEPTED, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_draft_handler<R, N>(
    State(service): State<Arc<JobApplicationService<R, N>>>,
    Json(request): Json<SaveApplicationDraftRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    match service.save_draft(request.draft_id.as_ref(), request.application) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validate_step_handler<R, N>(
    State(service): State<Arc<JobApplicationService<R, N>>>,
    Path(step): Path<u8>,
    Json(application): Json<JobApplication>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    match service.validate_step(&application, step) {
        Ok(errors) => {
            let payload = json!({
                "step": step,
                "title": JobApplication::step_title(step),
                "valid": errors.is_empty(),
                "errors": errors,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<JobApplicationService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_draft_handler<R, N>(
    State(service): State<Arc<JobApplicationService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    match service.submit_draft(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::ACCEPTED, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn transition_handler<R, N>(
    State(service): State<Arc<JobApplicationService<R, N>>>,
    Path(application_id): Path<String>,
    Json(request): Json<StatusChangeRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    match service.transition(&ApplicationId(application_id), request.status) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let (status, payload) = match &error {
        ApplicationServiceError::Incomplete { missing } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": error.to_string(), "missing": missing }),
        ),
        ApplicationServiceError::Invalid { step, errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": error.to_string(), "step": step, "fields": errors }),
        ),
        ApplicationServiceError::InvalidStep { .. } => {
            (StatusCode::BAD_REQUEST, json!({ "error": error.to_string() }))
        }
        ApplicationServiceError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        ApplicationServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "application not found" }),
        ),
        ApplicationServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "application already exists" }),
        ),
        ApplicationServiceError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        ),
    };
    (status, Json(payload)).into_response()
}
