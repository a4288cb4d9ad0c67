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

use super::domain::{JobPostFormData, JobPostId};
use super::repository::JobPostStore;
use super::service::{JobPostService, JobPostServiceError};
use crate::marketplace::store::RepositoryError;
use crate::marketplace::wizard::WizardForm;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishJobPostRequest {
    pub employer_id: String,
    pub form: JobPostFormData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJobPostDraftRequest {
    pub employer_id: String,
    #[serde(default)]
    pub draft_id: Option<JobPostId>,
    #[serde(default)]
    pub form: JobPostFormData,
}

/// Router builder exposing validation, draft and publish endpoints for job posts.
pub fn job_post_router<S>(service: Arc<JobPostService<S>>) -> Router
where
    S: JobPostStore + 'static,
{
    Router::new()
        .route("/api/v1/job-posts", post(publish_handler::<S>))
        .route("/api/v1/job-posts/drafts", post(save_draft_handler::<S>))
        .route(
            "/api/v1/job-posts/validate/:step",
            post(validate_step_handler::<S>),
        )
        .route("/api/v1/job-posts/:job_post_id", get(get_handler::<S>))
        .route(
            "/api/v1/job-posts/:job_post_id/publish",
            post(publish_draft_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn validate_step_handler<S>(
    State(service): State<Arc<JobPostService<S>>>,
    Path(step): Path<u8>,
    Json(form): Json<JobPostFormData>,
) -> Response
where
    S: JobPostStore + 'static,
{
    match service.validate_step(&form, step) {
        Ok(errors) => {
            let payload = json!({
                "step": step,
                "title": JobPostFormData::step_title(step),
                "valid": errors.is_empty(),
                "errors": errors,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn publish_handler<S>(
    State(service): State<Arc<JobPostService<S>>>,
    Json(request): Json<PublishJobPostRequest>,
) -> Response
where
    S: JobPostStore + 'static,
{
    match service.publish(&request.employer_id, request.form) {
        Ok(post) => (StatusCode::CREATED, Json(post)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_draft_handler<S>(
    State(service): State<Arc<JobPostService<S>>>,
    Json(request): Json<SaveJobPostDraftRequest>,
) -> Response
where
    S: JobPostStore + 'static,
{
    match service.save_draft(
        &request.employer_id,
        request.draft_id.as_ref(),
        request.form,
    ) {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn publish_draft_handler<S>(
    State(service): State<Arc<JobPostService<S>>>,
    Path(job_post_id): Path<String>,
) -> Response
where
    S: JobPostStore + 'static,
{
    match service.publish_draft(&JobPostId(job_post_id)) {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<S>(
    State(service): State<Arc<JobPostService<S>>>,
    Path(job_post_id): Path<String>,
) -> Response
where
    S: JobPostStore + 'static,
{
    match service.get(&JobPostId(job_post_id)) {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: JobPostServiceError) -> Response {
    let (status, payload) = match &error {
        JobPostServiceError::Incomplete { step, errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": error.to_string(), "step": step, "fields": errors }),
        ),
        JobPostServiceError::InvalidStep { .. } => {
            (StatusCode::BAD_REQUEST, json!({ "error": error.to_string() }))
        }
        JobPostServiceError::AlreadyPublished(_) => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        JobPostServiceError::NotOwner(_) => {
            (StatusCode::FORBIDDEN, json!({ "error": error.to_string() }))
        }
        JobPostServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, json!({ "error": "job post not found" }))
        }
        JobPostServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        JobPostServiceError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        ),
    };
    (status, Json(payload)).into_response()
}
