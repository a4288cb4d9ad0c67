use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ConversationId;
use super::repository::ConversationStore;
use super::service::{MessagingService, MessagingServiceError, OpenConversation, OutgoingMessage};
use crate::marketplace::store::{Notifier, RepositoryError};

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    pub participant: String,
}

pub fn conversation_router<S, N>(service: Arc<MessagingService<S, N>>) -> Router
where
    S: ConversationStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/conversations",
            post(open_handler::<S, N>).get(inbox_handler::<S, N>),
        )
        .route(
            "/api/v1/conversations/:conversation_id",
            get(get_handler::<S, N>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/messages",
            post(send_handler::<S, N>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<S, N>(
    State(service): State<Arc<MessagingService<S, N>>>,
    Json(request): Json<OpenConversation>,
) -> Response
where
    S: ConversationStore + 'static,
    N: Notifier + 'static,
{
    match service.open(request) {
        Ok(conversation) => (StatusCode::CREATED, Json(conversation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn inbox_handler<S, N>(
    State(service): State<Arc<MessagingService<S, N>>>,
    Query(query): Query<InboxQuery>,
) -> Response
where
    S: ConversationStore + 'static,
    N: Notifier + 'static,
{
    match service.for_participant(&query.participant) {
        Ok(conversations) => (StatusCode::OK, Json(conversations)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<S, N>(
    State(service): State<Arc<MessagingService<S, N>>>,
    Path(conversation_id): Path<String>,
) -> Response
where
    S: ConversationStore + 'static,
    N: Notifier + 'static,
{
    match service.get(&ConversationId(conversation_id)) {
        Ok(conversation) => (StatusCode::OK, Json(conversation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn send_handler<S, N>(
    State(service): State<Arc<MessagingService<S, N>>>,
    Path(conversation_id): Path<String>,
    Json(outgoing): Json<OutgoingMessage>,
) -> Response
where
    S: ConversationStore + 'static,
    N: Notifier + 'static,
{
    match service.send(&ConversationId(conversation_id), outgoing) {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: MessagingServiceError) -> Response {
    let status = match &error {
        MessagingServiceError::InvalidParticipants
        | MessagingServiceError::EmptyMessage
        | MessagingServiceError::MessageTooLong { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MessagingServiceError::NotParticipant(_) => StatusCode::FORBIDDEN,
        MessagingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MessagingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MessagingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
