use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{Conversation, ConversationId, Message, MAX_MESSAGE_CHARS};
use super::repository::ConversationStore;
use crate::marketplace::store::{Notification, Notifier, RepositoryError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenConversation {
    pub participants: [String; 2],
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub sender_id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub attachment: Option<String>,
}

pub struct MessagingService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

static CONVERSATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_conversation_id() -> ConversationId {
    let id = CONVERSATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ConversationId(format!("conv-{id:06}"))
}

impl<S, N> MessagingService<S, N>
where
    S: ConversationStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    pub fn open(&self, request: OpenConversation) -> Result<Conversation, MessagingServiceError> {
        let [first, second] = request.participants;
        let (first, second) = (first.trim().to_string(), second.trim().to_string());
        if first.is_empty() || second.is_empty() || first == second {
            return Err(MessagingServiceError::InvalidParticipants);
        }

        let conversation = Conversation {
            id: next_conversation_id(),
            participants: [first, second],
            job_id: request.job_id.filter(|job| !job.trim().is_empty()),
            messages: Vec::new(),
            created_at: Utc::now(),
        };
        let stored = self.store.insert(conversation)?;
        info!(conversation_id = %stored.id, "conversation opened");
        Ok(stored)
    }

    /// Append a message from one participant and notify the other.
    pub fn send(
        &self,
        id: &ConversationId,
        outgoing: OutgoingMessage,
    ) -> Result<Message, MessagingServiceError> {
        let mut conversation = self.fetch_existing(id)?;
        if !conversation.is_participant(&outgoing.sender_id) {
            warn!(conversation_id = %id, sender = %outgoing.sender_id, "non-participant send rejected");
            return Err(MessagingServiceError::NotParticipant(outgoing.sender_id));
        }

        let body = outgoing.body.trim().to_string();
        let attachment = outgoing
            .attachment
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if body.is_empty() && attachment.is_none() {
            return Err(MessagingServiceError::EmptyMessage);
        }
        let length = body.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(MessagingServiceError::MessageTooLong { length });
        }

        let message = Message {
            sender_id: outgoing.sender_id,
            body,
            attachment,
            sent_at: Utc::now(),
        };
        conversation.messages.push(message.clone());
        self.store.update(conversation.clone())?;
        info!(conversation_id = %id, messages = conversation.messages.len(), "message sent");

        if let Some(recipient) = conversation
            .participants
            .iter()
            .find(|participant| **participant != message.sender_id)
        {
            let notification = Notification::new("new_message", recipient.clone())
                .with_detail("conversation_id", id.0.clone())
                .with_detail("sender_id", message.sender_id.clone());
            if let Err(err) = self.notifier.notify(notification) {
                warn!(conversation_id = %id, error = %err, "message notification failed");
            }
        }

        Ok(message)
    }

    pub fn get(&self, id: &ConversationId) -> Result<Conversation, MessagingServiceError> {
        self.fetch_existing(id)
    }

    /// Conversations a user takes part in, most recently active first.
    pub fn for_participant(
        &self,
        user_id: &str,
    ) -> Result<Vec<Conversation>, MessagingServiceError> {
        let mut conversations = self.store.for_participant(user_id)?;
        conversations.sort_by_key(|conversation| {
            std::cmp::Reverse(
                conversation
                    .last_message()
                    .map(|message| message.sent_at)
                    .unwrap_or(conversation.created_at),
            )
        });
        Ok(conversations)
    }

    fn fetch_existing(&self, id: &ConversationId) -> Result<Conversation, MessagingServiceError> {
        let conversation = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(conversation)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessagingServiceError {
    #[error("a conversation needs two distinct participants")]
    InvalidParticipants,
    #[error("{0} is not part of this conversation")]
    NotParticipant(String),
    #[error("message body is empty")]
    EmptyMessage,
    #[error("message is {length} characters; the limit is 4000")]
    MessageTooLong { length: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
