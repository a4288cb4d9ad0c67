use super::domain::{Conversation, ConversationId};
use crate::marketplace::store::RepositoryError;

pub trait ConversationStore: Send + Sync {
    fn insert(&self, conversation: Conversation) -> Result<Conversation, RepositoryError>;
    fn update(&self, conversation: Conversation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ConversationId) -> Result<Option<Conversation>, RepositoryError>;
    fn for_participant(&self, user_id: &str) -> Result<Vec<Conversation>, RepositoryError>;
}
