//! Two-party conversations between workers and employers.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Conversation, ConversationId, Message, MAX_MESSAGE_CHARS};
pub use repository::ConversationStore;
pub use router::conversation_router;
pub use service::{MessagingService, MessagingServiceError, OpenConversation, OutgoingMessage};
