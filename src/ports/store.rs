//! Persistence ports for conversations and memory facts.
//!
//! Durable storage is a collaborator's concern; this core reads and
//! writes whole value objects through these traits.

use async_trait::async_trait;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, MemoryFactId};
use crate::domain::memory::MemoryFact;

/// Storage errors shared by both stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Port for conversation persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert or replace the conversation.
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError>;

    /// Returns `None` when the conversation does not exist.
    async fn find(&self, id: ConversationId) -> Result<Option<Conversation>, StoreError>;
}

/// Port for memory fact persistence.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Insert or replace a fact.
    async fn save(&self, fact: &MemoryFact) -> Result<(), StoreError>;

    /// All facts filed under the given topic.
    async fn facts_for_topic(&self, topic: &str) -> Result<Vec<MemoryFact>, StoreError>;

    async fn delete(&self, id: MemoryFactId) -> Result<(), StoreError>;
}
