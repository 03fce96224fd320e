//! GetConversationHandler - Query the current conversation view.

use std::sync::Arc;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, StoreError};

/// Query to get a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

/// Result of getting a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationResult {
    pub conversation: Conversation,
}

/// Error type for getting a conversation.
#[derive(Debug, Clone)]
pub enum GetConversationError {
    /// Conversation not found
    NotFound(ConversationId),
    /// Storage error
    Storage(String),
}

impl std::fmt::Display for GetConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetConversationError::NotFound(id) => write!(f, "Conversation not found: {}", id),
            GetConversationError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for GetConversationError {}

impl From<StoreError> for GetConversationError {
    fn from(err: StoreError) -> Self {
        GetConversationError::Storage(err.to_string())
    }
}

/// Handler for getting a conversation.
pub struct GetConversationHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }

    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<GetConversationResult, GetConversationError> {
        let conversation = self
            .conversations
            .find(query.conversation_id)
            .await?
            .ok_or(GetConversationError::NotFound(query.conversation_id))?;

        Ok(GetConversationResult { conversation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryConversationStore;

    #[tokio::test]
    async fn returns_a_stored_conversation() {
        let store = InMemoryConversationStore::new();
        let conversation = Conversation::new();
        let id = conversation.id();
        store.save(&conversation).await.unwrap();

        let handler = GetConversationHandler::new(Arc::new(store));
        let result = handler
            .handle(GetConversationQuery {
                conversation_id: id,
            })
            .await
            .unwrap();

        assert_eq!(result.conversation.id(), id);
    }

    #[tokio::test]
    async fn missing_conversation_is_a_not_found_error() {
        let handler = GetConversationHandler::new(Arc::new(InMemoryConversationStore::new()));
        let result = handler
            .handle(GetConversationQuery {
                conversation_id: ConversationId::new(),
            })
            .await;

        assert!(matches!(result, Err(GetConversationError::NotFound(_))));
    }
}
