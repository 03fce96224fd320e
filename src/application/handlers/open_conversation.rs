//! OpenConversationHandler - Start a fresh check-in conversation.

use std::sync::Arc;

use crate::application::prompts;
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::ports::{ConversationStore, StoreError};

/// Command to open a conversation. The server assigns the id.
#[derive(Debug, Clone, Default)]
pub struct OpenConversationCommand;

/// Result of opening a conversation.
#[derive(Debug, Clone)]
pub struct OpenConversationResult {
    pub conversation_id: ConversationId,
    pub greeting: String,
}

/// Error type for opening conversations.
#[derive(Debug, Clone)]
pub enum OpenConversationError {
    /// Storage error
    Storage(String),
    /// Domain error
    Domain(ValidationError),
}

impl std::fmt::Display for OpenConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenConversationError::Storage(err) => write!(f, "Storage error: {}", err),
            OpenConversationError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for OpenConversationError {}

impl From<StoreError> for OpenConversationError {
    fn from(err: StoreError) -> Self {
        OpenConversationError::Storage(err.to_string())
    }
}

impl From<ValidationError> for OpenConversationError {
    fn from(err: ValidationError) -> Self {
        OpenConversationError::Domain(err)
    }
}

/// Handler for opening conversations.
pub struct OpenConversationHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl OpenConversationHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }

    pub async fn handle(
        &self,
        _cmd: OpenConversationCommand,
    ) -> Result<OpenConversationResult, OpenConversationError> {
        let mut conversation = Conversation::new();
        conversation.record_assistant_message(prompts::OPENING_GREETING)?;
        self.conversations.save(&conversation).await?;

        Ok(OpenConversationResult {
            conversation_id: conversation.id(),
            greeting: prompts::OPENING_GREETING.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryConversationStore;
    use crate::domain::conversation::Role;

    #[tokio::test]
    async fn opening_persists_a_greeted_conversation() {
        let store = InMemoryConversationStore::new();
        let handler = OpenConversationHandler::new(Arc::new(store.clone()));

        let result = handler.handle(OpenConversationCommand).await.unwrap();

        let conversation = store.find(result.conversation_id).await.unwrap().unwrap();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].role(), Role::Assistant);
        assert_eq!(result.greeting, prompts::OPENING_GREETING);
    }

    #[tokio::test]
    async fn each_open_gets_a_distinct_id() {
        let store = InMemoryConversationStore::new();
        let handler = OpenConversationHandler::new(Arc::new(store.clone()));

        let a = handler.handle(OpenConversationCommand).await.unwrap();
        let b = handler.handle(OpenConversationCommand).await.unwrap();

        assert_ne!(a.conversation_id, b.conversation_id);
        assert_eq!(store.count().await, 2);
    }
}
