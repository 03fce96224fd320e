//! In-memory conversation and memory stores.
//!
//! Back the service in tests and single-process deployments. Both are
//! cheap to clone and safe to share across tasks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, MemoryFactId};
use crate::domain::memory::MemoryFact;
use crate::ports::{ConversationStore, MemoryStore, StoreError};

/// In-memory conversation store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn count(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Clear all stored data (useful for tests).
    pub async fn clear(&self) {
        self.conversations.write().await.clear();
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn find(&self, id: ConversationId) -> Result<Option<Conversation>, StoreError> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(&id).cloned())
    }
}

/// In-memory memory fact store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemoryStore {
    facts: Arc<RwLock<HashMap<MemoryFactId, MemoryFact>>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored facts.
    pub async fn count(&self) -> usize {
        self.facts.read().await.len()
    }

    /// All stored facts, newest first (useful for tests).
    pub async fn all(&self) -> Vec<MemoryFact> {
        let facts = self.facts.read().await;
        let mut all: Vec<MemoryFact> = facts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn save(&self, fact: &MemoryFact) -> Result<(), StoreError> {
        let mut facts = self.facts.write().await;
        facts.insert(fact.id, fact.clone());
        Ok(())
    }

    async fn facts_for_topic(&self, topic: &str) -> Result<Vec<MemoryFact>, StoreError> {
        let facts = self.facts.read().await;
        let mut matching: Vec<MemoryFact> = facts
            .values()
            .filter(|f| f.topic == topic)
            .cloned()
            .collect();
        // Deterministic order regardless of map iteration.
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn delete(&self, id: MemoryFactId) -> Result<(), StoreError> {
        let mut facts = self.facts.write().await;
        facts.remove(&id);
        Ok(())
    }
}
