//! Long-lived facts extracted from conversations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, MemoryFactId, Timestamp};

/// Retention tier controlling how quickly a fact fades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryTier {
    /// Never decays: diagnoses, standing preferences, safety notes.
    Permanent,
    /// Slow decay, 90-day half-life: recurring themes.
    SlowDecay,
    /// Standard decay, 30-day half-life: situational details.
    #[default]
    Standard,
}

/// One atomic fact about the user, tied to the conversation that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryFact {
    pub id: MemoryFactId,
    pub conversation_id: ConversationId,
    pub topic: String,
    pub content: String,
    pub tier: MemoryTier,
    pub stability: f64,
    pub created_at: Timestamp,
    pub last_accessed: Timestamp,
}

impl MemoryFact {
    pub fn new(
        conversation_id: ConversationId,
        topic: impl Into<String>,
        content: impl Into<String>,
        tier: MemoryTier,
        now: Timestamp,
    ) -> Self {
        MemoryFact {
            id: MemoryFactId::new(),
            conversation_id,
            topic: topic.into().trim().to_string(),
            content: content.into().trim().to_string(),
            tier,
            stability: 1.0,
            created_at: now,
            last_accessed: now,
        }
    }
}

/// A fact as the extractor produces it, before consolidation assigns
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedFact {
    pub topic: String,
    pub content: String,
    #[serde(default)]
    pub tier: MemoryTier,
}
