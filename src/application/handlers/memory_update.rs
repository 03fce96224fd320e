//! MemoryUpdateHandler - Extract and consolidate facts after an assessment.
//!
//! Extraction and per-fact consolidation are both LLM-assisted with
//! deterministic fallbacks: a failed consolidation call degrades to the
//! lexical overlap rule, which never deletes. The whole handler is
//! best-effort; the caller logs failures and moves on.

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::prompts;
use crate::application::structured::complete_structured;
use crate::domain::foundation::{ConversationId, MemoryFactId, Timestamp};
use crate::domain::memory::{
    consolidate_lexically, touch, ConsolidationAction, ExtractedFact, MemoryFact,
};
use crate::ports::{ChatRequest, LanguageModel, MemoryStore, StoreError};

/// Facts are capped per conversation; anything past this is noise.
const MAX_FACTS_PER_UPDATE: usize = 5;

/// Command to fold one concluded conversation into memory.
#[derive(Debug, Clone)]
pub struct MemoryUpdateCommand {
    pub conversation_id: ConversationId,
    pub transcript: String,
}

/// Counts of what the consolidation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryUpdateResult {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub deleted: usize,
}

/// Error type for memory updates.
#[derive(Debug, Clone)]
pub enum MemoryUpdateError {
    /// Fact extraction failed even after its retry.
    Extraction(String),
    /// Storage error
    Storage(String),
}

impl std::fmt::Display for MemoryUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryUpdateError::Extraction(err) => write!(f, "Fact extraction failed: {}", err),
            MemoryUpdateError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for MemoryUpdateError {}

impl From<StoreError> for MemoryUpdateError {
    fn from(err: StoreError) -> Self {
        MemoryUpdateError::Storage(err.to_string())
    }
}

/// Extraction wire shape: `{facts: [...]}`.
#[derive(Debug, Deserialize)]
struct ExtractionPayload {
    facts: Vec<ExtractedFact>,
}

/// Consolidation wire shape: `{action, target?}`.
#[derive(Debug, Deserialize)]
struct ConsolidationVerdict {
    action: String,
    #[serde(default)]
    target: Option<String>,
}

/// Handler for post-assessment memory updates.
pub struct MemoryUpdateHandler {
    llm: Arc<dyn LanguageModel>,
    memories: Arc<dyn MemoryStore>,
    retry_temperature: f32,
}

impl MemoryUpdateHandler {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        memories: Arc<dyn MemoryStore>,
        retry_temperature: f32,
    ) -> Self {
        Self {
            llm,
            memories,
            retry_temperature,
        }
    }

    pub async fn handle(
        &self,
        cmd: MemoryUpdateCommand,
    ) -> Result<MemoryUpdateResult, MemoryUpdateError> {
        let extracted = self.extract_facts(&cmd.transcript).await?;
        let now = Timestamp::now();
        let mut result = MemoryUpdateResult::default();

        for fact in extracted.into_iter().take(MAX_FACTS_PER_UPDATE) {
            if fact.topic.trim().is_empty() || fact.content.trim().is_empty() {
                continue;
            }
            let existing = self.memories.facts_for_topic(&fact.topic).await?;
            let action = self.decide(&fact, &existing).await;
            self.apply(&cmd, &fact, action, now, &mut result).await?;
        }

        debug!(
            created = result.created,
            updated = result.updated,
            skipped = result.skipped,
            deleted = result.deleted,
            "memory update applied"
        );
        Ok(result)
    }

    async fn extract_facts(&self, transcript: &str) -> Result<Vec<ExtractedFact>, MemoryUpdateError> {
        let request = ChatRequest::new()
            .with_user(prompts::memory_extraction_prompt(transcript))
            .with_temperature(0.2)
            .with_max_tokens(600)
            .with_response_schema(prompts::memory_extraction_schema());

        let payload = complete_structured::<ExtractionPayload>(
            self.llm.as_ref(),
            request,
            self.retry_temperature,
        )
        .await
        .map_err(|e| MemoryUpdateError::Extraction(e.to_string()))?;

        Ok(payload.facts)
    }

    /// Consolidation decision for one fact: LLM verdict first, lexical
    /// overlap when the call or its mapping fails.
    async fn decide(&self, fact: &ExtractedFact, existing: &[MemoryFact]) -> ConsolidationAction {
        if existing.is_empty() {
            return ConsolidationAction::Create;
        }

        let request = ChatRequest::new()
            .with_user(prompts::consolidation_prompt(
                &fact.topic,
                &fact.content,
                existing,
            ))
            .with_temperature(0.0)
            .with_max_tokens(120)
            .with_response_schema(prompts::consolidation_schema());

        match complete_structured::<ConsolidationVerdict>(
            self.llm.as_ref(),
            request,
            self.retry_temperature,
        )
        .await
        {
            Ok(verdict) => match map_verdict(&verdict, existing) {
                Some(action) => action,
                None => {
                    warn!(
                        action = %verdict.action,
                        "consolidation verdict did not map, using lexical fallback"
                    );
                    consolidate_lexically(&fact.content, existing)
                }
            },
            Err(error) => {
                warn!(%error, "consolidation call failed, using lexical fallback");
                consolidate_lexically(&fact.content, existing)
            }
        }
    }

    async fn apply(
        &self,
        cmd: &MemoryUpdateCommand,
        fact: &ExtractedFact,
        action: ConsolidationAction,
        now: Timestamp,
        result: &mut MemoryUpdateResult,
    ) -> Result<(), MemoryUpdateError> {
        match action {
            ConsolidationAction::Create => {
                let new_fact = MemoryFact::new(
                    cmd.conversation_id,
                    &fact.topic,
                    &fact.content,
                    fact.tier,
                    now,
                );
                self.memories.save(&new_fact).await?;
                result.created += 1;
            }
            ConsolidationAction::Update { target } => {
                let existing = self.memories.facts_for_topic(&fact.topic).await?;
                if let Some(mut updated) = existing.into_iter().find(|f| f.id == target) {
                    updated.content = fact.content.clone();
                    touch(&mut updated, now);
                    self.memories.save(&updated).await?;
                    result.updated += 1;
                } else {
                    result.skipped += 1;
                }
            }
            ConsolidationAction::Skip => {
                result.skipped += 1;
            }
            ConsolidationAction::Delete { target } => {
                self.memories.delete(target).await?;
                result.deleted += 1;
            }
        }
        Ok(())
    }
}

/// Maps an LLM verdict onto a concrete action. Update/delete verdicts
/// must name an existing fact; anything else fails the mapping.
fn map_verdict(verdict: &ConsolidationVerdict, existing: &[MemoryFact]) -> Option<ConsolidationAction> {
    let target = || {
        verdict
            .target
            .as_deref()
            .and_then(|raw| MemoryFactId::from_str(raw).ok())
            .filter(|id| existing.iter().any(|f| f.id == *id))
    };

    match verdict.action.as_str() {
        "create" => Some(ConsolidationAction::Create),
        "skip" => Some(ConsolidationAction::Skip),
        "update" => target().map(|target| ConsolidationAction::Update { target }),
        "delete" => target().map(|target| ConsolidationAction::Delete { target }),
        _ => None,
    }
}
