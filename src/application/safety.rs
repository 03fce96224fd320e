//! Two-layer crisis screening.
//!
//! Layer one is the keyword prefilter, free and synchronous. Layer two
//! is a semantic classifier call bounded by a timeout. A turn is
//! non-crisis only when both layers said no; a failed or timed-out
//! classifier counts as a quiet no and is logged, never surfaced.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::prompts;
use crate::application::structured::complete_structured;
use crate::domain::routing::screen_keywords;
use crate::ports::{ChatRequest, LanguageModel};

/// Which layer produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSource {
    Keyword,
    Semantic,
    /// Both layers failed to produce a verdict; treated as non-crisis.
    Fallback,
}

/// Outcome of the screen for one utterance.
#[derive(Debug, Clone)]
pub struct CrisisAssessment {
    pub crisis: bool,
    pub source: ScreenSource,
    pub reason: Option<String>,
}

/// Classifier wire shape: `{crisis, confidence, reason}`.
#[derive(Debug, Deserialize)]
struct CrisisVerdict {
    crisis: bool,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    reason: String,
}

/// Screens utterances through the keyword prefilter and the semantic
/// classifier.
#[derive(Clone)]
pub struct CrisisScreen {
    llm: Arc<dyn LanguageModel>,
    classify_timeout: Duration,
    retry_temperature: f32,
}

impl CrisisScreen {
    pub fn new(llm: Arc<dyn LanguageModel>, classify_timeout: Duration, retry_temperature: f32) -> Self {
        Self {
            llm,
            classify_timeout,
            retry_temperature,
        }
    }

    pub async fn screen(&self, utterance: &str) -> CrisisAssessment {
        if let Some(hit) = screen_keywords(utterance) {
            debug!(keyword = hit.keyword, "crisis keyword prefilter hit");
            return CrisisAssessment {
                crisis: true,
                source: ScreenSource::Keyword,
                reason: Some(hit.keyword.to_string()),
            };
        }

        let request = ChatRequest::new()
            .with_user(prompts::crisis_classifier_prompt(utterance))
            .with_temperature(0.0)
            .with_max_tokens(200)
            .with_response_schema(prompts::crisis_verdict_schema());

        let classify = complete_structured::<CrisisVerdict>(
            self.llm.as_ref(),
            request,
            self.retry_temperature,
        );
        match tokio::time::timeout(self.classify_timeout, classify).await {
            Ok(Ok(verdict)) => {
                debug!(
                    crisis = verdict.crisis,
                    confidence = verdict.confidence,
                    "semantic crisis classification"
                );
                CrisisAssessment {
                    crisis: verdict.crisis,
                    source: ScreenSource::Semantic,
                    reason: (!verdict.reason.is_empty()).then_some(verdict.reason),
                }
            }
            Ok(Err(error)) => {
                warn!(%error, "crisis classifier failed, defaulting to non-crisis");
                CrisisAssessment {
                    crisis: false,
                    source: ScreenSource::Fallback,
                    reason: None,
                }
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.classify_timeout.as_secs(),
                    "crisis classifier timed out, defaulting to non-crisis"
                );
                CrisisAssessment {
                    crisis: false,
                    source: ScreenSource::Fallback,
                    reason: None,
                }
            }
        }
    }
}
