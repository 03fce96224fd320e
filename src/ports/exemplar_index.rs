//! Golden-example lookup port.
//!
//! Retrieves reference replies for situations similar to the user's
//! utterance. Used to steer the support-path generation; a failed or
//! empty lookup degrades to generation without examples.

use async_trait::async_trait;

/// One curated situation-reply pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exemplar {
    pub situation: String,
    pub reply: String,
}

#[async_trait]
pub trait ExemplarIndex: Send + Sync {
    /// Best-matching exemplars for the utterance, strongest first.
    /// An empty result is normal and not an error.
    async fn lookup(&self, utterance: &str, limit: usize) -> Vec<Exemplar>;
}
