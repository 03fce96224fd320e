//! Emotion reading supplied by the upstream affect classifier.

use serde::{Deserialize, Serialize};

/// Score at or above which a negative emotion counts as high intensity.
pub const HIGH_INTENSITY_THRESHOLD: u8 = 7;

/// Emotion labels treated as negative for routing purposes.
const NEGATIVE_LABELS: &[&str] = &["anxiety", "depression", "anger", "sadness", "fear"];

/// A single emotion classification attached to a user turn.
///
/// The label comes from an external classifier and may arrive in English
/// or Chinese; scores are on a 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    pub label: String,
    pub score: u8,
}

impl EmotionReading {
    pub fn new(label: impl Into<String>, score: u8) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Maps Chinese classifier labels onto the canonical English set.
    pub fn canonical_label(&self) -> &str {
        match self.label.as_str() {
            "焦虑" => "anxiety",
            "抑郁" => "depression",
            "愤怒" | "生气" => "anger",
            "悲伤" | "难过" => "sadness",
            "恐惧" | "害怕" => "fear",
            other => other,
        }
    }

    /// True when the reading is a negative emotion at or above the
    /// high-intensity threshold.
    pub fn is_high_intensity_negative(&self) -> bool {
        self.score >= HIGH_INTENSITY_THRESHOLD
            && NEGATIVE_LABELS.contains(&self.canonical_label())
    }
}
