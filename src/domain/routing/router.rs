//! Intent router: decides whether a turn gets supportive listening or a
//! structured assessment.

use serde::{Deserialize, Serialize};

use super::emotion::EmotionReading;
use super::lexicon;

/// Conversational route for a non-crisis turn.
///
/// Crisis is decided upstream by the two-layer screen and never reaches
/// this router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistRoute {
    Support,
    Assessment,
}

/// A signal category detected in the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSignal {
    /// Negative emotional state vocabulary.
    Distress,
    /// Sleep/appetite/focus/work impairment vocabulary.
    Impairment,
    /// Explicit request for guidance.
    HelpSeeking,
    /// Workplace or relationship stressor mention. Weak on its own.
    Stressor,
    /// High-intensity negative emotion score from the affect classifier.
    HighEmotion,
}

impl RouteSignal {
    /// Stressor mentions alone never justify an assessment.
    fn is_strong(&self) -> bool {
        !matches!(self, RouteSignal::Stressor)
    }
}

/// Routing outcome together with the signals that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecision {
    pub route: AssistRoute,
    pub signals: Vec<RouteSignal>,
}

impl RouteDecision {
    pub fn is_assessment(&self) -> bool {
        self.route == AssistRoute::Assessment
    }
}

/// Classifies a user turn into support or assessment.
///
/// Any strong signal routes to assessment. A stressor mention without a
/// co-occurring strong signal stays in support, as does pure smalltalk.
pub fn classify_turn(utterance: &str, emotion: Option<&EmotionReading>) -> RouteDecision {
    let text = lexicon::normalize(utterance);
    let mut signals = Vec::new();

    if lexicon::contains_any(&text, lexicon::DISTRESS_WORDS) {
        signals.push(RouteSignal::Distress);
    }
    if lexicon::contains_any(&text, lexicon::IMPAIRMENT_WORDS) {
        signals.push(RouteSignal::Impairment);
    }
    if lexicon::contains_any(&text, lexicon::HELP_WORDS) {
        signals.push(RouteSignal::HelpSeeking);
    }
    if lexicon::contains_any(&text, lexicon::STRESSOR_WORDS) {
        signals.push(RouteSignal::Stressor);
    }
    if emotion.is_some_and(|e| e.is_high_intensity_negative()) {
        signals.push(RouteSignal::HighEmotion);
    }

    let route = if signals.iter().any(RouteSignal::is_strong) {
        AssistRoute::Assessment
    } else {
        AssistRoute::Support
    };

    RouteDecision { route, signals }
}
