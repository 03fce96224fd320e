//! Question policy: exactly one question per assessment turn.
//!
//! The intake turn asks a single open question; follow-up turns fill one
//! slot at a time until the gap detector reports nothing missing. The
//! policy is pure: the caller applies the returned action to the tracker.

use crate::domain::intake::{next_gap, GapKey, IntakeInfo};
use crate::domain::routing::{lexicon, EmotionReading};

use super::questions;
use super::tracker::{SlotQuestion, SlotTracker};

/// What the policy wants done with the current turn.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyAction {
    /// Pose this single question.
    Ask {
        kind: SlotQuestion,
        question: &'static str,
    },
    /// The utterance carries nothing to assess; treat the turn as support.
    FallThroughToSupport,
    /// Nothing is missing; move to the conclusion.
    Conclude,
}

/// Decides the single question for the first assessment turn.
pub fn intake_turn(
    utterance: &str,
    emotion: Option<&EmotionReading>,
    intake: &IntakeInfo,
    tracker: &SlotTracker,
) -> PolicyAction {
    let text = lexicon::normalize(utterance);

    let negative_override = lexicon::contains_any(&text, lexicon::DISTRESS_WORDS)
        || lexicon::contains_any(&text, lexicon::IMPAIRMENT_WORDS)
        || lexicon::contains_any(&text, lexicon::DESPAIR_WORDS)
        || lexicon::contains_any(&text, lexicon::RISK_WORDS)
        || lexicon::contains_any(&text, lexicon::HELP_WORDS)
        || emotion.is_some_and(|e| e.is_high_intensity_negative());
    if !negative_override {
        return PolicyAction::FallThroughToSupport;
    }

    let stress_vocab = lexicon::contains_any(&text, lexicon::DISTRESS_WORDS)
        || lexicon::contains_any(&text, lexicon::IMPAIRMENT_WORDS)
        || lexicon::contains_any(&text, lexicon::STRESSOR_WORDS);
    if stress_vocab && !tracker.probe_complete() {
        return PolicyAction::Ask {
            kind: SlotQuestion::Probe,
            question: questions::SOCRATIC_PROBE,
        };
    }

    if intake.context.is_none() {
        return PolicyAction::Ask {
            kind: SlotQuestion::ContextProbe,
            question: questions::CONTEXT_PROBE,
        };
    }
    if intake.duration.is_none() {
        return PolicyAction::Ask {
            kind: SlotQuestion::DurationProbe,
            question: questions::DURATION_PROBE,
        };
    }
    PolicyAction::Ask {
        kind: SlotQuestion::GenericProbe,
        question: questions::GENERIC_PROBE,
    }
}

/// Decides the single question for a follow-up turn, or concludes.
///
/// Candidate order: the unanswered probe halves first, then the gap
/// detector's priority. A candidate that would repeat the previous
/// question verbatim is skipped.
pub fn followup_turn(intake: &IntakeInfo, tracker: &SlotTracker) -> PolicyAction {
    for (kind, question) in candidates(intake, tracker) {
        if tracker.repeats_last(question) {
            continue;
        }
        return PolicyAction::Ask { kind, question };
    }
    PolicyAction::Conclude
}

fn candidates(intake: &IntakeInfo, tracker: &SlotTracker) -> Vec<(SlotQuestion, &'static str)> {
    let mut list = Vec::new();
    if tracker.probe_asked && !tracker.scene_done {
        list.push((SlotQuestion::SceneFollowup, questions::SCENE_FOLLOWUP));
    }
    if tracker.probe_asked && tracker.scene_done && !tracker.thought_done {
        list.push((SlotQuestion::ThoughtFollowup, questions::THOUGHT_FOLLOWUP));
    }
    if let Some(gap) = next_gap(intake, tracker.asked_slots(), tracker.risk_warranted) {
        let candidate = match gap {
            GapKey::Impact => (SlotQuestion::ImpactScale, questions::IMPACT_SCALE_QUESTION),
            GapKey::Duration => (
                SlotQuestion::DurationOptions,
                questions::DURATION_OPTIONS_QUESTION,
            ),
            GapKey::Context => (SlotQuestion::ContextProbe, questions::CONTEXT_PROBE),
            GapKey::Risk => (SlotQuestion::RiskOptions, questions::RISK_OPTIONS_QUESTION),
        };
        list.push(candidate);
    }
    list
}
