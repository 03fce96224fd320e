//! Slot tracker: the single authoritative record of question progress.
//!
//! Tracks which questions were posed and whether the Socratic probe got
//! its scene and thought answers. Values live in `IntakeInfo`; progress
//! lives here. All flags only ever flip false→true, so replaying a turn
//! cannot regress the dialogue.

use serde::{Deserialize, Serialize};

use crate::domain::intake::AskedSlots;
use crate::domain::routing::lexicon;

/// Identity of a posed question, used for answer attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotQuestion {
    Probe,
    SceneFollowup,
    ThoughtFollowup,
    ContextProbe,
    DurationProbe,
    GenericProbe,
    ImpactScale,
    DurationOptions,
    RiskOptions,
}

/// Question progress for one assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotTracker {
    pub probe_asked: bool,
    pub scene_done: bool,
    pub thought_done: bool,
    asked: AskedSlots,
    pub risk_warranted: bool,
    pub last_asked: Option<SlotQuestion>,
    last_question: Option<String>,
}

impl SlotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a question was posed this turn.
    pub fn note_question(&mut self, kind: SlotQuestion, text: &str) {
        match kind {
            SlotQuestion::Probe => self.probe_asked = true,
            SlotQuestion::ImpactScale => self.asked.impact = true,
            SlotQuestion::DurationOptions => self.asked.duration = true,
            SlotQuestion::ContextProbe => self.asked.context = true,
            SlotQuestion::RiskOptions => self.asked.risk = true,
            SlotQuestion::SceneFollowup
            | SlotQuestion::ThoughtFollowup
            | SlotQuestion::DurationProbe
            | SlotQuestion::GenericProbe => {}
        }
        self.last_asked = Some(kind);
        self.last_question = Some(lexicon::normalize_question(text));
    }

    /// Attributes an answer to the most recently posed question.
    pub fn note_answer(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        match self.last_asked {
            Some(SlotQuestion::Probe) | Some(SlotQuestion::SceneFollowup) => {
                self.scene_done = true;
                if has_thought_content(trimmed) {
                    self.thought_done = true;
                }
            }
            Some(SlotQuestion::ThoughtFollowup) => {
                self.thought_done = true;
            }
            _ => {}
        }
    }

    /// Marks the dual risk threshold as met. Sticky for the session.
    pub fn mark_risk_warranted(&mut self) {
        self.risk_warranted = true;
    }

    /// True once the probe was asked and both halves were answered.
    pub fn probe_complete(&self) -> bool {
        self.probe_asked && self.scene_done && self.thought_done
    }

    /// View for the gap detector.
    pub fn asked_slots(&self) -> AskedSlots {
        self.asked
    }

    /// True when the candidate question matches the previous one after
    /// normalization.
    pub fn repeats_last(&self, question: &str) -> bool {
        self.last_question
            .as_deref()
            .is_some_and(|prev| prev == lexicon::normalize_question(question))
    }
}

/// True when the text reports an automatic thought, not just events.
fn has_thought_content(text: &str) -> bool {
    lexicon::contains_any(text, lexicon::THOUGHT_MARKERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::socratic::questions;

    #[test]
    fn probe_answer_with_thought_completes_both_halves() {
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::Probe, questions::SOCRATIC_PROBE);
        tracker.note_answer("被领导当众批评了，我觉得自己很没用");

        assert!(tracker.probe_complete());
    }

    #[test]
    fn probe_answer_without_thought_leaves_thought_open() {
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::Probe, questions::SOCRATIC_PROBE);
        tracker.note_answer("上周的项目汇报搞砸了");

        assert!(tracker.scene_done);
        assert!(!tracker.thought_done);
        assert!(!tracker.probe_complete());
    }

    #[test]
    fn thought_followup_answer_completes_the_probe() {
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::Probe, questions::SOCRATIC_PROBE);
        tracker.note_answer("上周的项目汇报搞砸了");
        tracker.note_question(SlotQuestion::ThoughtFollowup, questions::THOUGHT_FOLLOWUP);
        tracker.note_answer("就是缓不过来");

        assert!(tracker.probe_complete());
    }

    #[test]
    fn empty_answers_attribute_nothing() {
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::Probe, questions::SOCRATIC_PROBE);
        tracker.note_answer("   ");

        assert!(!tracker.scene_done);
    }

    #[test]
    fn option_questions_set_their_asked_flags() {
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::ImpactScale, questions::IMPACT_SCALE_QUESTION);
        tracker.note_question(
            SlotQuestion::DurationOptions,
            questions::DURATION_OPTIONS_QUESTION,
        );
        tracker.note_question(SlotQuestion::RiskOptions, questions::RISK_OPTIONS_QUESTION);

        let asked = tracker.asked_slots();
        assert!(asked.impact);
        assert!(asked.duration);
        assert!(asked.risk);
        assert!(!asked.context);
    }

    #[test]
    fn open_duration_probe_does_not_exhaust_the_slot() {
        // The lettered options question is a different question and may
        // still be asked later.
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::DurationProbe, questions::DURATION_PROBE);
        assert!(!tracker.asked_slots().duration);
    }

    #[test]
    fn repeats_last_ignores_punctuation_differences() {
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::ImpactScale, "影响有多大？");
        assert!(tracker.repeats_last("影响有多大"));
        assert!(!tracker.repeats_last("持续多久了"));
    }

    #[test]
    fn risk_warranted_is_sticky() {
        let mut tracker = SlotTracker::new();
        tracker.mark_risk_warranted();
        assert!(tracker.risk_warranted);
    }

    #[test]
    fn flags_survive_serde_round_trip() {
        let mut tracker = SlotTracker::new();
        tracker.note_question(SlotQuestion::Probe, questions::SOCRATIC_PROBE);
        tracker.note_answer("因为加班，我觉得撑不住了");

        let json = serde_json::to_string(&tracker).unwrap();
        let back: SlotTracker = serde_json::from_str(&json).unwrap();
        assert_eq!(tracker, back);
    }
}
