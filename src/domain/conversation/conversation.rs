//! Conversation aggregate for the check-in dialogue.
//!
//! Holds the message history plus the per-assessment working state:
//! the intake slots, the question tracker and the stage machine. All
//! slot state advances monotonically, so replaying a turn cannot
//! regress what is already known.

use crate::domain::conversation::{Message, Role, TurnState};
use crate::domain::foundation::{ConversationId, Timestamp, ValidationError};
use crate::domain::intake::{IntakeInfo, ParsedSlots};
use crate::domain::socratic::{advance, AssessmentStage, SlotQuestion, SlotTracker, StageEvent};

/// A check-in conversation and its assessment working state.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: ConversationId,
    messages: Vec<Message>,
    state: TurnState,
    stage: AssessmentStage,
    intake: IntakeInfo,
    tracker: SlotTracker,
    turn_count: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            state: TurnState::Normal,
            stage: AssessmentStage::Intake,
            intake: IntakeInfo::default(),
            tracker: SlotTracker::default(),
            turn_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn stage(&self) -> AssessmentStage {
        self.stage
    }

    pub fn intake(&self) -> &IntakeInfo {
        &self.intake
    }

    pub fn tracker(&self) -> &SlotTracker {
        &self.tracker
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::Assistant)
    }

    // === Message history ===

    /// Appends a user message and counts the turn.
    pub fn record_user_message(
        &mut self,
        content: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let message = Message::user(content)?;
        self.messages.push(message);
        self.turn_count += 1;
        self.touch();
        Ok(())
    }

    pub fn record_assistant_message(
        &mut self,
        content: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let message = Message::assistant(content)?;
        self.messages.push(message);
        self.touch();
        Ok(())
    }

    // === Assessment state ===

    /// Merges parsed slots into the intake picture. Defined values win;
    /// nothing ever reverts to unknown.
    pub fn absorb_slots(&mut self, parsed: ParsedSlots) {
        self.intake.merge(parsed);
        self.touch();
    }

    pub fn note_main_issue(&mut self, utterance: &str) {
        self.intake.note_main_issue(utterance);
        self.touch();
    }

    /// Attributes the incoming answer to the previously asked question.
    pub fn absorb_answer(&mut self, utterance: &str) {
        self.tracker.note_answer(utterance);
        self.touch();
    }

    /// Records that a question was asked and advances the stage machine.
    pub fn note_question(&mut self, kind: SlotQuestion, question: &str) {
        self.tracker.note_question(kind, question);
        self.stage = advance(self.stage, StageEvent::QuestionPosed);
        self.state = TurnState::AwaitingFollowup;
        self.touch();
    }

    pub fn mark_risk_warranted(&mut self) {
        self.tracker.mark_risk_warranted();
        self.touch();
    }

    /// Closes the assessment and drops the per-assessment slot state.
    /// The stage stays terminal; later turns are supportive.
    pub fn conclude(&mut self) {
        self.stage = advance(self.stage, StageEvent::SlotsSettled);
        self.state = TurnState::Normal;
        self.intake = IntakeInfo::default();
        self.tracker = SlotTracker::default();
        self.touch();
    }

    pub fn enter_crisis(&mut self) {
        self.state = TurnState::InCrisis;
        self.touch();
    }

    /// Leaves crisis handling without touching assessment state.
    pub fn leave_crisis(&mut self) {
        if self.state.is_crisis() {
            self.state = TurnState::Normal;
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversations_start_clean() {
        let conversation = Conversation::new();
        assert_eq!(conversation.state(), TurnState::Normal);
        assert_eq!(conversation.stage(), AssessmentStage::Intake);
        assert_eq!(conversation.turn_count(), 0);
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn user_messages_count_turns() {
        let mut conversation = Conversation::new();
        conversation.record_user_message("最近压力很大").unwrap();
        conversation.record_assistant_message("愿意说说吗？").unwrap();
        conversation.record_user_message("工作太多了").unwrap();
        assert_eq!(conversation.turn_count(), 2);
        assert_eq!(conversation.messages().len(), 3);
    }

    #[test]
    fn asking_a_question_enters_followup() {
        let mut conversation = Conversation::new();
        conversation.note_question(SlotQuestion::Probe, "发生了什么？");
        assert_eq!(conversation.state(), TurnState::AwaitingFollowup);
        assert_eq!(conversation.stage(), AssessmentStage::GapFollowup);
    }

    #[test]
    fn concluding_discards_assessment_state() {
        let mut conversation = Conversation::new();
        conversation.note_question(SlotQuestion::ImpactScale, "0-10打几分？");
        let parsed = ParsedSlots {
            impact: Some(7),
            ..ParsedSlots::default()
        };
        conversation.absorb_slots(parsed);
        assert_eq!(conversation.intake().impact_score, Some(7));

        conversation.conclude();
        assert_eq!(conversation.stage(), AssessmentStage::Conclusion);
        assert_eq!(conversation.state(), TurnState::Normal);
        assert_eq!(conversation.intake().impact_score, None);
        assert!(!conversation.tracker().asked_slots().impact);
    }

    #[test]
    fn crisis_state_is_entered_and_left_explicitly() {
        let mut conversation = Conversation::new();
        conversation.enter_crisis();
        assert!(conversation.state().is_crisis());
        conversation.leave_crisis();
        assert_eq!(conversation.state(), TurnState::Normal);
    }

    #[test]
    fn last_assistant_message_skips_user_turns() {
        let mut conversation = Conversation::new();
        conversation.record_assistant_message("你好，今天感觉怎么样？").unwrap();
        conversation.record_user_message("还行吧").unwrap();
        let last = conversation.last_assistant_message().unwrap();
        assert_eq!(last.content(), "你好，今天感觉怎么样？");
    }
}
