//! Assessment stage enum and its pure transition function.

use serde::{Deserialize, Serialize};

/// Where the assessment dialogue currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStage {
    /// First assessment turn: one open question, no scales or options.
    #[default]
    Intake,
    /// Slot-filling: one question per turn until nothing is missing.
    GapFollowup,
    /// Terminal: recommendations have been delivered.
    Conclusion,
}

impl AssessmentStage {
    /// Wire label used in the HTTP contract.
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentStage::Intake => "intake",
            AssessmentStage::GapFollowup => "gap_followup",
            AssessmentStage::Conclusion => "conclusion",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssessmentStage::Conclusion)
    }
}

/// What the policy did with the turn, as seen by the stage machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// A question was posed to the user.
    QuestionPosed,
    /// Every slot is either answered or settled; time to conclude.
    SlotsSettled,
}

/// Pure stage transition.
///
/// Intake always yields to gap follow-up after its single question;
/// conclusion is terminal no matter what arrives.
pub fn advance(stage: AssessmentStage, event: StageEvent) -> AssessmentStage {
    match (stage, event) {
        (AssessmentStage::Intake, StageEvent::QuestionPosed) => AssessmentStage::GapFollowup,
        (AssessmentStage::Intake, StageEvent::SlotsSettled) => AssessmentStage::Conclusion,
        (AssessmentStage::GapFollowup, StageEvent::QuestionPosed) => AssessmentStage::GapFollowup,
        (AssessmentStage::GapFollowup, StageEvent::SlotsSettled) => AssessmentStage::Conclusion,
        (AssessmentStage::Conclusion, _) => AssessmentStage::Conclusion,
    }
}
