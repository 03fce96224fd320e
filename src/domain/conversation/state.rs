//! Turn-level conversation state exposed on the wire.

use serde::{Deserialize, Serialize};

/// Where the conversation stands after the latest turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// Free conversation, no pending question.
    #[default]
    Normal,
    /// An assessment question is outstanding.
    AwaitingFollowup,
    /// A crisis reply was issued; safety talk takes precedence.
    InCrisis,
}

impl TurnState {
    pub fn label(&self) -> &'static str {
        match self {
            TurnState::Normal => "normal",
            TurnState::AwaitingFollowup => "awaiting_followup",
            TurnState::InCrisis => "in_crisis",
        }
    }

    pub fn is_crisis(&self) -> bool {
        matches!(self, TurnState::InCrisis)
    }
}
