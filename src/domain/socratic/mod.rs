//! Socratic question policy: the intake → gap_followup state machine.

pub mod questions;

mod policy;
mod stage;
mod tracker;

pub use policy::{followup_turn, intake_turn, PolicyAction};
pub use stage::{advance, AssessmentStage, StageEvent};
pub use tracker::{SlotQuestion, SlotTracker};
