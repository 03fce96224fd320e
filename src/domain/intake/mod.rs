//! Intake slot parsing and gap detection.
//!
//! Free text goes in, structured slots come out, and the gap report says
//! which slot to ask about next.

mod context;
mod duration;
mod gap;
mod impact;
mod info;
mod risk;
mod rules;

pub use gap::{
    next_gap, parse_slots, warrants_risk_question, AskedSlots, GapKey, ParseContext, SlotParse,
};
pub use info::{DurationBucket, IntakeInfo, ParsedSlots, RiskLevel};
pub use risk::establishes_risk_context;
