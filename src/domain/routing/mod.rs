//! Turn routing: support / assessment classification and the crisis
//! keyword prefilter.

pub mod crisis;
pub mod lexicon;

mod emotion;
mod router;

pub use crisis::{screen_keywords, PrefilterHit};
pub use emotion::{EmotionReading, HIGH_INTENSITY_THRESHOLD};
pub use router::{classify_turn, AssistRoute, RouteDecision, RouteSignal};
