//! Auxiliary memory: fact extraction types, the forgetting curve and
//! consolidation decisions.

mod consolidation;
mod fact;
mod forgetting;

pub use consolidation::{consolidate_lexically, ConsolidationAction};
pub use fact::{ExtractedFact, MemoryFact, MemoryTier};
pub use forgetting::{
    rank_by_strength, strength, touch, STABILITY_CAP, STABILITY_GROWTH,
    SLOW_DECAY_HALF_LIFE_DAYS, STANDARD_HALF_LIFE_DAYS,
};
