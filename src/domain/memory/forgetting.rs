//! Forgetting curve over memory facts.
//!
//! Strength decays exponentially with days since last access,
//! `e^(-days / (k * stability))`, where `k` is calibrated per tier so
//! that a fresh fact halves at the tier's half-life. Accessing a fact
//! multiplies its stability, flattening the curve.

use std::f64::consts::LN_2;

use super::fact::{MemoryFact, MemoryTier};
use crate::domain::foundation::Timestamp;

pub const SLOW_DECAY_HALF_LIFE_DAYS: f64 = 90.0;
pub const STANDARD_HALF_LIFE_DAYS: f64 = 30.0;

pub const STABILITY_GROWTH: f64 = 1.5;
pub const STABILITY_CAP: f64 = 10.0;

fn decay_constant(tier: MemoryTier) -> Option<f64> {
    match tier {
        MemoryTier::Permanent => None,
        MemoryTier::SlowDecay => Some(SLOW_DECAY_HALF_LIFE_DAYS / LN_2),
        MemoryTier::Standard => Some(STANDARD_HALF_LIFE_DAYS / LN_2),
    }
}

/// Current recall strength in `(0, 1]`.
pub fn strength(fact: &MemoryFact, now: Timestamp) -> f64 {
    match decay_constant(fact.tier) {
        None => 1.0,
        Some(k) => {
            let days = now.days_since(&fact.last_accessed);
            (-days / (k * fact.stability)).exp()
        }
    }
}

/// Records an access: stability grows, the decay clock restarts.
pub fn touch(fact: &mut MemoryFact, now: Timestamp) {
    fact.stability = (fact.stability * STABILITY_GROWTH).min(STABILITY_CAP);
    fact.last_accessed = now;
}

/// Strongest first; ties keep input order.
pub fn rank_by_strength<'a>(facts: &'a [MemoryFact], now: Timestamp) -> Vec<&'a MemoryFact> {
    let mut ranked: Vec<(&MemoryFact, f64)> =
        facts.iter().map(|f| (f, strength(f, now))).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.into_iter().map(|(f, _)| f).collect()
}
