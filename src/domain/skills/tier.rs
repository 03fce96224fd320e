//! Risk tier inference from the gathered intake picture.

use serde::{Deserialize, Serialize};

use crate::domain::intake::{DurationBucket, RiskLevel};

/// Overall severity tier used to filter and score skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Crisis,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
            RiskTier::Crisis => "crisis",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskTier::High | RiskTier::Crisis)
    }
}

/// Derives the tier from risk level, risk-vocabulary presence, impact
/// and duration. The explicit risk answer dominates; impact and
/// duration only ever raise the tier.
pub fn infer_tier(
    risk: RiskLevel,
    has_risk_thoughts: bool,
    impact: Option<u8>,
    duration: Option<DurationBucket>,
) -> RiskTier {
    let mut tier = match risk {
        RiskLevel::Plan => return RiskTier::Crisis,
        RiskLevel::Frequent => return RiskTier::High,
        RiskLevel::Passive => RiskTier::Moderate,
        RiskLevel::None | RiskLevel::Unknown => RiskTier::Low,
    };

    if has_risk_thoughts {
        tier = tier.max(RiskTier::Moderate);
    }
    if let Some(score) = impact {
        if score >= 8 && has_risk_thoughts {
            tier = tier.max(RiskTier::High);
        } else if score >= 8 {
            tier = tier.max(RiskTier::Moderate);
        }
        if score >= 7 && duration.is_some_and(|d| d.is_sustained()) {
            tier = tier.max(RiskTier::Moderate);
        }
    }
    tier
}
