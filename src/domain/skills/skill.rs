//! Static skill definitions loaded from the embedded registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tier::RiskTier;

/// A coping skill with its applicability rules and render templates.
#[derive(Debug, Clone, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub applicability: Applicability,
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
    pub templates: Templates,
}

impl Skill {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|t| self.has_tag(t))
    }

    pub fn slot(&self, name: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|s| s.name == name)
    }
}

/// Predicates deciding whether a skill may be offered at all.
#[derive(Debug, Clone, Deserialize)]
pub struct Applicability {
    pub risk_tiers: Vec<RiskTier>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub min_impact: u8,
    #[serde(default)]
    pub requires_risk_info: bool,
}

impl Applicability {
    pub fn allows_tier(&self, tier: RiskTier) -> bool {
        self.risk_tiers.contains(&tier)
    }

    /// A skill reserved for elevated tiers counts as a tier match there;
    /// a skill open to everyone is generic rather than a match.
    pub fn targets_tier(&self, tier: RiskTier) -> bool {
        self.allows_tier(tier) && !self.allows_tier(RiskTier::Low)
    }

    pub fn allows_emotion(&self, emotion: Option<&str>) -> bool {
        match emotion {
            Some(label) if !self.emotions.is_empty() => {
                self.emotions.iter().any(|e| e == label)
            }
            _ => true,
        }
    }
}

/// A template placeholder and how to fill it when no value is supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotSpec {
    pub name: String,
    pub kind: SlotKind,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Count,
    Minutes,
    Text,
}

impl SlotKind {
    /// Last-resort value when neither the registry nor the conversation
    /// supplies one.
    pub fn fallback_value(&self) -> &'static str {
        match self {
            SlotKind::Count => "1",
            SlotKind::Minutes => "5",
            SlotKind::Text => "",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Templates {
    pub next_steps_lines: Vec<String>,
    pub action_card: CardTemplate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardTemplate {
    pub title: String,
    pub when: String,
    pub effort: Effort,
    #[serde(default)]
    pub widget: Option<String>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// One skill chosen for the final reply, with the reason kept for logs.
#[derive(Debug, Clone)]
pub struct SkillSelection {
    pub skill_id: String,
    pub reason: String,
    pub slot_values: HashMap<String, String>,
}

/// A fully rendered card as it appears in the structured reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub skill_id: String,
    pub title: String,
    pub steps: Vec<String>,
    pub when: String,
    pub effort: Effort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}
