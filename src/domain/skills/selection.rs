//! Skill selection.
//!
//! Filters the registry by applicability, scores the survivors and picks
//! exactly one stabilization skill plus one complementary skill. When
//! nothing survives a slot, a safe default fills it so the reply always
//! carries two skills.

use std::collections::HashMap;

use super::registry::SkillRegistry;
use super::skill::{Skill, SkillSelection};
use super::tier::RiskTier;
use crate::domain::intake::IntakeInfo;

const STABILIZATION_TAGS: &[&str] = &["breathing", "mindfulness", "grounding"];
const ELEVATED_COMPLEMENT_TAGS: &[&str] = &["support", "medical"];
const ROUTINE_COMPLEMENT_TAGS: &[&str] = &["tracking", "journaling"];

const DEFAULT_STABILIZATION: &str = "paced-breathing";
const DEFAULT_COMPLEMENTARY: &str = "mood-journal";

/// Picks the two skills to render for this conclusion turn.
pub fn select_skills(
    registry: &SkillRegistry,
    tier: RiskTier,
    emotion: Option<&str>,
    intake: &IntakeInfo,
) -> Vec<SkillSelection> {
    let scored: Vec<(&Skill, i32)> = registry
        .all()
        .iter()
        .filter(|skill| is_applicable(skill, tier, emotion, intake))
        .map(|skill| (skill, score(skill, tier, emotion, intake)))
        .collect();

    let complement_tags = if tier.is_elevated() {
        ELEVATED_COMPLEMENT_TAGS
    } else {
        ROUTINE_COMPLEMENT_TAGS
    };

    let stabilization = best_with_tags(&scored, STABILIZATION_TAGS, None);
    let stabilization_id = stabilization.map(|(s, _)| s.id.as_str());
    let complementary = best_with_tags(&scored, complement_tags, stabilization_id);

    let mut selections = Vec::with_capacity(2);
    selections.push(selection_or_default(
        stabilization,
        registry,
        DEFAULT_STABILIZATION,
        "stabilization",
        tier,
    ));
    selections.push(selection_or_default(
        complementary,
        registry,
        DEFAULT_COMPLEMENTARY,
        "complementary",
        tier,
    ));
    selections.retain(|s| !s.skill_id.is_empty());
    selections
}

fn is_applicable(
    skill: &Skill,
    tier: RiskTier,
    emotion: Option<&str>,
    intake: &IntakeInfo,
) -> bool {
    let app = &skill.applicability;
    if !app.allows_tier(tier) || !app.allows_emotion(emotion) {
        return false;
    }
    if app.min_impact > 0 {
        match intake.impact_score {
            Some(score) if score >= app.min_impact => {}
            _ => return false,
        }
    }
    if app.requires_risk_info && !intake.risk_level.is_known() {
        return false;
    }
    true
}

fn score(skill: &Skill, tier: RiskTier, emotion: Option<&str>, intake: &IntakeInfo) -> i32 {
    let app = &skill.applicability;
    let mut score = 0;
    if app.targets_tier(tier) {
        score += 10;
    }
    if let Some(label) = emotion {
        if app.emotions.iter().any(|e| e == label) {
            score += 5;
        }
    }
    if let Some(impact) = intake.impact_score {
        if app.min_impact > 0 && impact.saturating_sub(app.min_impact) <= 3 {
            score += 3;
        }
    }
    if skill.has_any_tag(&["grounding", "self-care"]) {
        score += 2;
    }
    score
}

/// Highest score wins; ties keep registry order. `exclude` prevents the
/// same skill from filling both slots.
fn best_with_tags<'a>(
    scored: &[(&'a Skill, i32)],
    tags: &[&str],
    exclude: Option<&str>,
) -> Option<(&'a Skill, i32)> {
    let mut best: Option<(&'a Skill, i32)> = None;
    for (skill, score) in scored {
        if !skill.has_any_tag(tags) {
            continue;
        }
        if exclude.is_some_and(|id| id == skill.id) {
            continue;
        }
        if best.map_or(true, |(_, s)| *score > s) {
            best = Some((skill, *score));
        }
    }
    best
}

fn selection_or_default(
    pick: Option<(&Skill, i32)>,
    registry: &SkillRegistry,
    default_id: &str,
    role: &str,
    tier: RiskTier,
) -> SkillSelection {
    match pick {
        Some((skill, score)) => SkillSelection {
            skill_id: skill.id.clone(),
            reason: format!("{}, tier={}, score={}", role, tier.label(), score),
            slot_values: HashMap::new(),
        },
        None => {
            let id = registry
                .get(default_id)
                .map(|s| s.id.clone())
                .or_else(|| registry.all().first().map(|s| s.id.clone()))
                .unwrap_or_default();
            SkillSelection {
                skill_id: id,
                reason: format!("{} default, tier={}", role, tier.label()),
                slot_values: HashMap::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::RiskLevel;

    fn empty_intake() -> IntakeInfo {
        IntakeInfo::default()
    }

    fn ids(selections: &[SkillSelection]) -> Vec<&str> {
        selections.iter().map(|s| s.skill_id.as_str()).collect()
    }

    #[test]
    fn no_signal_falls_back_to_defaults() {
        let picks = select_skills(
            SkillRegistry::embedded(),
            RiskTier::Low,
            None,
            &empty_intake(),
        );
        assert_eq!(ids(&picks), vec!["paced-breathing", "mood-journal"]);
    }

    #[test]
    fn anxiety_prefers_breathing_for_stabilization() {
        let picks = select_skills(
            SkillRegistry::embedded(),
            RiskTier::Low,
            Some("anxiety"),
            &empty_intake(),
        );
        assert_eq!(picks[0].skill_id, "paced-breathing");
    }

    #[test]
    fn known_impact_brings_the_thought_record() {
        let mut intake = empty_intake();
        intake.impact_score = Some(5);
        let picks = select_skills(
            SkillRegistry::embedded(),
            RiskTier::Low,
            Some("anxiety"),
            &intake,
        );
        assert_eq!(picks[1].skill_id, "thought-record");
    }

    #[test]
    fn elevated_tier_with_known_risk_brings_a_support_skill() {
        let mut intake = empty_intake();
        intake.risk_level = RiskLevel::Frequent;
        let picks = select_skills(
            SkillRegistry::embedded(),
            RiskTier::High,
            Some("depression"),
            &intake,
        );
        assert_eq!(picks[1].skill_id, "reach-out");
    }

    #[test]
    fn unknown_risk_excludes_risk_gated_skills() {
        let mut intake = empty_intake();
        intake.impact_score = Some(8);
        let picks = select_skills(
            SkillRegistry::embedded(),
            RiskTier::Moderate,
            None,
            &intake,
        );
        assert!(!ids(&picks).contains(&"reach-out"));
    }

    #[test]
    fn selection_is_always_two_distinct_skills() {
        let tiers = [
            RiskTier::Low,
            RiskTier::Moderate,
            RiskTier::High,
            RiskTier::Crisis,
        ];
        let emotions = [None, Some("anxiety"), Some("depression"), Some("anger")];
        for tier in tiers {
            for emotion in emotions {
                let picks =
                    select_skills(SkillRegistry::embedded(), tier, emotion, &empty_intake());
                assert_eq!(picks.len(), 2, "tier {:?} emotion {:?}", tier, emotion);
                assert_ne!(picks[0].skill_id, picks[1].skill_id);
            }
        }
    }
}
