//! Embedded skill registry.
//!
//! The registry is compiled into the binary via `include_str!` so the
//! selector never depends on files being present at runtime. A malformed
//! registry is a build defect, so parsing panics at first access.

use once_cell::sync::Lazy;

use super::skill::Skill;

const REGISTRY_YAML: &str = include_str!("registry.yaml");

static EMBEDDED: Lazy<SkillRegistry> = Lazy::new(|| {
    SkillRegistry::from_yaml(REGISTRY_YAML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded skill registry: {}", e))
});

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SkillRegistry {
    skills: Vec<Skill>,
}

impl SkillRegistry {
    /// The registry baked into the binary.
    pub fn embedded() -> &'static SkillRegistry {
        &EMBEDDED
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn all(&self) -> &[Skill] {
        &self.skills
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::{cjk_len, has_metric_token, STEP_CJK_BUDGET};

    #[test]
    fn embedded_registry_parses() {
        let registry = SkillRegistry::embedded();
        assert!(registry.all().len() >= 6);
        assert!(registry.get("paced-breathing").is_some());
        assert!(registry.get("no-such-skill").is_none());
    }

    #[test]
    fn every_skill_has_a_line_and_three_to_five_steps() {
        for skill in SkillRegistry::embedded().all() {
            assert!(
                !skill.templates.next_steps_lines.is_empty(),
                "{} has no next-steps line",
                skill.id
            );
            let steps = &skill.templates.action_card.steps;
            assert!(
                (3..=5).contains(&steps.len()),
                "{} has {} steps",
                skill.id,
                steps.len()
            );
        }
    }

    #[test]
    fn every_template_step_fits_the_contract_once_rendered() {
        for skill in SkillRegistry::embedded().all() {
            for step in &skill.templates.action_card.steps {
                let mut rendered = step.clone();
                for slot in &skill.slots {
                    if let Some(default) = &slot.default {
                        rendered =
                            rendered.replace(&format!("{{{}}}", slot.name), default);
                    }
                }
                assert!(
                    cjk_len(&rendered) <= STEP_CJK_BUDGET,
                    "{}: step too long: {}",
                    skill.id,
                    rendered
                );
                assert!(
                    has_metric_token(&rendered),
                    "{}: step lacks a countable token: {}",
                    skill.id,
                    rendered
                );
            }
        }
    }

    #[test]
    fn skills_with_risk_prerequisites_are_marked() {
        let reach_out = SkillRegistry::embedded().get("reach-out").unwrap();
        assert!(reach_out.applicability.requires_risk_info);
    }
}
