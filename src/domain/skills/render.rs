//! Renders selected skills into action cards and next-steps lines.
//!
//! Slot placeholders resolve in order: an explicit value on the
//! selection, a value derived from the conversation, the registry
//! default, then the slot kind's fallback. The output shape is fixed at
//! two cards and two to three lines no matter how selection went.

use std::collections::HashMap;

use super::registry::SkillRegistry;
use super::skill::{ActionCard, Skill, SkillSelection, SlotSpec};
use crate::domain::intake::IntakeInfo;

/// Longest scene fragment substituted into a line template.
const SCENE_CHAR_CAP: usize = 12;

const FALLBACK_LINE: &str = "每天晚上用1分钟回顾今天的状态；完成标准：连续3天。";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPlan {
    pub action_cards: Vec<ActionCard>,
    pub next_steps_lines: Vec<String>,
}

pub fn render_skills(
    registry: &SkillRegistry,
    selections: &[SkillSelection],
    intake: &IntakeInfo,
) -> RenderedPlan {
    let mut cards = Vec::with_capacity(2);
    let mut lines = Vec::with_capacity(3);

    for selection in selections {
        let Some(skill) = registry.get(&selection.skill_id) else {
            continue;
        };
        let values = resolve_slots(skill, selection, intake);
        cards.push(render_card(skill, &values));
        for line in &skill.templates.next_steps_lines {
            lines.push(substitute(line, &values));
        }
    }

    if cards.is_empty() {
        if let Some(skill) = registry.all().first() {
            let values = default_values(skill);
            cards.push(render_card(skill, &values));
            for line in &skill.templates.next_steps_lines {
                lines.push(substitute(line, &values));
            }
        }
    }
    while cards.len() < 2 {
        match cards.last().cloned() {
            Some(card) => cards.push(card),
            None => break,
        }
    }
    cards.truncate(2);

    lines.dedup();
    while lines.len() < 2 {
        lines.push(FALLBACK_LINE.to_string());
    }
    lines.truncate(3);

    RenderedPlan {
        action_cards: cards,
        next_steps_lines: lines,
    }
}

fn render_card(skill: &Skill, values: &HashMap<String, String>) -> ActionCard {
    let template = &skill.templates.action_card;
    ActionCard {
        skill_id: skill.id.clone(),
        title: substitute(&template.title, values),
        steps: template.steps.iter().map(|s| substitute(s, values)).collect(),
        when: substitute(&template.when, values),
        effort: template.effort,
        widget: template.widget.clone(),
    }
}

fn resolve_slots(
    skill: &Skill,
    selection: &SkillSelection,
    intake: &IntakeInfo,
) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for slot in &skill.slots {
        let value = selection
            .slot_values
            .get(&slot.name)
            .cloned()
            .or_else(|| derive_from_intake(slot, intake))
            .or_else(|| slot.default.clone())
            .unwrap_or_else(|| slot.kind.fallback_value().to_string());
        values.insert(slot.name.clone(), value);
    }
    values
}

fn default_values(skill: &Skill) -> HashMap<String, String> {
    skill
        .slots
        .iter()
        .map(|slot| {
            let value = slot
                .default
                .clone()
                .unwrap_or_else(|| slot.kind.fallback_value().to_string());
            (slot.name.clone(), value)
        })
        .collect()
}

fn derive_from_intake(slot: &SlotSpec, intake: &IntakeInfo) -> Option<String> {
    match slot.name.as_str() {
        "trigger_scene" => intake
            .context
            .as_deref()
            .or(intake.main_issue.as_deref())
            .map(|scene| scene.chars().take(SCENE_CHAR_CAP).collect()),
        _ => None,
    }
}

fn substitute(template: &str, values: &HashMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}
