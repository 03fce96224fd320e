//! Pure structural gate over generated action cards and next-steps
//! lines. The gate never mutates its input; repairs belong to the
//! sanitizer.

use std::fmt;

use super::tokens::{
    cjk_len, has_metric_token, has_trigger_marker, split_completion, step_has_token,
    STEP_CJK_BUDGET,
};
use crate::domain::skills::ActionCard;

pub const REQUIRED_CARD_COUNT: usize = 2;
pub const STEP_COUNT_RANGE: (usize, usize) = (3, 5);
pub const LINE_COUNT_RANGE: (usize, usize) = (2, 3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractIssue {
    WrongCardCount { actual: usize },
    StepCountOutOfRange { card: usize, actual: usize },
    StepOverBudget { card: usize, step: usize, cjk: usize },
    StepMissingToken { card: usize, step: usize },
    WrongLineCount { actual: usize },
    LineMissingCompletion { line: usize },
    LineMissingTrigger { line: usize },
    LineMissingMetric { line: usize },
}

impl fmt::Display for ContractIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractIssue::WrongCardCount { actual } => {
                write!(f, "expected {} action cards, got {}", REQUIRED_CARD_COUNT, actual)
            }
            ContractIssue::StepCountOutOfRange { card, actual } => {
                write!(f, "card {} has {} steps, expected 3 to 5", card, actual)
            }
            ContractIssue::StepOverBudget { card, step, cjk } => write!(
                f,
                "card {} step {} runs {} CJK characters, budget is {}",
                card, step, cjk, STEP_CJK_BUDGET
            ),
            ContractIssue::StepMissingToken { card, step } => {
                write!(f, "card {} step {} has no countable token", card, step)
            }
            ContractIssue::WrongLineCount { actual } => {
                write!(f, "expected 2 to 3 next-steps lines, got {}", actual)
            }
            ContractIssue::LineMissingCompletion { line } => {
                write!(f, "line {} has no completion criterion", line)
            }
            ContractIssue::LineMissingTrigger { line } => {
                write!(f, "line {} has no trigger phrase", line)
            }
            ContractIssue::LineMissingMetric { line } => {
                write!(f, "line {} has no metric in its main clause", line)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    pub pass: bool,
    pub missing: Vec<ContractIssue>,
}

impl GateReport {
    pub fn messages(&self) -> Vec<String> {
        self.missing.iter().map(|i| i.to_string()).collect()
    }
}

pub fn validate_action_cards(cards: &[ActionCard]) -> Vec<ContractIssue> {
    let mut issues = Vec::new();
    if cards.len() != REQUIRED_CARD_COUNT {
        issues.push(ContractIssue::WrongCardCount { actual: cards.len() });
    }
    for (card_idx, card) in cards.iter().enumerate() {
        let (min, max) = STEP_COUNT_RANGE;
        if !(min..=max).contains(&card.steps.len()) {
            issues.push(ContractIssue::StepCountOutOfRange {
                card: card_idx,
                actual: card.steps.len(),
            });
        }
        for (step_idx, step) in card.steps.iter().enumerate() {
            let len = cjk_len(step);
            if len > STEP_CJK_BUDGET {
                issues.push(ContractIssue::StepOverBudget {
                    card: card_idx,
                    step: step_idx,
                    cjk: len,
                });
            }
            if !step_has_token(step) {
                issues.push(ContractIssue::StepMissingToken {
                    card: card_idx,
                    step: step_idx,
                });
            }
        }
    }
    issues
}

/// The metric check runs on the main clause only; a digit inside the
/// completion criterion does not satisfy it.
pub fn validate_next_steps_lines(lines: &[String]) -> Vec<ContractIssue> {
    let mut issues = Vec::new();
    let (min, max) = LINE_COUNT_RANGE;
    if !(min..=max).contains(&lines.len()) {
        issues.push(ContractIssue::WrongLineCount { actual: lines.len() });
    }
    for (line_idx, line) in lines.iter().enumerate() {
        match split_completion(line) {
            None => issues.push(ContractIssue::LineMissingCompletion { line: line_idx }),
            Some((main, _)) => {
                if !has_trigger_marker(main) {
                    issues.push(ContractIssue::LineMissingTrigger { line: line_idx });
                }
                if !has_metric_token(main) {
                    issues.push(ContractIssue::LineMissingMetric { line: line_idx });
                }
            }
        }
    }
    issues
}

/// Runs both contract checks over a conclusion reply.
pub fn validate_reply(cards: &[ActionCard], lines: &[String]) -> GateReport {
    let mut missing = validate_action_cards(cards);
    missing.extend(validate_next_steps_lines(lines));
    GateReport {
        pass: missing.is_empty(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::IntakeInfo;
    use crate::domain::skills::{
        render_skills, select_skills, Effort, RiskTier, SkillRegistry,
    };

    fn card(steps: Vec<&str>) -> ActionCard {
        ActionCard {
            skill_id: "test".to_string(),
            title: "测试".to_string(),
            steps: steps.into_iter().map(String::from).collect(),
            when: "任何时候".to_string(),
            effort: Effort::Low,
            widget: None,
        }
    }

    fn valid_cards() -> Vec<ActionCard> {
        vec![
            card(vec!["深呼吸5次", "散步10分钟", "喝水1次"]),
            card(vec!["记录心情1次", "拉伸2分钟", "闭眼休息30秒"]),
        ]
    }

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn a_well_formed_reply_passes() {
        let report = validate_reply(
            &valid_cards(),
            &lines(&[
                "当感到紧张时，深呼吸5次；完成标准：本周至少3次。",
                "每天睡前花2分钟记录情绪；完成标准：连续5天。",
            ]),
        );
        assert!(report.pass, "missing: {:?}", report.missing);
    }

    #[test]
    fn every_rendered_registry_combination_passes_the_gate() {
        let registry = SkillRegistry::embedded();
        let tiers = [
            RiskTier::Low,
            RiskTier::Moderate,
            RiskTier::High,
            RiskTier::Crisis,
        ];
        for tier in tiers {
            for emotion in [None, Some("anxiety"), Some("depression")] {
                let intake = IntakeInfo::default();
                let picks = select_skills(registry, tier, emotion, &intake);
                let plan = render_skills(registry, &picks, &intake);
                let report = validate_reply(&plan.action_cards, &plan.next_steps_lines);
                assert!(
                    report.pass,
                    "tier {:?} emotion {:?} missing {:?}",
                    tier,
                    emotion,
                    report.messages()
                );
            }
        }
    }

    #[test]
    fn card_count_other_than_two_fails() {
        let issues = validate_action_cards(&valid_cards()[..1]);
        assert!(issues.contains(&ContractIssue::WrongCardCount { actual: 1 }));
    }

    #[test]
    fn step_counts_outside_three_to_five_fail() {
        let mut cards = valid_cards();
        cards[0].steps.truncate(2);
        let issues = validate_action_cards(&cards);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ContractIssue::StepCountOutOfRange { card: 0, actual: 2 })));
    }

    #[test]
    fn oversized_steps_fail_with_their_length() {
        let mut cards = valid_cards();
        cards[1].steps[0] = "先收拾好桌面然后坐直身体闭上眼睛深深地呼吸5次".to_string();
        let issues = validate_action_cards(&cards);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ContractIssue::StepOverBudget { card: 1, step: 0, .. })));
    }

    #[test]
    fn steps_without_any_countable_token_fail() {
        let mut cards = valid_cards();
        cards[0].steps[2] = "放松一下".to_string();
        let issues = validate_action_cards(&cards);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ContractIssue::StepMissingToken { card: 0, step: 2 })));
    }

    #[test]
    fn conditional_threshold_steps_pass_without_a_unit() {
        let mut cards = valid_cards();
        cards[0].steps[2] = "如果烦躁超过8分就去休息".to_string();
        let issues = validate_action_cards(&cards);
        assert!(issues.is_empty(), "issues: {:?}", issues);
    }

    #[test]
    fn a_digit_in_the_completion_clause_does_not_satisfy_the_main_clause() {
        let line = "当焦虑情绪出现时，进行呼吸练习，持续观察；完成标准：至少5次。";
        let issues = validate_next_steps_lines(&lines(&[
            line,
            "每天睡前花2分钟记录情绪；完成标准：连续5天。",
        ]));
        assert!(issues.contains(&ContractIssue::LineMissingMetric { line: 0 }));
    }

    #[test]
    fn lines_without_completion_or_trigger_fail() {
        let issues = validate_next_steps_lines(&lines(&[
            "每天散步10分钟",
            "做深呼吸5次；完成标准：本周3次。",
        ]));
        assert!(issues.contains(&ContractIssue::LineMissingCompletion { line: 0 }));
        assert!(issues.contains(&ContractIssue::LineMissingTrigger { line: 1 }));
    }

    #[test]
    fn line_count_outside_two_to_three_fails() {
        let one = validate_next_steps_lines(&lines(&[
            "当感到紧张时，深呼吸5次；完成标准：本周至少3次。",
        ]));
        assert!(one.contains(&ContractIssue::WrongLineCount { actual: 1 }));
    }

    #[test]
    fn issue_messages_read_as_reasons() {
        let report = validate_reply(&valid_cards()[..1], &lines(&[]));
        assert!(!report.pass);
        let messages = report.messages();
        assert!(messages.iter().any(|m| m.contains("action cards")));
        assert!(messages.iter().any(|m| m.contains("next-steps lines")));
    }
}
