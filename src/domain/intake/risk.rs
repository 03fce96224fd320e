//! Risk level parser.
//!
//! Only ever invoked in a risk-question context: either the safety
//! question was the one most recently asked, or the text itself talks
//! about self-harm. Outside that context a bare "没有" says nothing
//! about risk and must stay unparsed.

use crate::domain::routing::lexicon;

use super::info::RiskLevel;
use super::rules::{self, evaluate, ParseRule, RuleMatch};

/// Phrases that establish a risk-question context by themselves.
pub const RISK_CONTEXT_WORDS: &[&str] = &[
    "伤害自己的想法",
    "伤害自己",
    "自伤",
    "自残",
    "自杀",
    "为了确认你的安全",
    "轻生",
];

/// Everyday "没…" phrases that look like a denial but answer nothing
/// about risk. Checked before any negation match is accepted.
const FALSE_NEGATION_WORDS: &[&str] = &[
    "没睡",
    "没有睡",
    "没动力",
    "没有动力",
    "没精神",
    "没有精神",
    "没胃口",
    "没有胃口",
    "没力气",
    "没有力气",
    "没心情",
    "没有心情",
    "没兴趣",
    "没有兴趣",
    "没时间",
    "没有时间",
    "没钱",
    "没有钱",
];

/// Denials that carry their own ideation object ("没有想过").
const NEGATED_IDEATION_WORDS: &[&str] = &[
    "没有想过",
    "没想过",
    "从没想过",
    "从来没有想过",
    "从来没想过",
    "不存在",
    "没有这种想法",
    "没有那种想法",
];

const PLAN_WORDS: &[&str] = &[
    "具体的计划",
    "具体计划",
    "计划好",
    "准备好了",
    "写了遗书",
    "写好遗书",
    "安排后事",
    "定好了日子",
];

const FREQUENT_WORDS: &[&str] = &["经常", "总是", "一直", "反复", "每天都", "频繁", "止不住"];

const PASSIVE_WORDS: &[&str] = &["偶尔", "有时", "闪过", "冒出来", "闪念", "想过", "有过"];

fn match_negated_ideation(text: &str) -> Option<RiskLevel> {
    rules::contains_any_word(text, NEGATED_IDEATION_WORDS).then_some(RiskLevel::None)
}

fn match_bare_negation(text: &str) -> Option<RiskLevel> {
    let stripped: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let stripped = stripped
        .trim_end_matches(|c: char| {
            lexicon::TONE_PARTICLES.contains(&c) || matches!(c, '。' | '！' | '.' | '!' | '，' | ',')
        })
        .to_string();
    if stripped.is_empty() {
        return None;
    }
    let lead_ok = |prefix: &str| prefix.is_empty() || matches!(prefix, "完全" | "真的" | "目前" | "暂时" | "都");
    for token in lexicon::NEGATION_TOKENS {
        if let Some(prefix) = stripped.strip_suffix(token) {
            if lead_ok(prefix) {
                return Some(RiskLevel::None);
            }
        }
    }
    None
}

fn match_plan(text: &str) -> Option<RiskLevel> {
    rules::contains_any_word(text, PLAN_WORDS).then_some(RiskLevel::Plan)
}

fn match_frequent(text: &str) -> Option<RiskLevel> {
    rules::contains_any_word(text, FREQUENT_WORDS).then_some(RiskLevel::Frequent)
}

fn match_passive(text: &str) -> Option<RiskLevel> {
    rules::contains_any_word(text, PASSIVE_WORDS).then_some(RiskLevel::Passive)
}

/// Ordered rules for a free-text risk answer. Negation rules run first
/// so "从来没有想过" never reaches the "想过" passive rule.
const TEXT_RULES: &[ParseRule<RiskLevel>] = &[
    ParseRule {
        tag: "risk_negated_ideation",
        exclusions: &[],
        matcher: match_negated_ideation,
    },
    ParseRule {
        tag: "risk_bare_negation",
        exclusions: FALSE_NEGATION_WORDS,
        matcher: match_bare_negation,
    },
    ParseRule {
        tag: "risk_plan",
        exclusions: &[],
        matcher: match_plan,
    },
    ParseRule {
        tag: "risk_frequent",
        exclusions: &[],
        matcher: match_frequent,
    },
    ParseRule {
        tag: "risk_passive",
        exclusions: &[],
        matcher: match_passive,
    },
];

/// True when the text itself creates a risk-question context.
pub fn establishes_risk_context(text: &str) -> bool {
    rules::contains_any_word(text, RISK_CONTEXT_WORDS)
}

/// Parses a risk level from an answer given in risk-question context.
pub fn parse_risk(text: &str) -> Option<RuleMatch<RiskLevel>> {
    if let Some(letter) = rules::option_letter(text) {
        let value = match letter {
            'A' => RiskLevel::None,
            'B' => RiskLevel::Passive,
            'C' => RiskLevel::Frequent,
            'D' => RiskLevel::Plan,
            _ => return None,
        };
        return Some(RuleMatch {
            tag: "risk_lettered_option",
            value,
        });
    }
    evaluate(text, TEXT_RULES)
}
