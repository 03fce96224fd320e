//! Best-effort auto-repair of recommendation steps.
//!
//! The sanitizer mutates; the validator never does. Repairs run in a
//! fixed order: phrase-table rewrite, metric suffix for abstract verbs,
//! marker cleanup, then budget enforcement that keeps the metric token
//! alive through truncation.

use super::fix_table::FixTable;
use super::tokens::{cjk_len, step_has_token, truncate_cjk, COUNT_UNITS, STEP_CJK_BUDGET};
use crate::domain::skills::ActionCard;

/// Verbs describing an open-ended duration. A step built on one of
/// these without a metric gets a time suffix.
const DURATION_VERBS: &[&str] = &["保持", "持续进行", "持续", "直到", "坚持", "继续"];

/// Verbs describing open-ended repetition; these get a count suffix.
const REPEAT_VERBS: &[&str] = &["反复", "重复", "多做"];

const FILLER_WORDS: &[&str] = &[
    "试着", "尽量", "慢慢地", "慢慢", "轻轻", "稍微", "适当", "认真", "用心", "一下",
];

/// Repairs a single step. Returns the input unchanged when no rule
/// applies.
pub fn sanitize_step(step: &str, table: &FixTable) -> String {
    let mut step = step.trim().to_string();

    if !step_has_token(&step) {
        if let Some(rewritten) = table.rewrite(&step) {
            step = rewritten;
        }
    }
    if !step_has_token(&step) {
        step = append_metric_suffix(step);
    }
    step = collapse_markers(&step);

    if cjk_len(&step) > STEP_CJK_BUDGET {
        step = strip_fillers(step);
    }
    if cjk_len(&step) > STEP_CJK_BUDGET {
        step = truncate_keeping_token(step);
    }
    step
}

/// Sanitizes every step in place and reports each rewrite.
pub fn sanitize_cards(cards: &mut [ActionCard], table: &FixTable) -> Vec<String> {
    let mut fixed = Vec::new();
    for card in cards.iter_mut() {
        for step in card.steps.iter_mut() {
            let sanitized = sanitize_step(step, table);
            if sanitized != *step {
                fixed.push(format!("{} -> {}", step, sanitized));
                *step = sanitized;
            }
        }
    }
    fixed
}

fn append_metric_suffix(step: String) -> String {
    let wants_duration = DURATION_VERBS.iter().any(|v| step.contains(v));
    let wants_count = REPEAT_VERBS.iter().any(|v| step.contains(v));
    if !wants_duration && !wants_count {
        return step;
    }

    let trimmed = step.trim_end_matches(['。', '！', '!', '.', '，', ',']);
    let remaining = STEP_CJK_BUDGET.saturating_sub(cjk_len(trimmed));
    let suffix = if wants_count {
        "×1次"
    } else if remaining >= 2 {
        "1分钟"
    } else {
        "1次"
    };
    format!("{}{}", trimmed, suffix)
}

/// Collapses doubled metric markers and moves a misplaced `×N单位`
/// marker to the end of the step.
fn collapse_markers(step: &str) -> String {
    let mut out = step.to_string();
    for unit in COUNT_UNITS {
        let doubled = format!("×1{}×1{}", unit, unit);
        let single = format!("×1{}", unit);
        while out.contains(&doubled) {
            out = out.replace(&doubled, &single);
        }
        let plain_doubled = format!("1{}1{}", unit, unit);
        let plain = format!("1{}", unit);
        while out.contains(&plain_doubled) {
            out = out.replace(&plain_doubled, &plain);
        }
    }
    while out.contains("1分钟1分钟") {
        out = out.replace("1分钟1分钟", "1分钟");
    }

    if let Some((marker, rest)) = extract_mid_marker(&out) {
        out = format!("{}{}", rest, marker);
    }
    out
}

/// Finds a `×N单位` marker that is not at the end of the step and
/// returns it together with the step text without it.
fn extract_mid_marker(step: &str) -> Option<(String, String)> {
    let chars: Vec<char> = step.chars().collect();
    let cross = chars.iter().position(|c| *c == '×')?;
    let mut end = cross + 1;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end == cross + 1 || end >= chars.len() {
        return None;
    }
    let unit: String = chars[end..].iter().take(1).collect();
    if !COUNT_UNITS.contains(&unit.as_str()) {
        return None;
    }
    let marker_end = end + 1;
    if marker_end == chars.len() {
        return None;
    }
    let marker: String = chars[cross..marker_end].iter().collect();
    let rest: String = chars[..cross]
        .iter()
        .chain(chars[marker_end..].iter())
        .collect();
    Some((marker, rest))
}

fn strip_fillers(step: String) -> String {
    let mut out = step;
    for filler in FILLER_WORDS {
        if cjk_len(&out) <= STEP_CJK_BUDGET {
            break;
        }
        out = out.replace(filler, "");
    }
    out
}

fn truncate_keeping_token(step: String) -> String {
    let had_token = step_has_token(&step);
    let mut out = truncate_cjk(&step, STEP_CJK_BUDGET);
    out = out
        .trim_end_matches(|c: char| c.is_ascii_digit() || c == '×' || c == '-')
        .to_string();
    if had_token && !step_has_token(&out) {
        out = truncate_cjk(&out, STEP_CJK_BUDGET - 1);
        out = out
            .trim_end_matches(|c: char| c.is_ascii_digit() || c == '×' || c == '-')
            .to_string();
        out.push_str("1次");
    }
    out
}
