//! Impact score parser (0-10 scale).
//!
//! The bare-number rule runs first: quick-reply buttons send raw digits
//! and anything fancier would misread them.

use super::rules::{self, evaluate, ParseRule, RuleMatch};

/// Characters that may trail a bare numeric answer without changing it.
const BARE_TRAILERS: &[char] = &['分', '。', '！', '.', '!', '吧', '左', '右'];

fn match_bare_number(text: &str) -> Option<u8> {
    let trimmed: String = text
        .trim()
        .trim_end_matches(|c| BARE_TRAILERS.contains(&c))
        .to_string();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        let value: u32 = trimmed.parse().ok()?;
        return (value <= 10).then_some(value as u8);
    }
    let chars: Vec<char> = trimmed.chars().collect();
    let (value, used) = rules::read_quantity(&chars, 0)?;
    (used == chars.len() && value <= 10).then_some(value as u8)
}

fn match_slash_ten(text: &str) -> Option<u8> {
    for pattern in ["/10", "／10"] {
        let Some(idx) = text.find(pattern) else {
            continue;
        };
        let digits: String = text[..idx]
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if digits.is_empty() {
            continue;
        }
        let value: u32 = digits.parse().ok()?;
        if value <= 10 {
            return Some(value as u8);
        }
    }
    None
}

fn match_score_phrase(text: &str) -> Option<u8> {
    let (value, _) = rules::find_quantity_with_unit(text, &["分"], &["钟", "之"])?;
    (value <= 10).then_some(value as u8)
}

fn match_loose_number(text: &str) -> Option<u8> {
    let chars: Vec<char> = text.chars().collect();
    for start in 0..chars.len() {
        if !chars[start].is_ascii_digit() {
            continue;
        }
        if start > 0 && chars[start - 1].is_ascii_digit() {
            continue;
        }
        let digits: String = chars[start..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let after = chars.get(start + digits.len());
        if after.is_some_and(|c| is_unit_char(*c)) {
            continue;
        }
        let value: u32 = digits.parse().ok()?;
        if value <= 10 {
            return Some(value as u8);
        }
    }
    None
}

fn is_unit_char(c: char) -> bool {
    matches!(
        c,
        '天' | '周' | '月' | '年' | '次' | '分' | '秒' | '小' | '点' | '岁' | '个' | '号' | '人'
    )
}

/// Rules applied to any assessment text.
const TEXT_RULES: &[ParseRule<u8>] = &[
    ParseRule {
        tag: "impact_bare_number",
        exclusions: &[],
        matcher: match_bare_number,
    },
    ParseRule {
        tag: "impact_slash_ten",
        exclusions: &[],
        matcher: match_slash_ten,
    },
    ParseRule {
        tag: "impact_score_phrase",
        exclusions: &["十分", "分之"],
        matcher: match_score_phrase,
    },
];

/// Extra rule allowed only while the 0-10 question is pending: any
/// standalone digit in the answer is taken as the score.
const CONTEXT_RULES: &[ParseRule<u8>] = &[ParseRule {
    tag: "impact_loose_number",
    exclusions: &[],
    matcher: match_loose_number,
}];

/// Parses an impact score from free text.
///
/// `scale_question_pending` is true when the 0-10 question was the one
/// most recently asked, which unlocks the lenient digit rule.
pub fn parse_impact(text: &str, scale_question_pending: bool) -> Option<RuleMatch<u8>> {
    if let Some(m) = evaluate(text, TEXT_RULES) {
        return Some(m);
    }
    if scale_question_pending {
        return evaluate(text, CONTEXT_RULES);
    }
    None
}
