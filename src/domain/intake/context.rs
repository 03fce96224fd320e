//! Context/trigger slot parser.
//!
//! Captures the clause that explains what set the distress off, either
//! via a causal connective or via a known stressor keyword.

use crate::domain::routing::lexicon;

use super::rules::{evaluate, ParseRule, RuleMatch};

/// Longest context clause retained, in characters.
const CLAUSE_MAX_CHARS: usize = 40;

/// Clause boundaries for context extraction.
fn is_clause_boundary(c: char) -> bool {
    matches!(c, '，' | '。' | '；' | '！' | '？' | ',' | '.' | ';' | '!' | '?' | '\n')
}

/// Cuts the clause containing the given character index out of the text.
fn clause_around(text: &str, char_idx: usize) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let start = chars[..char_idx]
        .iter()
        .rposition(|c| is_clause_boundary(*c))
        .map(|p| p + 1)
        .unwrap_or(0);
    let end = chars[char_idx..]
        .iter()
        .position(|c| is_clause_boundary(*c))
        .map(|p| char_idx + p)
        .unwrap_or(chars.len());
    let clause: String = chars[start..end].iter().collect::<String>().trim().to_string();
    if clause.chars().count() < 2 {
        return None;
    }
    Some(clause.chars().take(CLAUSE_MAX_CHARS).collect())
}

fn char_index_of(text: &str, word: &str) -> Option<usize> {
    let byte_idx = text.find(word)?;
    Some(text[..byte_idx].chars().count())
}

fn match_causal_clause(text: &str) -> Option<String> {
    let word = lexicon::first_match(text, lexicon::CAUSAL_CONNECTIVES)?;
    clause_around(text, char_index_of(text, word)?)
}

fn match_scene_keyword(text: &str) -> Option<String> {
    let word = lexicon::first_match(text, lexicon::STRESSOR_WORDS)?;
    clause_around(text, char_index_of(text, word)?)
}

const TEXT_RULES: &[ParseRule<String>] = &[
    ParseRule {
        tag: "context_causal_clause",
        exclusions: &[],
        matcher: match_causal_clause,
    },
    ParseRule {
        tag: "context_scene_keyword",
        exclusions: &[],
        matcher: match_scene_keyword,
    },
];

/// Extracts a trigger/context clause from free text.
pub fn parse_context(text: &str) -> Option<RuleMatch<String>> {
    evaluate(text, TEXT_RULES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn causal_connective_captures_its_clause() {
        let m = parse_context("睡不好，因为下个月要裁员了，很慌").unwrap();
        assert_eq!(m.tag, "context_causal_clause");
        assert_eq!(m.value, "因为下个月要裁员了");
    }

    #[test]
    fn passive_marker_captures_its_clause() {
        let m = parse_context("被老板当众骂了一顿").unwrap();
        assert_eq!(m.tag, "context_causal_clause");
        assert_eq!(m.value, "被老板当众骂了一顿");
    }

    #[test]
    fn scene_keyword_captures_its_clause() {
        let m = parse_context("工作压力好大").unwrap();
        assert_eq!(m.tag, "context_scene_keyword");
        assert_eq!(m.value, "工作压力好大");
    }

    #[test]
    fn clause_is_cut_at_punctuation() {
        let m = parse_context("心情很差。考试没考好，不想说话").unwrap();
        assert_eq!(m.value, "考试没考好");
    }

    #[test]
    fn long_clause_is_truncated() {
        let long = format!("因为{}", "烦".repeat(80));
        let m = parse_context(&long).unwrap();
        assert_eq!(m.value.chars().count(), 40);
    }

    #[test]
    fn text_without_context_yields_nothing() {
        assert_eq!(parse_context("很难受"), None);
    }
}
