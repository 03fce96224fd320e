//! Consolidation of newly extracted facts against stored ones.
//!
//! The LLM normally classifies each new fact; when that call fails or
//! returns garbage, a lexical overlap fallback decides instead. The
//! fallback never deletes.

use super::fact::MemoryFact;
use crate::domain::foundation::MemoryFactId;

/// What to do with one extracted fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsolidationAction {
    Create,
    Update { target: MemoryFactId },
    Skip,
    Delete { target: MemoryFactId },
}

/// Near-duplicates are skipped outright.
const SKIP_OVERLAP: f64 = 0.8;
/// Above this the new fact refreshes an existing one.
const UPDATE_OVERLAP: f64 = 0.5;

/// Word-overlap fallback: compares the new content against existing
/// facts and picks skip/update/create by the best overlap ratio.
pub fn consolidate_lexically(content: &str, existing: &[MemoryFact]) -> ConsolidationAction {
    let new_tokens = tokenize(content);
    if new_tokens.is_empty() {
        return ConsolidationAction::Skip;
    }

    let mut best: Option<(&MemoryFact, f64)> = None;
    for fact in existing {
        let ratio = overlap_ratio(&new_tokens, &tokenize(&fact.content));
        if best.map_or(true, |(_, r)| ratio > r) {
            best = Some((fact, ratio));
        }
    }

    match best {
        Some((_, ratio)) if ratio >= SKIP_OVERLAP => ConsolidationAction::Skip,
        Some((fact, ratio)) if ratio > UPDATE_OVERLAP => {
            ConsolidationAction::Update { target: fact.id }
        }
        _ => ConsolidationAction::Create,
    }
}

/// Every CJK ideograph is a token; contiguous ASCII alphanumeric runs
/// form one token each.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut ascii_run = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            ascii_run.push(c.to_ascii_lowercase());
            continue;
        }
        if !ascii_run.is_empty() {
            tokens.push(std::mem::take(&mut ascii_run));
        }
        if crate::domain::contract::is_cjk(c) {
            tokens.push(c.to_string());
        }
    }
    if !ascii_run.is_empty() {
        tokens.push(ascii_run);
    }
    tokens.sort();
    tokens.dedup();
    tokens
}

/// Share of the new fact's tokens that also appear in the old one.
fn overlap_ratio(new_tokens: &[String], old_tokens: &[String]) -> f64 {
    if new_tokens.is_empty() {
        return 0.0;
    }
    let shared = new_tokens
        .iter()
        .filter(|t| old_tokens.binary_search(t).is_ok())
        .count();
    shared as f64 / new_tokens.len() as f64
}
