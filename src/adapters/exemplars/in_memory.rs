//! In-memory exemplar index.
//!
//! Ranks curated situation-reply pairs by lexical overlap with the
//! utterance. Token granularity matches the memory consolidation
//! fallback: single CJK characters plus lowercased ASCII words.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::contract::is_cjk;
use crate::ports::{Exemplar, ExemplarIndex};

/// In-memory exemplar index over a fixed set of curated pairs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExemplarIndex {
    exemplars: Arc<Vec<Exemplar>>,
}

impl InMemoryExemplarIndex {
    pub fn new(exemplars: Vec<Exemplar>) -> Self {
        Self {
            exemplars: Arc::new(exemplars),
        }
    }

    /// Index seeded with the built-in reference pairs.
    pub fn seeded() -> Self {
        Self::new(seed_exemplars())
    }

    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }
}

#[async_trait]
impl ExemplarIndex for InMemoryExemplarIndex {
    async fn lookup(&self, utterance: &str, limit: usize) -> Vec<Exemplar> {
        let query = tokenize(utterance);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &Exemplar)> = self
            .exemplars
            .iter()
            .map(|e| (overlap(&query, &tokenize(&e.situation)), e))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps curation order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut ascii_word = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            ascii_word.push(ch.to_ascii_lowercase());
            continue;
        }
        if !ascii_word.is_empty() {
            tokens.push(std::mem::take(&mut ascii_word));
        }
        if is_cjk(ch) {
            tokens.push(ch.to_string());
        }
    }
    if !ascii_word.is_empty() {
        tokens.push(ascii_word);
    }
    tokens.sort();
    tokens.dedup();
    tokens
}

fn overlap(query: &[String], situation: &[String]) -> usize {
    query
        .iter()
        .filter(|t| situation.binary_search(t).is_ok())
        .count()
}

fn seed_exemplars() -> Vec<Exemplar> {
    let pairs = [
        (
            "工作压力大，经常加班，感觉撑不住了",
            "听起来这段时间工作把你压得喘不过气，能撑到现在已经很不容易了。加班最多的是哪几天？那天下班后你一般是什么状态？",
        ),
        (
            "晚上睡不着，翻来覆去想事情",
            "夜里睡不着的时候，脑子停不下来是很消耗人的。通常是躺下多久还睡不着？想得最多的是哪件事？",
        ),
        (
            "和家里人吵架了，心里很难受",
            "和亲近的人起冲突，难受往往比吵架本身更久。这次争执是因为什么事情？吵完之后你们说过话吗？",
        ),
        (
            "最近总是突然心慌、喘不上气",
            "突然心慌的感觉很吓人，你愿意说出来很好。这种感觉一般在什么场合出现？上一次发生时你在做什么？",
        ),
        (
            "提不起精神，对什么都没兴趣",
            "原本喜欢的事情也提不起劲，这种状态持续下来很磨人。这样的感觉大概从什么时候开始的？",
        ),
        (
            "考试快到了，越复习越焦虑",
            "越临近考试越静不下心，是很多人都会碰到的循环。焦虑最明显的时候，脑子里在担心什么？",
        ),
    ];

    pairs
        .iter()
        .map(|(situation, reply)| Exemplar {
            situation: situation.to_string(),
            reply: reply.to_string(),
        })
        .collect()
}
