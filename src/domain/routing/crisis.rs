//! Keyword prefilter for the crisis path.
//!
//! First of two detection layers: high-precision method/ideation vocabulary
//! with a short negation window so reported denials ("我没有自杀的想法") do
//! not trip the filter. The semantic classifier runs only when this layer
//! stays quiet; both layers must stay quiet for a turn to count as non-crisis.

use super::lexicon;

/// Method and ideation vocabulary that flags a turn as crisis on its own.
pub const CRISIS_WORDS: &[&str] = &[
    "自杀",
    "想死",
    "不想活了",
    "活不下去",
    "结束自己的生命",
    "结束生命",
    "轻生",
    "割腕",
    "跳楼",
    "上吊",
    "烧炭",
    "吞药",
    "安眠药",
    "遗书",
    "了结自己",
];

/// Negation tokens that suppress a match when found just before the keyword.
const NEGATIONS_BEFORE: &[&str] = &["没有", "没", "从没", "从来没", "不会", "别", "怎么会"];

/// Characters of context inspected before a keyword occurrence.
const NEGATION_WINDOW: usize = 6;

/// A prefilter match, carrying the keyword for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefilterHit {
    pub keyword: &'static str,
}

/// Scans an utterance for crisis vocabulary.
///
/// Every occurrence of every keyword is checked; a negation token inside the
/// window before an occurrence suppresses that occurrence only.
pub fn screen_keywords(utterance: &str) -> Option<PrefilterHit> {
    let text = lexicon::normalize(utterance);
    for keyword in CRISIS_WORDS {
        let mut search_from = 0;
        while let Some(offset) = text[search_from..].find(keyword) {
            let at = search_from + offset;
            if !negated_before(&text, at) {
                return Some(PrefilterHit { keyword });
            }
            search_from = at + keyword.len();
        }
    }
    None
}

fn negated_before(text: &str, byte_idx: usize) -> bool {
    let window: String = text[..byte_idx]
        .chars()
        .rev()
        .take(NEGATION_WINDOW)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    NEGATIONS_BEFORE.iter().any(|n| window.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_ideation_is_flagged() {
        let hit = screen_keywords("我真的不想活了");
        assert_eq!(hit, Some(PrefilterHit { keyword: "不想活了" }));
    }

    #[test]
    fn method_mention_is_flagged() {
        assert!(screen_keywords("我已经写好遗书了").is_some());
        assert!(screen_keywords("刚才站在天台想跳楼").is_some());
    }

    #[test]
    fn negated_mention_is_suppressed() {
        assert!(screen_keywords("我没有自杀的想法").is_none());
        assert!(screen_keywords("放心，我不会轻生的").is_none());
    }

    #[test]
    fn negation_far_in_the_past_does_not_suppress() {
        // The denial window is local; a fresh ideation later in the same
        // sentence still counts.
        let text = "以前从没想过，但现在真的想死";
        assert!(screen_keywords(text).is_some());
    }

    #[test]
    fn ordinary_stress_talk_is_not_flagged() {
        assert!(screen_keywords("工作压力好大，想辞职").is_none());
        assert!(screen_keywords("最近没睡好").is_none());
    }

    #[test]
    fn hyperbole_is_accepted_as_cost_of_recall() {
        // Over-flagging is the chosen failure mode.
        assert!(screen_keywords("累得想死").is_some());
    }
}
