//! Duration slot parser.
//!
//! Buckets free-text duration mentions into the four answer ranges the
//! follow-up question offers. Rules are ordered longest-duration first so
//! "一个月" never falls through to the day rules via its substring "月".

use super::info::DurationBucket;
use super::rules::{self, evaluate, ParseRule, RuleMatch};

const OVER_MONTH_WORDS: &[&str] = &[
    "几个月",
    "好几个月",
    "一个多月",
    "大半年",
    "半年",
    "一年",
    "很久",
    "好久",
    "长期",
    "一直都",
    "从小",
];

const ABOUT_MONTH_WORDS: &[&str] = &["一个月", "个把月", "三周", "四周", "三个星期"];

const WEEK_WORDS: &[&str] = &[
    "一两周",
    "一周",
    "两周",
    "半个月",
    "十几天",
    "一个星期",
    "两个星期",
    "一个礼拜",
    "两个礼拜",
    "上周开始",
];

const DAY_WORDS: &[&str] = &[
    "这几天",
    "最近几天",
    "两三天",
    "这两天",
    "几天",
    "今天",
    "昨天",
    "前天",
];

fn match_over_month(text: &str) -> Option<DurationBucket> {
    if rules::contains_any_word(text, OVER_MONTH_WORDS) {
        return Some(DurationBucket::OverMonth);
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["个月", "月"], &["份"]) {
        if n >= 2 {
            return Some(DurationBucket::OverMonth);
        }
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["天"], &[]) {
        if n > 45 {
            return Some(DurationBucket::OverMonth);
        }
    }
    None
}

fn match_about_month(text: &str) -> Option<DurationBucket> {
    if rules::contains_any_word(text, ABOUT_MONTH_WORDS) {
        return Some(DurationBucket::AboutAMonth);
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["个月", "月"], &["份"]) {
        if n == 1 {
            return Some(DurationBucket::AboutAMonth);
        }
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["周", "星期", "礼拜"], &[]) {
        if (3..=5).contains(&n) {
            return Some(DurationBucket::AboutAMonth);
        }
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["天"], &[]) {
        if (15..=45).contains(&n) {
            return Some(DurationBucket::AboutAMonth);
        }
    }
    None
}

fn match_weeks(text: &str) -> Option<DurationBucket> {
    if rules::contains_any_word(text, WEEK_WORDS) {
        return Some(DurationBucket::OneToTwoWeeks);
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["周", "星期", "礼拜"], &[]) {
        if (1..=2).contains(&n) {
            return Some(DurationBucket::OneToTwoWeeks);
        }
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["天"], &[]) {
        if (7..=14).contains(&n) {
            return Some(DurationBucket::OneToTwoWeeks);
        }
    }
    None
}

fn match_days(text: &str) -> Option<DurationBucket> {
    if rules::contains_any_word(text, DAY_WORDS) {
        return Some(DurationBucket::UnderWeek);
    }
    if let Some((n, _)) = rules::find_quantity_with_unit(text, &["天"], &[]) {
        if n < 7 {
            return Some(DurationBucket::UnderWeek);
        }
    }
    None
}

/// Text rules, longest duration first.
const TEXT_RULES: &[ParseRule<DurationBucket>] = &[
    ParseRule {
        tag: "duration_over_month",
        exclusions: &[],
        matcher: match_over_month,
    },
    ParseRule {
        tag: "duration_about_month",
        exclusions: &[],
        matcher: match_about_month,
    },
    ParseRule {
        tag: "duration_weeks",
        exclusions: &[],
        matcher: match_weeks,
    },
    ParseRule {
        tag: "duration_days",
        exclusions: &["一天到晚", "三天两头"],
        matcher: match_days,
    },
];

/// Parses a duration mention out of free text.
pub fn parse_duration(text: &str) -> Option<RuleMatch<DurationBucket>> {
    evaluate(text, TEXT_RULES)
}

/// Interprets a lettered answer to the duration follow-up question.
///
/// Only meaningful when that question was the one most recently asked.
pub fn parse_duration_option(text: &str) -> Option<DurationBucket> {
    match rules::option_letter(text)? {
        'A' => Some(DurationBucket::UnderWeek),
        'B' => Some(DurationBucket::OneToTwoWeeks),
        'C' => Some(DurationBucket::AboutAMonth),
        'D' => Some(DurationBucket::OverMonth),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_expressions_bucket_under_week() {
        assert_eq!(
            parse_duration("这几天一直睡不好").map(|m| m.value),
            Some(DurationBucket::UnderWeek)
        );
        assert_eq!(
            parse_duration("大概3天了").map(|m| m.value),
            Some(DurationBucket::UnderWeek)
        );
    }

    #[test]
    fn week_expressions_bucket_one_to_two_weeks() {
        assert_eq!(
            parse_duration("差不多两周了").map(|m| m.value),
            Some(DurationBucket::OneToTwoWeeks)
        );
        assert_eq!(
            parse_duration("有十几天了吧").map(|m| m.value),
            Some(DurationBucket::OneToTwoWeeks)
        );
        assert_eq!(
            parse_duration("一个星期左右").map(|m| m.value),
            Some(DurationBucket::OneToTwoWeeks)
        );
    }

    #[test]
    fn month_expressions_bucket_about_a_month() {
        assert_eq!(
            parse_duration("快一个月了").map(|m| m.value),
            Some(DurationBucket::AboutAMonth)
        );
        assert_eq!(
            parse_duration("持续了30天").map(|m| m.value),
            Some(DurationBucket::AboutAMonth)
        );
    }

    #[test]
    fn long_expressions_bucket_over_month() {
        assert_eq!(
            parse_duration("好几个月了").map(|m| m.value),
            Some(DurationBucket::OverMonth)
        );
        assert_eq!(
            parse_duration("从去年开始，半年多了").map(|m| m.value),
            Some(DurationBucket::OverMonth)
        );
        assert_eq!(
            parse_duration("两个月前开始的").map(|m| m.value),
            Some(DurationBucket::OverMonth)
        );
    }

    #[test]
    fn longest_duration_rule_wins_over_substrings() {
        // Contains both "一个月" and "天"; the month reading must win.
        let m = parse_duration("一个月了，每天都难受").unwrap();
        assert_eq!(m.value, DurationBucket::AboutAMonth);
        assert_eq!(m.tag, "duration_about_month");
    }

    #[test]
    fn idiomatic_day_phrases_are_excluded() {
        assert_eq!(parse_duration("一天到晚都很烦"), None);
        assert_eq!(parse_duration("三天两头失眠"), None);
    }

    #[test]
    fn no_duration_mention_returns_none() {
        assert_eq!(parse_duration("工作压力好大"), None);
    }

    #[test]
    fn lettered_options_map_to_buckets() {
        assert_eq!(parse_duration_option("A"), Some(DurationBucket::UnderWeek));
        assert_eq!(parse_duration_option("b"), Some(DurationBucket::OneToTwoWeeks));
        assert_eq!(
            parse_duration_option("C. 一个月左右"),
            Some(DurationBucket::AboutAMonth)
        );
        assert_eq!(parse_duration_option("D"), Some(DurationBucket::OverMonth));
    }

    #[test]
    fn non_option_text_is_not_a_lettered_answer() {
        assert_eq!(parse_duration_option("大概一个月"), None);
    }
}
