//! Token-level checks shared by the sanitizer and the validator.
//!
//! The reply contract counts only CJK ideographs against the step
//! budget, so digits, punctuation and latin text are free. A step is
//! "countable" when it carries a quantity with a recognized unit, or a
//! conditional trigger with a numeric threshold.

/// Maximum CJK ideographs allowed in one recommendation step.
pub const STEP_CJK_BUDGET: usize = 16;

pub const COUNT_UNITS: &[&str] = &["次", "遍", "回", "组", "轮"];
pub const TIME_UNITS: &[&str] = &["分钟", "小时", "秒", "天"];

/// Markers that open a trigger clause in a next-steps line.
pub const TRIGGER_MARKERS: &[&str] = &[
    "当", "每当", "每天", "每晚", "每次", "如果", "一旦", "睡前", "醒来后", "感到", "超过",
];

/// Markers that may carry a step's token as a conditional threshold.
const CONDITIONAL_MARKERS: &[&str] = &["当", "如果", "一旦", "超过", "每当"];

const CJK_NUMERALS: &[char] = &[
    '零', '一', '二', '两', '三', '四', '五', '六', '七', '八', '九', '十', '百', '半',
];

pub fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
}

/// Counts only ideographs; digits and punctuation are free.
pub fn cjk_len(text: &str) -> usize {
    text.chars().filter(|c| is_cjk(*c)).count()
}

fn is_numeral(c: char) -> bool {
    c.is_ascii_digit() || CJK_NUMERALS.contains(&c)
}

/// True when the text contains a quantity immediately followed by a
/// count or time unit, e.g. `3次`, `10分钟`, `两轮`.
pub fn has_metric_token(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !is_numeral(chars[i]) {
            i += 1;
            continue;
        }
        let mut end = i + 1;
        while end < chars.len() && is_numeral(chars[end]) {
            end += 1;
        }
        let rest: String = chars[end..].iter().collect();
        if TIME_UNITS.iter().chain(COUNT_UNITS).any(|u| rest.starts_with(u)) {
            return true;
        }
        i = end;
    }
    false
}

/// True when the text opens a condition and names a numeric threshold,
/// e.g. `如果超过10分钟就停下`.
pub fn has_conditional_threshold(text: &str) -> bool {
    CONDITIONAL_MARKERS.iter().any(|m| text.contains(m))
        && text.chars().any(is_numeral)
}

/// Step-level token rule: a metric, or a conditional threshold.
pub fn step_has_token(step: &str) -> bool {
    has_metric_token(step) || has_conditional_threshold(step)
}

pub fn has_trigger_marker(text: &str) -> bool {
    TRIGGER_MARKERS.iter().any(|m| text.contains(m))
}

/// Splits a next-steps line into its main clause and completion
/// criterion. Returns `None` when the line has no completion clause.
pub fn split_completion(line: &str) -> Option<(&str, &str)> {
    let pos = line.find("完成标准")?;
    let main = line[..pos].trim_end_matches(['；', ';', '，', ',', ' ']);
    let completion = line[pos + "完成标准".len()..]
        .trim_start_matches(['：', ':', ' '])
        .trim_end_matches(['。', '.', ' ']);
    if completion.is_empty() {
        return None;
    }
    Some((main, completion))
}

/// Cuts the text at the point where the CJK budget is reached.
pub fn truncate_cjk(text: &str, max_cjk: usize) -> String {
    let mut out = String::new();
    let mut count = 0;
    for c in text.chars() {
        if is_cjk(c) {
            if count == max_cjk {
                break;
            }
            count += 1;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cjk_len_ignores_digits_and_punctuation() {
        assert_eq!(cjk_len("用鼻子吸气4秒"), 6);
        assert_eq!(cjk_len("做4-7-8呼吸3轮"), 4);
        assert_eq!(cjk_len("abc 123 ×"), 0);
    }

    #[test]
    fn metric_tokens_need_a_unit_right_after_the_quantity() {
        assert!(has_metric_token("深呼吸5次"));
        assert!(has_metric_token("散步10分钟"));
        assert!(has_metric_token("重复两轮"));
        assert!(has_metric_token("停留半小时"));
        assert!(!has_metric_token("进行呼吸练习"));
        assert!(!has_metric_token("给自己打8分"));
        assert!(!has_metric_token("5个苹果"));
    }

    #[test]
    fn conditional_thresholds_count_as_step_tokens() {
        assert!(has_conditional_threshold("如果心跳超过100就坐下"));
        assert!(step_has_token("一旦焦虑到7分就暂停"));
        assert!(!has_conditional_threshold("如果感到难受就停下"));
        assert!(!step_has_token("慢慢放松身体"));
    }

    #[test]
    fn completion_split_keeps_the_metric_out_of_the_main_clause() {
        let line = "当焦虑情绪出现时，进行呼吸练习，持续观察；完成标准：至少5次。";
        let (main, completion) = split_completion(line).unwrap();
        assert!(!has_metric_token(main));
        assert_eq!(completion, "至少5次");
    }

    #[test]
    fn completion_split_handles_ascii_separators() {
        let line = "每天散步10分钟;完成标准:连续3天";
        let (main, completion) = split_completion(line).unwrap();
        assert_eq!(main, "每天散步10分钟");
        assert_eq!(completion, "连续3天");
    }

    #[test]
    fn lines_without_a_completion_clause_do_not_split() {
        assert!(split_completion("每天散步10分钟").is_none());
        assert!(split_completion("每天散步10分钟；完成标准：").is_none());
    }

    #[test]
    fn truncation_counts_only_cjk() {
        assert_eq!(truncate_cjk("深呼吸5次", 3), "深呼吸5");
        assert_eq!(truncate_cjk("abc深呼吸", 2), "abc深呼");
        assert_eq!(truncate_cjk("深呼吸", 10), "深呼吸");
    }
}
