//! Small rule interpreter shared by the intake parsers.
//!
//! Each parser is an ordered list of tagged rules. A rule's exclusion
//! list is checked before its matcher runs, and the first rule to match
//! wins, so parsing precedence is data instead of control flow.

/// One tagged pattern→result rule.
pub struct ParseRule<T> {
    /// Stable tag for logs and rule-level tests.
    pub tag: &'static str,
    /// Substrings that veto this rule even when the matcher would fire.
    pub exclusions: &'static [&'static str],
    /// Attempts to extract a value from the text.
    pub matcher: fn(&str) -> Option<T>,
}

/// A successful rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<T> {
    pub tag: &'static str,
    pub value: T,
}

/// Runs the rules in order and returns the first match.
pub fn evaluate<T>(text: &str, rules: &[ParseRule<T>]) -> Option<RuleMatch<T>> {
    for rule in rules {
        if rule.exclusions.iter().any(|ex| text.contains(ex)) {
            continue;
        }
        if let Some(value) = (rule.matcher)(text) {
            return Some(RuleMatch {
                tag: rule.tag,
                value,
            });
        }
    }
    None
}

/// Returns true if any of the words occurs in the text.
pub fn contains_any_word(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Reads a lettered quick-reply answer ("B", "b.", "Ｂ 一两周").
///
/// Accepts the bare letter or the letter plus a short option label;
/// anything longer is treated as free text, not an option pick.
pub fn option_letter(text: &str) -> Option<char> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let letter = match chars.next()? {
        'A' | 'a' | 'Ａ' | 'ａ' => 'A',
        'B' | 'b' | 'Ｂ' | 'ｂ' => 'B',
        'C' | 'c' | 'Ｃ' | 'ｃ' => 'C',
        'D' | 'd' | 'Ｄ' | 'ｄ' => 'D',
        _ => return None,
    };
    let rest: String = chars
        .filter(|c| !c.is_whitespace() && !is_option_punct(*c))
        .collect();
    if rest.chars().count() <= 8 {
        Some(letter)
    } else {
        None
    }
}

fn is_option_punct(c: char) -> bool {
    matches!(c, '.' | '。' | '、' | '，' | ',' | ')' | '）' | ':' | '：')
}

/// Reads a small quantity (0-99) starting at a character offset.
///
/// Understands ASCII digits and the common Chinese numerals. Returns the
/// value and the number of characters consumed.
pub fn read_quantity(chars: &[char], start: usize) -> Option<(u32, usize)> {
    let mut digits = String::new();
    let mut used = 0;
    while let Some(c) = chars.get(start + used) {
        if c.is_ascii_digit() {
            digits.push(*c);
            used += 1;
            if digits.len() >= 2 {
                break;
            }
        } else {
            break;
        }
    }
    if !digits.is_empty() {
        return digits.parse().ok().map(|n| (n, used));
    }

    match chars.get(start) {
        Some('零') => Some((0, 1)),
        Some('一') => Some((1, 1)),
        Some('两') | Some('二') => Some((2, 1)),
        Some('三') => Some((3, 1)),
        Some('四') => Some((4, 1)),
        Some('五') => Some((5, 1)),
        Some('六') => Some((6, 1)),
        Some('七') => Some((7, 1)),
        Some('八') => Some((8, 1)),
        Some('九') => Some((9, 1)),
        Some('十') => match chars.get(start + 1) {
            Some('一') => Some((11, 2)),
            Some('二') => Some((12, 2)),
            Some('三') => Some((13, 2)),
            Some('四') => Some((14, 2)),
            Some('五') => Some((15, 2)),
            _ => Some((10, 1)),
        },
        _ => None,
    }
}

/// Scans for a quantity immediately followed by one of the unit words.
///
/// Returns the first (quantity, unit) pair found, skipping occurrences
/// where the unit continues into a longer word from the veto list.
pub fn find_quantity_with_unit(
    text: &str,
    units: &[&'static str],
    veto_after: &[&'static str],
) -> Option<(u32, &'static str)> {
    let chars: Vec<char> = text.chars().collect();
    for start in 0..chars.len() {
        // Never start reading in the middle of a longer number.
        if start > 0 && chars[start - 1].is_ascii_digit() {
            continue;
        }
        let Some((value, used)) = read_quantity(&chars, start) else {
            continue;
        };
        let rest: String = chars[start + used..].iter().collect();
        for unit in units {
            if rest.starts_with(unit) {
                let after = &rest[unit.len()..];
                if veto_after.iter().any(|v| after.starts_with(v)) {
                    continue;
                }
                return Some((value, unit));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_: &str) -> Option<u8> {
        Some(1)
    }

    fn never(_: &str) -> Option<u8> {
        None
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = [
            ParseRule {
                tag: "miss",
                exclusions: &[],
                matcher: never,
            },
            ParseRule {
                tag: "hit",
                exclusions: &[],
                matcher: always,
            },
        ];
        let m = evaluate("anything", &rules).unwrap();
        assert_eq!(m.tag, "hit");
    }

    #[test]
    fn exclusion_vetoes_a_rule_before_its_matcher() {
        let rules = [
            ParseRule {
                tag: "vetoed",
                exclusions: &["坏"],
                matcher: always,
            },
            ParseRule {
                tag: "fallback",
                exclusions: &[],
                matcher: always,
            },
        ];
        let m = evaluate("有个坏词", &rules).unwrap();
        assert_eq!(m.tag, "fallback");
    }

    #[test]
    fn no_rule_matching_returns_none() {
        let rules: [ParseRule<u8>; 1] = [ParseRule {
            tag: "miss",
            exclusions: &[],
            matcher: never,
        }];
        assert!(evaluate("text", &rules).is_none());
    }

    #[test]
    fn read_quantity_handles_ascii_digits() {
        let chars: Vec<char> = "15天".chars().collect();
        assert_eq!(read_quantity(&chars, 0), Some((15, 2)));
    }

    #[test]
    fn read_quantity_handles_chinese_numerals() {
        let chars: Vec<char> = "两周".chars().collect();
        assert_eq!(read_quantity(&chars, 0), Some((2, 1)));

        let chars: Vec<char> = "十几天".chars().collect();
        assert_eq!(read_quantity(&chars, 0), Some((10, 1)));
    }

    #[test]
    fn find_quantity_with_unit_skips_vetoed_continuations() {
        // 分 followed by 钟 is a duration, not a score.
        let found = find_quantity_with_unit("疼了10分钟", &["分"], &["钟"]);
        assert_eq!(found, None);

        let found = find_quantity_with_unit("影响有7分", &["分"], &["钟"]);
        assert_eq!(found, Some((7, "分")));
    }

    #[test]
    fn find_quantity_with_unit_finds_first_occurrence() {
        let found = find_quantity_with_unit("每天3次，每次5分钟", &["次"], &[]);
        assert_eq!(found, Some((3, "次")));
    }

    #[test]
    fn find_quantity_with_unit_never_splits_long_numbers() {
        // "100分" must not be read as a trailing "0分".
        assert_eq!(find_quantity_with_unit("考了100分", &["分"], &["钟"]), None);
    }

    #[test]
    fn option_letter_reads_bare_and_labelled_answers() {
        assert_eq!(option_letter("B"), Some('B'));
        assert_eq!(option_letter(" b. "), Some('B'));
        assert_eq!(option_letter("Ｃ：一个月左右"), Some('C'));
    }

    #[test]
    fn option_letter_rejects_free_text() {
        assert_eq!(option_letter("大概一个月"), None);
        assert_eq!(option_letter("because it hurts"), None);
        assert_eq!(option_letter(""), None);
    }
}
