//! Structured intake slots gathered during an assessment.

use serde::{Deserialize, Serialize};

/// How long the reported distress has been going on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    UnderWeek,
    OneToTwoWeeks,
    AboutAMonth,
    OverMonth,
}

impl DurationBucket {
    /// Human-readable Chinese label used in prompts and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            DurationBucket::UnderWeek => "最近几天",
            DurationBucket::OneToTwoWeeks => "一两周",
            DurationBucket::AboutAMonth => "一个月左右",
            DurationBucket::OverMonth => "一个月以上",
        }
    }

    /// True when the distress has lasted a month or longer.
    pub fn is_sustained(&self) -> bool {
        matches!(self, DurationBucket::AboutAMonth | DurationBucket::OverMonth)
    }
}

/// Self-harm risk level established by the intake dialogue.
///
/// `Unknown` means the question has not been answered; it is the only
/// value that may be replaced by any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Passive,
    Frequent,
    Plan,
    #[default]
    Unknown,
}

impl RiskLevel {
    /// True for every value except `Unknown`.
    pub fn is_known(&self) -> bool {
        !matches!(self, RiskLevel::Unknown)
    }

    /// Chinese label used in prompts and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::None => "无",
            RiskLevel::Passive => "偶尔闪过",
            RiskLevel::Frequent => "经常出现",
            RiskLevel::Plan => "有具体计划",
            RiskLevel::Unknown => "未知",
        }
    }
}

/// Slot values produced by one pass of the intake parsers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSlots {
    pub duration: Option<DurationBucket>,
    pub impact: Option<u8>,
    pub risk: Option<RiskLevel>,
    pub context: Option<String>,
}

impl ParsedSlots {
    pub fn is_empty(&self) -> bool {
        self.duration.is_none()
            && self.impact.is_none()
            && self.risk.is_none()
            && self.context.is_none()
    }
}

/// Everything the assessment has learned about the user's situation.
///
/// Values only advance: a defined `impact_score` or known `risk_level`
/// can be replaced by another defined value but never cleared, so
/// re-delivering a turn cannot regress established facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeInfo {
    pub duration: Option<DurationBucket>,
    pub impact_score: Option<u8>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    pub main_issue: Option<String>,
    pub context: Option<String>,
}

/// Longest main-issue excerpt retained, in characters.
const MAIN_ISSUE_MAX_CHARS: usize = 60;

impl IntakeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the opening complaint once; later calls are ignored.
    pub fn note_main_issue(&mut self, utterance: &str) {
        if self.main_issue.is_some() {
            return;
        }
        let trimmed = utterance.trim();
        if trimmed.is_empty() {
            return;
        }
        self.main_issue = Some(trimmed.chars().take(MAIN_ISSUE_MAX_CHARS).collect());
    }

    /// Folds freshly parsed slots in. Defined values win over missing
    /// ones; a parse that produced nothing changes nothing.
    pub fn merge(&mut self, parsed: ParsedSlots) {
        if let Some(duration) = parsed.duration {
            self.duration = Some(duration);
        }
        if let Some(impact) = parsed.impact {
            self.impact_score = Some(impact.min(10));
        }
        if let Some(risk) = parsed.risk {
            if risk.is_known() {
                self.risk_level = risk;
            }
        }
        if let Some(context) = parsed.context {
            if self.context.is_none() {
                self.context = Some(context);
            }
        }
    }

    /// True once every quantitative slot has a value.
    pub fn core_slots_filled(&self) -> bool {
        self.impact_score.is_some() && self.duration.is_some() && self.context.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adopts_new_values() {
        let mut info = IntakeInfo::new();
        info.merge(ParsedSlots {
            duration: Some(DurationBucket::OneToTwoWeeks),
            impact: Some(7),
            risk: Some(RiskLevel::None),
            context: Some("工作".to_string()),
        });

        assert_eq!(info.duration, Some(DurationBucket::OneToTwoWeeks));
        assert_eq!(info.impact_score, Some(7));
        assert_eq!(info.risk_level, RiskLevel::None);
        assert_eq!(info.context.as_deref(), Some("工作"));
    }

    #[test]
    fn merge_never_reverts_risk_to_unknown() {
        let mut info = IntakeInfo::new();
        info.merge(ParsedSlots {
            risk: Some(RiskLevel::Passive),
            ..Default::default()
        });
        info.merge(ParsedSlots {
            risk: Some(RiskLevel::Unknown),
            ..Default::default()
        });

        assert_eq!(info.risk_level, RiskLevel::Passive);
    }

    #[test]
    fn merge_never_clears_impact_score() {
        let mut info = IntakeInfo::new();
        info.merge(ParsedSlots {
            impact: Some(8),
            ..Default::default()
        });
        info.merge(ParsedSlots::default());

        assert_eq!(info.impact_score, Some(8));
    }

    #[test]
    fn merge_allows_risk_escalation() {
        let mut info = IntakeInfo::new();
        info.merge(ParsedSlots {
            risk: Some(RiskLevel::None),
            ..Default::default()
        });
        info.merge(ParsedSlots {
            risk: Some(RiskLevel::Plan),
            ..Default::default()
        });

        assert_eq!(info.risk_level, RiskLevel::Plan);
    }

    #[test]
    fn merge_clamps_impact_to_scale() {
        let mut info = IntakeInfo::new();
        info.merge(ParsedSlots {
            impact: Some(12),
            ..Default::default()
        });
        assert_eq!(info.impact_score, Some(10));
    }

    #[test]
    fn merge_keeps_first_context() {
        let mut info = IntakeInfo::new();
        info.merge(ParsedSlots {
            context: Some("被裁员".to_string()),
            ..Default::default()
        });
        info.merge(ParsedSlots {
            context: Some("失眠".to_string()),
            ..Default::default()
        });

        assert_eq!(info.context.as_deref(), Some("被裁员"));
    }

    #[test]
    fn note_main_issue_records_first_utterance_only() {
        let mut info = IntakeInfo::new();
        info.note_main_issue("工作压力好大");
        info.note_main_issue("另一个问题");

        assert_eq!(info.main_issue.as_deref(), Some("工作压力好大"));
    }

    #[test]
    fn note_main_issue_truncates_long_text() {
        let mut info = IntakeInfo::new();
        let long = "烦".repeat(200);
        info.note_main_issue(&long);

        assert_eq!(info.main_issue.as_ref().map(|s| s.chars().count()), Some(60));
    }

    #[test]
    fn merge_is_idempotent_under_redelivery() {
        let parsed = ParsedSlots {
            duration: Some(DurationBucket::AboutAMonth),
            impact: Some(6),
            risk: Some(RiskLevel::None),
            context: Some("考试".to_string()),
        };
        let mut once = IntakeInfo::new();
        once.merge(parsed.clone());
        let mut twice = once.clone();
        twice.merge(parsed);

        assert_eq!(once, twice);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_risk() -> impl Strategy<Value = RiskLevel> {
        prop_oneof![
            Just(RiskLevel::None),
            Just(RiskLevel::Passive),
            Just(RiskLevel::Frequent),
            Just(RiskLevel::Plan),
            Just(RiskLevel::Unknown),
        ]
    }

    fn arb_duration() -> impl Strategy<Value = Option<DurationBucket>> {
        prop_oneof![
            Just(None),
            Just(Some(DurationBucket::UnderWeek)),
            Just(Some(DurationBucket::OneToTwoWeeks)),
            Just(Some(DurationBucket::AboutAMonth)),
            Just(Some(DurationBucket::OverMonth)),
        ]
    }

    fn arb_parsed() -> impl Strategy<Value = ParsedSlots> {
        (
            arb_duration(),
            proptest::option::of(0u8..=10),
            proptest::option::of(arb_risk()),
            proptest::option::of("[\u{4e00}-\u{4eff}]{1,8}"),
        )
            .prop_map(|(duration, impact, risk, context)| ParsedSlots {
                duration,
                impact,
                risk,
                context,
            })
    }

    proptest! {
        /// Once risk or impact is established, no later parse can unset it.
        #[test]
        fn merge_is_monotonic(parses in proptest::collection::vec(arb_parsed(), 1..8)) {
            let mut info = IntakeInfo::new();
            let mut risk_known = false;
            let mut impact_known = false;

            for parsed in parses {
                info.merge(parsed);
                if risk_known {
                    prop_assert!(info.risk_level.is_known());
                }
                if impact_known {
                    prop_assert!(info.impact_score.is_some());
                }
                risk_known = info.risk_level.is_known();
                impact_known = info.impact_score.is_some();
            }
        }
    }
}
