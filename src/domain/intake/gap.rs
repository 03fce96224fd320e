//! Gap detection: parse a turn into slots, then report the next missing one.
//!
//! Gap priority is impact > duration > context > risk. Risk sits last on
//! purpose: a premature safety question during ordinary stress talk costs
//! rapport, so it is only eligible once the dual threshold has been met.

use crate::domain::routing::{lexicon, EmotionReading};

use super::context;
use super::duration;
use super::impact;
use super::info::{IntakeInfo, ParsedSlots, RiskLevel};
use super::risk;

/// A slot that is still missing and can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKey {
    Impact,
    Duration,
    Context,
    Risk,
}

impl GapKey {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            GapKey::Impact => "impact",
            GapKey::Duration => "duration",
            GapKey::Context => "context",
            GapKey::Risk => "risk",
        }
    }
}

/// Which slot questions have already been posed this conversation.
///
/// A slot that was asked is never asked again, whether or not the answer
/// parsed; the assessment settles for what it got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AskedSlots {
    pub impact: bool,
    pub duration: bool,
    pub context: bool,
    pub risk: bool,
}

/// Question context for one parsing pass: which slot question, if any,
/// the incoming text is answering.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseContext {
    pub impact_pending: bool,
    pub duration_pending: bool,
    pub risk_pending: bool,
}

/// Result of one parsing pass, with the matched rule tags for logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotParse {
    pub slots: ParsedSlots,
    pub tags: Vec<&'static str>,
}

/// Runs every sub-parser over the text and collects what stuck.
///
/// The caller concatenates the opening message and the current answer
/// when it wants opening-turn mentions re-considered.
pub fn parse_slots(text: &str, ctx: ParseContext) -> SlotParse {
    let normalized = lexicon::normalize(text);
    let mut parse = SlotParse::default();

    if ctx.duration_pending {
        if let Some(bucket) = duration::parse_duration_option(&normalized) {
            parse.slots.duration = Some(bucket);
            parse.tags.push("duration_lettered_option");
        }
    }
    if parse.slots.duration.is_none() {
        if let Some(m) = duration::parse_duration(&normalized) {
            parse.slots.duration = Some(m.value);
            parse.tags.push(m.tag);
        }
    }

    if let Some(m) = impact::parse_impact(&normalized, ctx.impact_pending) {
        parse.slots.impact = Some(m.value);
        parse.tags.push(m.tag);
    }

    if ctx.risk_pending || risk::establishes_risk_context(&normalized) {
        if let Some(m) = risk::parse_risk(&normalized) {
            parse.slots.risk = Some(m.value);
            parse.tags.push(m.tag);
        }
    }

    if let Some(m) = context::parse_context(text.trim()) {
        parse.slots.context = Some(m.value);
        parse.tags.push(m.tag);
    }

    parse
}

/// The dual threshold for the self-harm question: explicit risk
/// vocabulary plus either a high-intensity negative emotion or despair
/// vocabulary. Ordinary stress phrasing never qualifies on its own.
pub fn warrants_risk_question(utterance: &str, emotion: Option<&EmotionReading>) -> bool {
    let text = lexicon::normalize(utterance);
    if !lexicon::contains_any(&text, lexicon::RISK_WORDS) {
        return false;
    }
    let high_emotion = emotion.is_some_and(|e| e.is_high_intensity_negative());
    high_emotion || lexicon::contains_any(&text, lexicon::DESPAIR_WORDS)
}

/// Reports the highest-priority slot that is still missing and askable.
pub fn next_gap(intake: &IntakeInfo, asked: AskedSlots, risk_warranted: bool) -> Option<GapKey> {
    if intake.impact_score.is_none() && !asked.impact {
        return Some(GapKey::Impact);
    }
    if intake.duration.is_none() && !asked.duration {
        return Some(GapKey::Duration);
    }
    if intake.context.is_none() && !asked.context {
        return Some(GapKey::Context);
    }
    if intake.risk_level == RiskLevel::Unknown && !asked.risk && risk_warranted {
        return Some(GapKey::Risk);
    }
    None
}
