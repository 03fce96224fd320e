//! The fixed question repertoire of the assessment dialogue.
//!
//! Intake questions stay open-ended; scales and lettered options are
//! reserved for the follow-up stage.

/// Combined scene + automatic-thought probe, asked once per assessment.
pub const SOCRATIC_PROBE: &str =
    "听起来你最近承受了不少。愿意具体说说发生了什么吗？当时你脑子里冒出的想法是什么？";

/// Scene re-ask, used when the probe answer described no concrete scene.
pub const SCENE_FOLLOWUP: &str = "刚才说的情况里，最让你难受的那个具体场景是什么？";

/// Thought re-ask, used when the probe answer carried no automatic thought.
pub const THOUGHT_FOLLOWUP: &str = "在那个时刻，你脑子里闪过的想法或担心是什么？";

/// Open trigger-context question for the intake fallback chain.
pub const CONTEXT_PROBE: &str = "是什么事情或场合让你有这样的感受？方便说说吗？";

/// Open duration question for the intake fallback chain.
pub const DURATION_PROBE: &str = "这种状态大概是从什么时候开始的？持续多久了？";

/// Last-resort open probe.
pub const GENERIC_PROBE: &str = "愿意多说一点吗？我在听。";

/// 0-10 impact scale question.
pub const IMPACT_SCALE_QUESTION: &str =
    "如果用0-10分衡量，这件事对你最近生活和工作的影响有多大？0是几乎没有影响，10是影响非常大，可以直接回复数字。";

/// Lettered duration options.
pub const DURATION_OPTIONS_QUESTION: &str =
    "这种状态持续多久了？\nA. 最近几天\nB. 一两周\nC. 一个月左右\nD. 更久了";

/// Lettered self-harm safety question.
pub const RISK_OPTIONS_QUESTION: &str = "谢谢你愿意说这些。为了确认你的安全，想问一句：最近有没有出现过伤害自己的想法？\nA. 没有\nB. 偶尔闪过\nC. 经常出现\nD. 有具体的计划";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_pairs_scene_and_thought() {
        assert!(SOCRATIC_PROBE.contains("发生了什么"));
        assert!(SOCRATIC_PROBE.contains("想法"));
    }

    #[test]
    fn intake_questions_carry_no_scales_or_options() {
        for q in [
            SOCRATIC_PROBE,
            SCENE_FOLLOWUP,
            THOUGHT_FOLLOWUP,
            CONTEXT_PROBE,
            DURATION_PROBE,
            GENERIC_PROBE,
        ] {
            assert!(!q.contains("0-10"), "scale leaked into: {q}");
            assert!(!q.contains("A."), "options leaked into: {q}");
        }
    }

    #[test]
    fn safety_question_establishes_risk_context() {
        use crate::domain::intake::establishes_risk_context;
        assert!(establishes_risk_context(RISK_OPTIONS_QUESTION));
    }

    #[test]
    fn option_questions_offer_four_choices() {
        for q in [DURATION_OPTIONS_QUESTION, RISK_OPTIONS_QUESTION] {
            for letter in ["A.", "B.", "C.", "D."] {
                assert!(q.contains(letter), "missing {letter} in: {q}");
            }
        }
    }
}
