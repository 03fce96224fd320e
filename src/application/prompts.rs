//! Prompt builders and their deterministic fallbacks.
//!
//! Every LLM-backed reply path has a hand-written fallback here so a
//! failed call degrades to something safe instead of an error. The
//! crisis fallback is the one reply in the system that must never be
//! wrong; it is kept in sync with the crisis gate by test.

use crate::domain::intake::IntakeInfo;
use crate::domain::memory::MemoryFact;
use crate::domain::skills::RiskTier;
use crate::ports::Exemplar;

/// First assistant message of a fresh conversation.
pub const OPENING_GREETING: &str = "你好呀，我在呢。今天过得怎么样？有什么想聊的都可以跟我说说。";

// ----- Support path -----

/// System prompt for the supportive-listening reply. Exemplars, when
/// retrieved, are appended as reference pairs.
pub fn support_system_prompt(exemplars: &[Exemplar]) -> String {
    let mut prompt = String::from(
        "你是一位温和的心理陪伴助手。用简体中文回复，口吻自然、不说教。\
         规则：先共情用户说的具体内容，再用一个开放式问题收尾；\
         全文两到三句话；不要列清单，不要给出诊断，不要使用英文。",
    );
    if !exemplars.is_empty() {
        prompt.push_str("\n\n参考以下示例的语气和结构（不要照抄）：");
        for exemplar in exemplars {
            prompt.push_str("\n用户：");
            prompt.push_str(&exemplar.situation);
            prompt.push_str("\n回复：");
            prompt.push_str(&exemplar.reply);
        }
    }
    prompt
}

/// Used when the support-path completion fails.
pub const FALLBACK_SUPPORT_REPLY: &str =
    "听起来这件事让你挺有感触的，谢谢你愿意跟我说。愿意再多讲讲当时的情况吗？";

// ----- Crisis path -----

pub const CRISIS_SYSTEM_PROMPT: &str =
    "用户可能处于自我伤害的危机中。用简体中文生成一段危机回应，必须同时做到：\
     1) 表达你听到了、并且很担心对方的安全；\
     2) 给出至少两类安全行动（收起危险物品、不要独处、前往急诊或就医、拨打热线）；\
     3) 给出具体求助资源（心理援助热线 400-161-9995，紧急情况拨打120）；\
     4) 以一个确认安全的问题结尾，例如「你现在安全吗？身边有人吗？」。\
     语气坚定而温和，不评判，不说「想开点」这类话。";

/// Hand-written crisis reply covering every gate requirement. Sent
/// verbatim when generation fails or the generated text fails the gate.
pub const CRISIS_FALLBACK_REPLY: &str = "听到你说这些，我真的很担心你的安全。\
请先把可能伤害自己的危险物品收起来，放到拿不到的地方。\
现在尽量不要一个人待着，找家人或朋友陪着你。\
如果情况紧急，请立即拨打120或前往附近的急诊。\
也可以拨打24小时心理援助热线 400-161-9995。\
你现在安全吗？身边有人吗？";

// ----- Crisis classifier -----

pub fn crisis_classifier_prompt(utterance: &str) -> String {
    format!(
        "判断下面这句话是否表达了自伤或自杀的危机信号。\
         只输出JSON，格式：{{\"crisis\": true或false, \"confidence\": 0到1的小数, \"reason\": \"简短理由\"}}。\
         普通的压力、抱怨、疲惫不算危机；提到伤害自己、不想活、告别、具体方法才算。\n\
         这句话：{}",
        utterance
    )
}

pub fn crisis_verdict_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "crisis": {"type": "boolean"},
            "confidence": {"type": "number"},
            "reason": {"type": "string"}
        },
        "required": ["crisis"]
    })
}

// ----- Conclusion narrative -----

pub const CONCLUSION_SYSTEM_PROMPT: &str =
    "你是一位温和的心理陪伴助手。根据下面的评估信息，用简体中文写一小段总结回应：\
     先用一两句话共情用户的处境，再自然地引出接下来的小练习。\
     不要重复练习的具体步骤，不要列清单，不要使用英文，全文不超过三句话。";

pub fn conclusion_user_prompt(intake: &IntakeInfo, tier: RiskTier, skill_names: &[&str]) -> String {
    let mut prompt = String::from("评估信息：\n");
    if let Some(issue) = &intake.main_issue {
        prompt.push_str("主要困扰：");
        prompt.push_str(issue);
        prompt.push('\n');
    }
    if let Some(impact) = intake.impact_score {
        prompt.push_str(&format!("困扰程度：{}/10\n", impact));
    }
    if let Some(duration) = intake.duration {
        prompt.push_str("持续时间：");
        prompt.push_str(duration.label());
        prompt.push('\n');
    }
    prompt.push_str("风险分层：");
    prompt.push_str(tier.label());
    prompt.push('\n');
    prompt.push_str("推荐的练习：");
    prompt.push_str(&skill_names.join("、"));
    prompt
}

/// Used when the conclusion narrative completion fails.
pub const FALLBACK_CONCLUSION_INTRO: &str =
    "谢谢你说了这么多，这些感受都是真实存在的，也值得被认真对待。我为你准备了两个小练习，试试看。";

/// Final conclusion reply: narrative first, then the plan lines. The
/// lines are appended here rather than generated, so the contract gate
/// always sees the rendered originals.
pub fn compose_conclusion_reply(narrative: &str, lines: &[String]) -> String {
    let mut reply = narrative.trim().to_string();
    reply.push_str("\n\n接下来几天可以这样试试：");
    for (i, line) in lines.iter().enumerate() {
        reply.push_str(&format!("\n{}. {}", i + 1, line));
    }
    reply
}

// ----- Memory extraction and consolidation -----

pub fn memory_extraction_prompt(transcript: &str) -> String {
    format!(
        "从下面的对话中提取值得长期记住的用户事实（困扰、生活背景、应对方式、偏好）。\
         最多5条，每条一句话。只输出JSON，格式：\
         {{\"facts\": [{{\"topic\": \"主题词\", \"content\": \"事实内容\", \"tier\": \"permanent或slow_decay或standard\"}}]}}。\
         诊断、长期偏好用permanent；反复出现的主题用slow_decay；一次性的情境细节用standard。\
         没有值得记的就输出 {{\"facts\": []}}。\n\n对话：\n{}",
        transcript
    )
}

pub fn memory_extraction_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "facts": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "topic": {"type": "string"},
                        "content": {"type": "string"},
                        "tier": {"type": "string", "enum": ["permanent", "slow_decay", "standard"]}
                    },
                    "required": ["topic", "content"]
                }
            }
        },
        "required": ["facts"]
    })
}

pub fn consolidation_prompt(topic: &str, content: &str, existing: &[MemoryFact]) -> String {
    let mut prompt = format!(
        "已有的「{}」主题记忆：\n",
        topic
    );
    for fact in existing {
        prompt.push_str(&format!("- id={} {}\n", fact.id, fact.content));
    }
    prompt.push_str(&format!(
        "\n新事实：{}\n\
         判断应该怎么处理这条新事实。只输出JSON，格式：\
         {{\"action\": \"create或update或skip或delete\", \"target\": \"涉及已有记忆时填它的id\"}}。\
         内容重复用skip；新事实是已有记忆的更新用update；全新信息用create；\
         新事实表明某条已有记忆已经过时错误才用delete。",
        content
    ));
    prompt
}

pub fn consolidation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "action": {"type": "string", "enum": ["create", "update", "skip", "delete"]},
            "target": {"type": "string"}
        },
        "required": ["action"]
    })
}
