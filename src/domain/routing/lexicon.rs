//! Shared Chinese keyword families used by the router and the intake parsers.
//!
//! Matching is plain substring matching on normalized text. Chinese needs no
//! word-boundary handling, so keyword sets stay small and auditable.

/// Distress vocabulary: the user describes a negative emotional state.
pub const DISTRESS_WORDS: &[&str] = &[
    "压力",
    "焦虑",
    "抑郁",
    "难受",
    "崩溃",
    "烦躁",
    "心烦",
    "低落",
    "郁闷",
    "痛苦",
    "难过",
    "委屈",
    "害怕",
    "紧张",
    "恐慌",
    "心慌",
    "不开心",
    "想哭",
    "心累",
    "扛不住",
    "撑不住",
    "绝望",
    "emo",
];

/// Functional-impairment vocabulary: sleep, appetite, focus, work capacity.
pub const IMPAIRMENT_WORDS: &[&str] = &[
    "睡不着",
    "失眠",
    "没睡",
    "睡不好",
    "吃不下",
    "没胃口",
    "没食欲",
    "无法集中",
    "集中不了",
    "注意力不集中",
    "不想上班",
    "不想上学",
    "上不了班",
    "请假",
    "没精神",
    "没力气",
    "提不起劲",
    "不想动",
    "起不来",
];

/// Help-seeking vocabulary: the user explicitly asks for guidance.
pub const HELP_WORDS: &[&str] = &[
    "怎么办",
    "帮帮我",
    "帮我",
    "求助",
    "该怎么",
    "怎么调节",
    "怎么缓解",
    "如何缓解",
    "有什么办法",
    "想咨询",
    "需要建议",
];

/// Workplace/relationship stressor vocabulary. Weak signal on its own.
pub const STRESSOR_WORDS: &[&str] = &[
    "工作",
    "加班",
    "上班",
    "老板",
    "领导",
    "同事",
    "绩效",
    "裁员",
    "考试",
    "考研",
    "论文",
    "导师",
    "作业",
    "成绩",
    "父母",
    "家里",
    "婚姻",
    "老公",
    "老婆",
    "男朋友",
    "女朋友",
    "分手",
    "吵架",
    "孩子",
    "房贷",
    "欠钱",
    "没钱",
];

/// Positive or smalltalk vocabulary.
pub const POSITIVE_WORDS: &[&str] = &[
    "你好",
    "在吗",
    "谢谢",
    "开心",
    "高兴",
    "不错",
    "挺好",
    "还好",
    "哈哈",
    "早上好",
    "晚上好",
    "晚安",
];

/// Despair vocabulary. Separate from generic distress: these phrases signal
/// hopelessness and participate in the self-harm question threshold.
pub const DESPAIR_WORDS: &[&str] = &[
    "绝望",
    "没有希望",
    "没希望",
    "看不到希望",
    "撑不下去",
    "熬不下去",
    "没有意义",
    "没意义",
    "活着没意思",
    "想解脱",
    "生无可恋",
];

/// Explicit risk vocabulary: ideation or self-harm mention.
pub const RISK_WORDS: &[&str] = &[
    "不想活",
    "想消失",
    "想死",
    "自杀",
    "自残",
    "自伤",
    "伤害自己",
    "轻生",
    "结束生命",
    "活不下去",
    "了结自己",
];

/// Markers that an utterance reports an automatic thought, not just a scene.
pub const THOUGHT_MARKERS: &[&str] = &[
    "觉得",
    "想法",
    "担心",
    "怕",
    "认为",
    "脑子里",
    "念头",
    "在想",
    "想着",
];

/// Causal connectives that introduce a trigger/context clause.
pub const CAUSAL_CONNECTIVES: &[&str] = &[
    "因为",
    "由于",
    "自从",
    "都是",
    "导致",
    "搞得",
    "害得",
    "被",
];

/// Negation tokens recognized by the risk parser.
pub const NEGATION_TOKENS: &[&str] = &["没有", "从来没", "从没", "并没有", "不会", "没", "无", "不存在"];

/// Trailing tone particles tolerated after a bare negation.
pub const TONE_PARTICLES: &[char] = &['的', '了', '啊', '呢', '吧', '呀', '哦', '啦', '嘛', '～', '~'];

/// Lowercases and trims an utterance for keyword matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Strips whitespace and common punctuation for question de-duplication.
pub fn normalize_question(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !is_question_punct(*c))
        .collect::<String>()
        .to_lowercase()
}

fn is_question_punct(c: char) -> bool {
    matches!(
        c,
        '，' | '。' | '？' | '！' | '、' | '；' | '：' | ',' | '.' | '?' | '!' | ';' | ':'
    )
}

/// Returns true if any of the words occurs in the text.
pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Returns the first word from the list found in the text.
pub fn first_match(text: &str, words: &'static [&'static str]) -> Option<&'static str> {
    words.iter().find(|w| text.contains(**w)).copied()
}
