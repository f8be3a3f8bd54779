use serde::{Deserialize, Serialize};
use std::fmt;

/// 紧急程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// 常规：直接返回检索内容并附带免责声明
    Routine,
    /// 谨慎：检索置信度不足，建议就医
    Caution,
    /// 紧急：命中红旗症状，返回固定急救指引
    Emergency,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Routine => "routine",
            Urgency::Caution => "caution",
            Urgency::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 分诊结论
///
/// 只根据原始查询文本计算，与检索得分无关，红旗症状不会被糟糕的检索结果掩盖。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageVerdict {
    /// 紧急程度
    pub urgency: Urgency,
    /// 替换检索内容的固定回答
    pub override_answer: Option<String>,
    /// 后续步骤
    pub next_steps: Vec<String>,
    /// 命中的红旗症状组
    pub matched_group: Option<String>,
    /// 命中的词条
    pub matched_terms: Vec<String>,
}

impl TriageVerdict {
    /// 未命中红旗症状时的基线结论
    pub fn routine(next_steps: Vec<String>) -> Self {
        Self {
            urgency: Urgency::Routine,
            override_answer: None,
            next_steps,
            matched_group: None,
            matched_terms: Vec::new(),
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.urgency == Urgency::Emergency
    }
}
