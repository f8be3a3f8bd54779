//! 聊天 DTO
//!
//! 定义聊天相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Language, Urgency};
use crate::services::{AssistantReply, ChatMode, SourceRef};

/// 聊天请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    /// 用户问题，长度上限由 `security.max_query_length` 决定
    #[validate(length(min = 2))]
    pub query: String,
    /// 回复语言，未知代码回落到英语
    #[serde(default)]
    pub language: Language,
    /// 输入方式
    #[serde(default)]
    pub mode: ChatMode,
    /// 年龄
    #[validate(range(max = 120))]
    pub age_years: Option<u32>,
    /// 位置或邮编
    #[validate(length(max = 120))]
    pub location: Option<String>,
}

/// 聊天响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// 回答正文
    pub answer: String,
    /// 回复语言
    pub language: String,
    /// 紧急程度
    pub urgency: Urgency,
    /// 免责声明
    pub disclaimer: String,
    /// 后续步骤
    pub next_steps: Vec<String>,
    /// 置信度
    pub confidence: f32,
    /// 引用来源
    pub sources: Vec<SourceItem>,
}

/// 引用来源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceItem {
    pub title: String,
    pub source: String,
    pub score: f32,
}

impl From<SourceRef> for SourceItem {
    fn from(source: SourceRef) -> Self {
        Self {
            title: source.title,
            source: source.source,
            score: source.score,
        }
    }
}

impl From<AssistantReply> for ChatResponse {
    fn from(reply: AssistantReply) -> Self {
        Self {
            answer: reply.answer,
            language: reply.language.code().to_string(),
            urgency: reply.urgency,
            disclaimer: reply.disclaimer,
            next_steps: reply.next_steps,
            confidence: reply.confidence,
            sources: reply.sources.into_iter().map(SourceItem::from).collect(),
        }
    }
}
