//! 政府计划 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::chat_dto::SourceItem;
use crate::models::Language;

/// 计划查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct SchemeQueryParams {
    /// 问题，例如 "Ayushman Bharat card"
    #[validate(length(min = 2, max = 200))]
    pub q: String,
    #[serde(default)]
    pub language: Language,
}

/// 计划查询响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemeResponse {
    pub query: String,
    pub language: String,
    pub answer: String,
    pub next_steps: Vec<String>,
    pub sources: Vec<SourceItem>,
}
