use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_source() -> String {
    "Government Scheme Repository".to_string()
}

/// 政府卫生保障计划
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scheme {
    /// 计划标识
    #[serde(default)]
    pub id: String,
    /// 计划名称
    pub name: String,
    /// 触发匹配的关键词
    #[serde(default)]
    pub keywords: Vec<String>,
    /// 按语言代码索引的摘要
    #[serde(default)]
    pub summaries: HashMap<String, String>,
    /// 后续步骤
    #[serde(default)]
    pub next_steps: Vec<String>,
    /// 来源
    #[serde(default = "default_source")]
    pub source: String,
}

impl Scheme {
    /// 指定语言的摘要，缺失时回落到英语
    pub fn summary(&self, language: &str) -> &str {
        self.summaries
            .get(language)
            .or_else(|| self.summaries.get("en"))
            .map(String::as_str)
            .unwrap_or_default()
    }
}
