use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 知识条目
///
/// 启动时从静态数据源加载，之后只读。`id` 在所属数据源内唯一。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeEntry {
    /// 条目标识
    pub id: String,
    /// 标题
    pub title: String,
    /// 正文
    pub body_text: String,
    /// 来源标签，例如 "Medical FAQ" / "National Health Portal"
    pub source_label: String,
    /// 关键词标签
    pub tags: BTreeSet<String>,
    /// 语言代码
    pub language: String,
    /// 主题分类，例如 "infectious" / "maternal"
    pub category: String,
}

impl KnowledgeEntry {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body_text: impl Into<String>,
        source_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body_text: body_text.into(),
            source_label: source_label.into(),
            tags: BTreeSet::new(),
            language: "en".to_string(),
            category: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// 参与索引的全部文本：标题、正文与标签
    pub fn indexable_text(&self) -> String {
        let mut text = format!("{}. {}", self.title, self.body_text);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text
    }

    /// 正文第一句，用作回答摘要
    pub fn summary(&self) -> &str {
        match self.body_text.find('.') {
            Some(end) => &self.body_text[..=end],
            None => truncate_chars(&self.body_text, 220),
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// 数据文件中的原始记录
///
/// 必填字段声明为 `Option`，缺失时由加载器报告具体字段名。
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawKnowledgeEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RawKnowledgeEntry {
    /// 转换为知识条目，返回缺失的必填字段名
    pub fn into_entry(self) -> Result<KnowledgeEntry, &'static str> {
        let id = required(self.id, "id")?;
        let title = required(self.title, "title")?;
        let body_text = required(self.content, "content")?;
        let source_label = required(self.source, "source")?;

        Ok(KnowledgeEntry {
            id,
            title,
            body_text,
            source_label,
            tags: self
                .tags
                .into_iter()
                .map(|tag| tag.trim().to_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
            language: self
                .language
                .filter(|lang| !lang.trim().is_empty())
                .unwrap_or_else(|| "en".to_string()),
            category: self.category.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, &'static str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_entry_defaults() {
        let raw: RawKnowledgeEntry = serde_json::from_str(
            r#"{"id": "faq-1", "title": "Fever", "content": "Rest well.", "source": "Medical FAQ"}"#,
        )
        .unwrap();
        let entry = raw.into_entry().unwrap();
        assert_eq!(entry.language, "en");
        assert!(entry.tags.is_empty());
        assert_eq!(entry.category, "");
    }

    #[test]
    fn test_raw_entry_reports_missing_field() {
        let raw: RawKnowledgeEntry =
            serde_json::from_str(r#"{"id": "faq-1", "title": "Fever", "source": "FAQ"}"#).unwrap();
        assert_eq!(raw.into_entry().unwrap_err(), "content");
    }

    #[test]
    fn test_summary_takes_first_sentence() {
        let entry = KnowledgeEntry::new("a", "t", "First part. Second part.", "FAQ");
        assert_eq!(entry.summary(), "First part.");
    }
}
