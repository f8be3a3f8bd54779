use serde::{Deserialize, Serialize};

fn default_source() -> String {
    "Verified medical sources".to_string()
}

/// 疾病记录
///
/// `medicine_guidance` 只描述药物类别，从不包含剂量。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseRecord {
    /// 记录标识，例如 `dis-dengue`
    pub id: String,
    /// 疾病名称（非空）
    pub name: String,
    /// 别名，按优先级排列
    #[serde(default)]
    pub aliases: Vec<String>,
    /// ICD 章节或分类标签
    pub category: String,
    /// 概述
    pub overview: String,
    /// 治疗思路
    pub treatment_summary: String,
    /// 常用药物类别
    #[serde(default)]
    pub medicine_guidance: Vec<String>,
    /// 居家护理
    #[serde(default)]
    pub home_care: Vec<String>,
    /// 需要急诊的警示症状
    #[serde(default)]
    pub red_flags: Vec<String>,
    /// 来源
    #[serde(default = "default_source")]
    pub source: String,
}

impl DiseaseRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            category: category.into(),
            overview: String::new(),
            treatment_summary: String::new(),
            medicine_guidance: Vec::new(),
            home_care: Vec::new(),
            red_flags: Vec::new(),
            source: default_source(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// 参与匹配的文本：名称、别名与分类（不含正文与治疗描述）
    pub fn match_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.aliases.len() + 2);
        parts.push(self.name.as_str());
        parts.extend(self.aliases.iter().map(String::as_str));
        parts.push(self.category.as_str());
        parts.join(" ")
    }

    /// 名称与别名的小写形式
    pub fn lowered_labels(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|label| label.trim().to_lowercase())
            .filter(|label| !label.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let record: DiseaseRecord = serde_json::from_str(
            r#"{"id": "dis-x", "name": "X", "category": "Y", "overview": "o", "treatment_summary": "t"}"#,
        )
        .unwrap();
        assert!(record.aliases.is_empty());
        assert_eq!(record.source, "Verified medical sources");
    }

    #[test]
    fn test_match_text_excludes_body() {
        let mut record = DiseaseRecord::new("dis-1", "Dengue", "Infectious").with_aliases(["Break-bone fever"]);
        record.overview = "mosquito borne".into();
        let text = record.match_text();
        assert!(text.contains("Break-bone fever"));
        assert!(!text.contains("mosquito"));
    }
}
