use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 支持的语言
///
/// 语言只用于选择预置的回复模板和红旗症状词表，不做任何翻译。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Language {
    /// 英语
    #[default]
    En,
    /// 印地语
    Hi,
    /// 泰米尔语
    Ta,
    /// 泰卢固语
    Te,
    /// 孟加拉语
    Bn,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Hi,
        Language::Ta,
        Language::Te,
        Language::Bn,
    ];

    /// 语言代码
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Ta => "ta",
            Language::Te => "te",
            Language::Bn => "bn",
        }
    }

    /// 解析精确的语言代码
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// 规范化客户端传入的语言参数
    ///
    /// `hi-IN` 之类的区域后缀会被去掉，未知或缺失的语言回落到英语。
    pub fn normalize(language: Option<&str>) -> Self {
        let Some(raw) = language else {
            return Language::En;
        };
        let code = raw.trim().to_lowercase();
        let base = code.split('-').next().unwrap_or_default();
        Self::from_code(base).unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::normalize(Some(&raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_region() {
        assert_eq!(Language::normalize(Some("hi-IN")), Language::Hi);
        assert_eq!(Language::normalize(Some(" TA ")), Language::Ta);
    }

    #[test]
    fn test_normalize_falls_back_to_english() {
        assert_eq!(Language::normalize(None), Language::En);
        assert_eq!(Language::normalize(Some("fr")), Language::En);
        assert_eq!(Language::normalize(Some("")), Language::En);
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&Language::Bn).unwrap();
        assert_eq!(json, "\"bn\"");
        let lang: Language = serde_json::from_str("\"te-IN\"").unwrap();
        assert_eq!(lang, Language::Te);
    }
}
