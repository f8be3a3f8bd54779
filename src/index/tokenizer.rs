//! 文本规范化与分词

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// FAQ 检索使用的停用词
pub static RETRIEVAL_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "for", "to", "of", "in", "on", "with", "my", "me", "i",
        "am", "is", "are", "was", "were", "be", "been", "being", "what", "how", "why", "when",
        "where", "can", "should", "could", "would", "please", "about", "need", "help", "have",
        "has", "had", "this", "that", "it", "from",
    ]
    .into_iter()
    .collect()
});

/// 疾病匹配使用的停用词，额外屏蔽"治疗/药物/症状"这类意图词
pub static DISEASE_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "for", "to", "of", "in", "on", "with", "my", "me", "i",
        "am", "is", "are", "do", "does", "what", "why", "how", "can", "should", "please",
        "about", "need", "help", "have", "has", "had", "from", "this", "that", "it", "be",
        "treatment", "medicine", "medicines", "remedy", "remedies", "care", "cure", "manage",
        "management", "disease", "diseases", "symptom", "symptoms",
    ]
    .into_iter()
    .collect()
});

/// 词元字符：字母数字、下划线，以及天城文、孟加拉文、泰米尔文、泰卢固文区块
/// （这些文字的元音符号不属于 alphanumeric，需要单独保留在词内）
pub fn is_token_char(c: char) -> bool {
    c.is_alphanumeric()
        || c == '_'
        || matches!(
            c,
            '\u{0900}'..='\u{097F}'
                | '\u{0980}'..='\u{09FF}'
                | '\u{0B80}'..='\u{0BFF}'
                | '\u{0C00}'..='\u{0C7F}'
        )
}

/// 分词器
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    stopwords: &'static Lazy<HashSet<&'static str>>,
}

impl Tokenizer {
    /// FAQ 检索分词器
    pub fn retrieval() -> Self {
        Self {
            stopwords: &RETRIEVAL_STOPWORDS,
        }
    }

    /// 疾病匹配分词器
    pub fn disease() -> Self {
        Self {
            stopwords: &DISEASE_STOPWORDS,
        }
    }

    /// 小写化并切分为原始词元，不做过滤
    pub fn split_words(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !is_token_char(c))
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// 分词并去掉停用词与单字符词元，保留重复
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        Self::split_words(text)
            .into_iter()
            .filter(|token| token.chars().count() > 1 && !self.is_stopword(token))
            .collect()
    }

    /// 查询分词：去重并保留首次出现顺序
    pub fn tokenize_query(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tokenize(text)
            .into_iter()
            .filter(|token| seen.insert(token.clone()))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::retrieval()
    }
}
