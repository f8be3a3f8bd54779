//! 词元倒排索引

use std::collections::{BTreeSet, HashMap, HashSet};

use super::scoring;
use super::tokenizer::Tokenizer;

/// 待索引文档：标题与完整可检索文本
#[derive(Debug, Clone, Copy)]
pub struct IndexDocument<'a> {
    pub title: &'a str,
    pub text: &'a str,
}

/// 词元倒排索引
///
/// 词元 → 包含该词元的条目位置集合，外加每个条目的词频与长度。
/// 索引是条目集合的纯函数，相同输入重建得到相等的索引。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenIndex {
    postings: HashMap<String, BTreeSet<usize>>,
    term_frequencies: Vec<HashMap<String, u32>>,
    entry_lengths: Vec<usize>,
    title_tokens: Vec<HashSet<String>>,
}

impl TokenIndex {
    /// 从文档序列构建索引，条目位置即插入顺序
    pub fn build<'a, I>(documents: I, tokenizer: &Tokenizer) -> Self
    where
        I: IntoIterator<Item = IndexDocument<'a>>,
    {
        let mut index = TokenIndex::default();

        for (position, document) in documents.into_iter().enumerate() {
            let tokens = tokenizer.tokenize(document.text);
            let mut frequencies: HashMap<String, u32> = HashMap::new();
            for token in &tokens {
                *frequencies.entry(token.clone()).or_insert(0) += 1;
            }
            for token in frequencies.keys() {
                index
                    .postings
                    .entry(token.clone())
                    .or_default()
                    .insert(position);
            }

            index.entry_lengths.push(tokens.len());
            index.term_frequencies.push(frequencies);
            index
                .title_tokens
                .push(tokenizer.tokenize(document.title).into_iter().collect());
        }

        index
    }

    /// 已索引条目数量
    pub fn len(&self) -> usize {
        self.entry_lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_lengths.is_empty()
    }

    /// 词汇表大小
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// 包含该词元的条目位置
    pub fn postings(&self, token: &str) -> Option<&BTreeSet<usize>> {
        self.postings.get(token)
    }

    pub fn doc_freq(&self, token: &str) -> usize {
        self.postings.get(token).map_or(0, BTreeSet::len)
    }

    /// 词元在语料中的逆文档频率权重
    pub fn idf(&self, token: &str) -> f32 {
        scoring::idf(self.doc_freq(token), self.len())
    }

    pub fn term_frequency(&self, position: usize, token: &str) -> u32 {
        self.term_frequencies
            .get(position)
            .and_then(|tf| tf.get(token))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, position: usize, token: &str) -> bool {
        self.term_frequency(position, token) > 0
    }

    /// 条目的词元总数（含重复）
    pub fn entry_length(&self, position: usize) -> usize {
        self.entry_lengths.get(position).copied().unwrap_or(0)
    }

    pub fn title_contains(&self, position: usize, token: &str) -> bool {
        self.title_tokens
            .get(position)
            .is_some_and(|tokens| tokens.contains(token))
    }

    /// 至少包含一个查询词元的条目位置，按插入顺序
    pub fn candidates(&self, query_tokens: &[String]) -> BTreeSet<usize> {
        query_tokens
            .iter()
            .filter_map(|token| self.postings.get(token))
            .flatten()
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<(String, String)> {
        vec![
            ("Fever care".into(), "Fever care. Drink fluids and rest when fever is high.".into()),
            ("Cough".into(), "Cough. A dry cough often follows a cold.".into()),
        ]
    }

    fn build(docs: &[(String, String)]) -> TokenIndex {
        TokenIndex::build(
            docs.iter().map(|(title, text)| IndexDocument {
                title: title.as_str(),
                text: text.as_str(),
            }),
            &Tokenizer::retrieval(),
        )
    }

    #[test]
    fn test_build_records_postings_and_frequencies() {
        let index = build(&docs());
        assert_eq!(index.len(), 2);
        assert_eq!(index.doc_freq("fever"), 1);
        assert_eq!(index.term_frequency(0, "fever"), 2);
        assert_eq!(index.term_frequency(1, "cough"), 2);
        assert!(index.title_contains(0, "care"));
        assert!(!index.title_contains(1, "care"));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let docs = docs();
        assert_eq!(build(&docs), build(&docs));
    }

    #[test]
    fn test_candidates_in_insertion_order() {
        let index = build(&docs());
        let candidates = index.candidates(&["cough".to_string(), "fever".to_string()]);
        assert_eq!(candidates.into_iter().collect::<Vec<_>>(), vec![0, 1]);
        assert!(index.candidates(&["malaria".to_string()]).is_empty());
    }
}
