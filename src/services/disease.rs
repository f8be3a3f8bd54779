//! 疾病匹配服务
//!
//! 分层匹配：精确名称 > 精确别名 > 短语包含 > 词元重叠。
//! 词元重叠只针对名称、别名和分类，不看正文。

use once_cell::sync::Lazy;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::DiseaseConfig;
use crate::index::{IndexDocument, TokenIndex, Tokenizer, scoring};
use crate::index::tokenizer::is_token_char;
use crate::models::DiseaseRecord;

/// 词元重叠层的得分上限，保证不会超过任何短语层
pub const TOKEN_OVERLAP_CAP: f32 = 0.8;

/// 单次查询最多返回的疾病数量
pub const MAX_LIMIT: usize = 5;

/// 口语词元 → 库内术语
static QUERY_EXPANSIONS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("blood", &["hematologic", "haematologic", "leukemia", "leukaemia"][..]),
        ("kidney", &["renal"][..]),
        ("stone", &["calculus", "nephrolithiasis"][..]),
        ("ear", &["hearing", "otitis"][..]),
        ("heart", &["cardiac"][..]),
        ("bp", &["pressure", "hypertension"][..]),
        ("sugar", &["diabetes"][..]),
        (
            "cancer",
            &["neoplasm", "malignant", "malignancy", "tumor", "tumour", "oncology"][..],
        ),
        ("tumor", &["tumour", "neoplasm", "cancer"][..]),
        ("tumour", &["tumor", "neoplasm", "cancer"][..]),
        ("pregnant", &["pregnancy"][..]),
    ])
});

static LOOKUP_INTENT_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "disease", "condition", "diagnosis", "treatment", "medicine", "medicines", "drug",
        "drugs", "remedy", "remedies", "cancer", "infection", "syndrome", "icd",
    ]
    .into_iter()
    .collect()
});

/// 泛化症状词，单靠它们不足以确定具体疾病
static NONSPECIFIC_TERMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "pain", "chest", "abdominal", "cough", "fever", "headache", "nausea", "vomiting",
        "dizziness", "fatigue", "weakness", "palpitations",
    ]
    .into_iter()
    .collect()
});

/// 匹配层级，声明顺序即优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactName,
    ExactAlias,
    Substring,
    TokenOverlap,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::ExactName => "exact_name",
            MatchTier::ExactAlias => "exact_alias",
            MatchTier::Substring => "substring",
            MatchTier::TokenOverlap => "token_overlap",
        }
    }

    /// 短语层的固定得分
    pub fn fixed_score(&self) -> Option<f32> {
        match self {
            MatchTier::ExactName => Some(1.0),
            MatchTier::ExactAlias => Some(0.95),
            MatchTier::Substring => Some(0.85),
            MatchTier::TokenOverlap => None,
        }
    }
}

/// 疾病匹配结果
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseMatch<'a> {
    pub record: &'a DiseaseRecord,
    pub score: f32,
    pub tier: MatchTier,
    /// 只因泛化症状词命中
    pub nonspecific: bool,
}

/// 疾病匹配器
#[derive(Debug)]
pub struct DiseaseMatcher {
    records: Vec<DiseaseRecord>,
    labels: Vec<Vec<String>>,
    index: TokenIndex,
    tokenizer: Tokenizer,
    min_score: f32,
    expansion_weight: f32,
    high_quality_score: f32,
}

impl DiseaseMatcher {
    pub fn new(records: Vec<DiseaseRecord>, config: &DiseaseConfig) -> Self {
        let tokenizer = Tokenizer::disease();
        let texts: Vec<String> = records.iter().map(DiseaseRecord::match_text).collect();
        let index = TokenIndex::build(
            records.iter().zip(&texts).map(|(record, text)| IndexDocument {
                title: record.name.as_str(),
                text: text.as_str(),
            }),
            &tokenizer,
        );
        let labels = records
            .iter()
            .map(|record| record.lowered_labels().map(|l| normalize_phrase(&l)).collect())
            .collect();

        Self {
            records,
            labels,
            index,
            tokenizer,
            min_score: config.min_score,
            expansion_weight: config.expansion_weight,
            high_quality_score: config.high_quality_score,
        }
    }

    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 搜索疾病，`limit` 限制在 1..=5
    ///
    /// 没有匹配时返回空列表。
    pub fn search(&self, query: &str, limit: usize) -> Vec<DiseaseMatch<'_>> {
        let phrase = normalize_phrase(query);
        if phrase.is_empty() {
            return Vec::new();
        }
        let limit = limit.clamp(1, MAX_LIMIT);

        let base_tokens = self.tokenizer.tokenize_query(query);
        let expansions = self.expansion_tokens(&base_tokens);
        let query_weight: f32 = base_tokens.iter().map(|t| self.index.idf(t)).sum();
        let generic_query = !base_tokens.is_empty()
            && base_tokens
                .iter()
                .all(|token| NONSPECIFIC_TERMS.contains(token.as_str()));

        let mut matches: Vec<(usize, DiseaseMatch<'_>)> = Vec::new();
        for (position, record) in self.records.iter().enumerate() {
            let found = self.phrase_tier(position, &phrase).map(|tier| {
                (tier, tier.fixed_score().unwrap_or(TOKEN_OVERLAP_CAP))
            });
            let found = found.or_else(|| {
                self.overlap_score(position, &base_tokens, &expansions, query_weight)
                    .map(|score| (MatchTier::TokenOverlap, score))
            });

            if let Some((tier, score)) = found {
                let nonspecific = match tier {
                    MatchTier::ExactName | MatchTier::ExactAlias => is_nonspecific_label(&record.name),
                    MatchTier::Substring | MatchTier::TokenOverlap => generic_query,
                };
                matches.push((
                    position,
                    DiseaseMatch {
                        record,
                        score,
                        tier,
                        nonspecific,
                    },
                ));
            }
        }

        matches.sort_by(|(pos_a, a), (pos_b, b)| {
            a.tier
                .cmp(&b.tier)
                .then(b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
                .then(pos_a.cmp(pos_b))
        });
        matches.truncate(limit);

        debug!(query = %phrase, hits = matches.len(), "Disease search completed");
        matches.into_iter().map(|(_, m)| m).collect()
    }

    fn phrase_tier(&self, position: usize, phrase: &str) -> Option<MatchTier> {
        let labels = self.labels.get(position)?;
        let (name, aliases) = labels.split_first()?;

        if name == phrase {
            return Some(MatchTier::ExactName);
        }
        if aliases.iter().any(|alias| alias == phrase) {
            return Some(MatchTier::ExactAlias);
        }
        let phrase_long_enough = phrase.chars().count() >= 3;
        if labels.iter().any(|label| {
            contains_phrase(phrase, label) || (phrase_long_enough && contains_phrase(label, phrase))
        }) {
            return Some(MatchTier::Substring);
        }
        None
    }

    fn expansion_tokens(&self, base_tokens: &[String]) -> Vec<String> {
        let base: HashSet<&str> = base_tokens.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        base_tokens
            .iter()
            .filter_map(|token| QUERY_EXPANSIONS.get(token.as_str()))
            .flat_map(|terms| terms.iter())
            .filter(|term| !base.contains(**term) && seen.insert(**term))
            .map(|term| term.to_string())
            .collect()
    }

    fn overlap_score(
        &self,
        position: usize,
        base_tokens: &[String],
        expansions: &[String],
        query_weight: f32,
    ) -> Option<f32> {
        if base_tokens.is_empty() || query_weight <= 0.0 {
            return None;
        }

        let primary: Vec<&String> = base_tokens
            .iter()
            .filter(|t| self.index.contains(position, t))
            .collect();
        let expanded: Vec<&String> = expansions
            .iter()
            .filter(|t| self.index.contains(position, t))
            .collect();

        if primary.is_empty() && (expanded.is_empty() || base_tokens.len() >= 2) {
            return None;
        }
        if scoring::is_sparse_overlap(base_tokens.len(), primary.len()) {
            return None;
        }

        let matched_weight: f32 = primary.iter().map(|t| self.index.idf(t)).sum::<f32>()
            + self.expansion_weight * expanded.iter().map(|t| self.index.idf(t)).sum::<f32>();
        let score = scoring::overlap_score(
            matched_weight,
            query_weight,
            self.index.entry_length(position),
            base_tokens.len(),
        )
        .min(TOKEN_OVERLAP_CAP);
        let score = scoring::round_to(score, 4);

        (score >= self.min_score).then_some(score)
    }

    /// 查询中是否直接出现疾病名称或别名
    pub fn query_mentions_disease(&self, query: &str, record: &DiseaseRecord) -> bool {
        let phrase = normalize_phrase(query);
        record
            .lowered_labels()
            .any(|label| contains_phrase(&phrase, &normalize_phrase(&label)))
    }

    /// 查询是否带有查病/治疗意图
    pub fn has_lookup_intent(&self, query: &str) -> bool {
        Tokenizer::split_words(query)
            .iter()
            .any(|word| LOOKUP_INTENT_WORDS.contains(word.as_str()))
    }

    /// 泛化症状命中不算高质量；其余短语层一律算，词元重叠层需要足够高的得分
    pub fn is_high_quality(&self, found: &DiseaseMatch<'_>) -> bool {
        if found.nonspecific {
            return false;
        }
        found.tier != MatchTier::TokenOverlap || found.score >= self.high_quality_score
    }
}

fn is_nonspecific_label(name: &str) -> bool {
    let words = Tokenizer::split_words(name);
    !words.is_empty()
        && words
            .iter()
            .all(|word| NONSPECIFIC_TERMS.contains(word.as_str()))
}

/// 小写并把非词元字符压缩成单个空格
fn normalize_phrase(text: &str) -> String {
    Tokenizer::split_words(text).join(" ")
}

/// `haystack` 中以词为边界出现 `needle`
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_token_char(c));
        let after_ok = haystack[end..].chars().next().is_none_or(|c| !is_token_char(c));
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn matcher() -> DiseaseMatcher {
        let records = vec![
            DiseaseRecord::new("dis-dengue", "Dengue", "Infectious disease")
                .with_aliases(["Dengue fever", "Break-bone fever"]),
            DiseaseRecord::new("dis-diabetes", "Type 2 Diabetes", "Endocrine and metabolic")
                .with_aliases(["Diabetes", "Diabetes mellitus"]),
            DiseaseRecord::new("dis-hypertension", "Hypertension", "Cardiovascular")
                .with_aliases(["High blood pressure"]),
            DiseaseRecord::new("dis-ckd", "Chronic Kidney Disease", "Renal")
                .with_aliases(["CKD", "Renal failure"]),
            DiseaseRecord::new("dis-malaria", "Malaria", "Infectious disease"),
        ];
        DiseaseMatcher::new(
            records,
            &DiseaseConfig {
                min_score: 0.3,
                expansion_weight: 0.35,
                high_quality_score: 0.62,
            },
        )
    }

    #[rstest]
    #[case("dengue", "dis-dengue", MatchTier::ExactName)]
    #[case("DIABETES", "dis-diabetes", MatchTier::ExactAlias)]
    #[case("treatment for high blood pressure", "dis-hypertension", MatchTier::Substring)]
    #[case("ckd", "dis-ckd", MatchTier::ExactAlias)]
    fn test_phrase_tiers(#[case] query: &str, #[case] id: &str, #[case] tier: MatchTier) {
        let matcher = matcher();
        let results = matcher.search(query, 3);
        assert_eq!(results[0].record.id, id);
        assert_eq!(results[0].tier, tier);
    }

    #[test]
    fn test_exact_name_outranks_token_overlap() {
        let matcher = matcher();
        let results = matcher.search("malaria", 5);
        assert_eq!(results[0].record.id, "dis-malaria");
        assert_eq!(results[0].score, 1.0);
        assert!(results.iter().skip(1).all(|m| m.tier > MatchTier::ExactName));
    }

    #[test]
    fn test_token_overlap_is_capped() {
        let matcher = matcher();
        let results = matcher.search("kidney sugar", 5);
        for found in &results {
            if found.tier == MatchTier::TokenOverlap {
                assert!(found.score <= TOKEN_OVERLAP_CAP);
                assert!(found.score >= 0.3);
            }
        }
    }

    #[test]
    fn test_expansion_tokens_add_weight() {
        let matcher = matcher();
        let results = matcher.search("kidney problem", 3);
        assert_eq!(results[0].record.id, "dis-ckd");
        assert_eq!(results[0].tier, MatchTier::TokenOverlap);

        let without_expansion = DiseaseMatcher::new(
            matcher.records().to_vec(),
            &DiseaseConfig {
                min_score: 0.3,
                expansion_weight: 0.0,
                high_quality_score: 0.62,
            },
        );
        assert!(without_expansion.search("kidney problem", 3).is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let matcher = matcher();
        assert!(matcher.search("qwxz", 3).is_empty());
        assert!(matcher.search("   ", 3).is_empty());
    }

    #[test]
    fn test_limit_is_clamped() {
        let matcher = matcher();
        assert_eq!(matcher.search("dengue", 0).len(), 1);
        assert!(matcher.search("infectious", 50).len() <= MAX_LIMIT);
    }

    #[test]
    fn test_helpers() {
        let matcher = matcher();
        let dengue = &matcher.records()[0];
        assert!(matcher.query_mentions_disease("home remedies for dengue?", dengue));
        assert!(!matcher.query_mentions_disease("headache and fever", dengue));
        assert!(matcher.has_lookup_intent("What medicines help?"));
        assert!(!matcher.has_lookup_intent("I feel tired"));
    }

    #[rstest]
    #[case("fever treatment")]
    #[case("fever")]
    #[case("medicine for headache and cough")]
    fn test_generic_symptom_matches_are_not_high_quality(#[case] query: &str) {
        let matcher = matcher();
        let results = matcher.search(query, 5);
        assert!(results.iter().all(|found| found.nonspecific));
        assert!(results.iter().all(|found| !matcher.is_high_quality(found)));
    }

    #[test]
    fn test_named_disease_with_symptom_stays_high_quality() {
        let matcher = matcher();
        let results = matcher.search("dengue fever treatment", 3);
        assert_eq!(results[0].record.id, "dis-dengue");
        assert!(!results[0].nonspecific);
        assert!(matcher.is_high_quality(&results[0]));
    }

    #[test]
    fn test_contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("type 2 diabetes care", "diabetes"));
        assert!(!contains_phrase("prediabetes", "diabetes"));
        assert!(!contains_phrase("stbx", "tb"));
    }
}
