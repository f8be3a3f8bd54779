//! 检索服务
//!
//! 对知识库做词法检索：候选条目只来自查询词元的倒排列表，
//! 按 idf 加权重叠度与长度归一化打分，再叠加标题、语言和分类奖励。

use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::config::RetrievalConfig;
use crate::error::{AppError, Result};
use crate::index::{Tokenizer, scoring};
use crate::models::{KnowledgeEntry, Language};
use crate::storage::KnowledgeStore;

/// 查询词元 → 条目分类提示
static CATEGORY_HINTS: Lazy<Vec<(&'static str, &'static [&'static str])>> = Lazy::new(|| {
    vec![
        (
            "maternal",
            &["pregnant", "pregnancy", "fetal", "delivery", "antenatal", "anc", "newborn"][..],
        ),
        (
            "chronic",
            &["diabetes", "sugar", "hypertension", "bp", "pressure", "thyroid", "kidney"][..],
        ),
        (
            "infectious",
            &["fever", "infection", "flu", "cough", "malaria", "dengue", "tb", "diarrhea"][..],
        ),
        (
            "child-health",
            &["child", "baby", "newborn", "infant", "vaccination"][..],
        ),
        (
            "mental-health",
            &["anxiety", "depression", "stress", "sad", "sleep"][..],
        ),
        (
            "nutrition",
            &["anemia", "weakness", "iron", "diet", "nutrition"][..],
        ),
        (
            "prevention",
            &["prevention", "hygiene", "water", "handwash", "sanitation"][..],
        ),
    ]
});

/// 查询命中的分类提示
pub fn query_categories(query_tokens: &[String]) -> BTreeSet<&'static str> {
    CATEGORY_HINTS
        .iter()
        .filter(|(_, keywords)| {
            query_tokens
                .iter()
                .any(|token| keywords.contains(&token.as_str()))
        })
        .map(|(category, _)| *category)
        .collect()
}

/// 单条检索结果，借用知识库中的条目
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult<'a> {
    pub entry: &'a KnowledgeEntry,
    /// 得分，范围 `[0, 1]`
    pub score: f32,
    /// 命中的查询词元
    pub matched_tokens: BTreeSet<String>,
}

/// 检索结果与校准后的置信度
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval<'a> {
    pub results: Vec<RetrievalResult<'a>>,
    pub confidence: f32,
}

impl Retrieval<'_> {
    pub fn top(&self) -> Option<&RetrievalResult<'_>> {
        self.results.first()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// 检索服务接口
pub trait RetrievalService: Send + Sync {
    /// 返回不超过 `top_k` 条结果，按得分降序，同分按插入顺序
    ///
    /// 查询规范化后为空时返回 `AppError::EmptyQuery`。
    fn retrieve(
        &self,
        query: &str,
        language: Language,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult<'_>>>;

    /// 默认条数
    fn default_top_k(&self) -> usize;

    /// 检索并计算置信度
    fn search(&self, query: &str, language: Language) -> Result<Retrieval<'_>> {
        let results = self.retrieve(query, language, self.default_top_k())?;
        let confidence = results
            .first()
            .map_or(0.0, |top| scoring::calibrate_confidence(top.score));
        Ok(Retrieval {
            results,
            confidence: scoring::round_to(confidence, 4),
        })
    }
}

/// 词法检索器
pub struct LexicalRetriever {
    store: Arc<KnowledgeStore>,
    tokenizer: Tokenizer,
    top_k: usize,
    min_score: f32,
}

impl LexicalRetriever {
    pub fn new(store: Arc<KnowledgeStore>, config: &RetrievalConfig) -> Self {
        Self {
            store,
            tokenizer: Tokenizer::retrieval(),
            top_k: config.top_k.max(1),
            min_score: config.min_score.max(0.0),
        }
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    fn score_entry(
        &self,
        position: usize,
        entry: &KnowledgeEntry,
        query_tokens: &[String],
        query_weight: f32,
        language: Language,
        hinted: &BTreeSet<&'static str>,
    ) -> Option<(f32, BTreeSet<String>)> {
        let index = self.store.index();

        let mut matched = BTreeSet::new();
        let mut matched_weight = 0.0;
        let mut title_weight = 0.0;
        for token in query_tokens {
            if !index.contains(position, token) {
                continue;
            }
            let weight = index.idf(token);
            matched_weight += weight;
            if index.title_contains(position, token) {
                title_weight += weight;
            }
            matched.insert(token.clone());
        }

        if matched.is_empty() || scoring::is_sparse_overlap(query_tokens.len(), matched.len()) {
            return None;
        }

        let mut score = scoring::overlap_score(
            matched_weight,
            query_weight,
            index.entry_length(position),
            query_tokens.len(),
        );
        if title_weight > 0.0 {
            score += scoring::TITLE_BONUS * (title_weight / query_weight).min(1.0);
        }
        if entry.language == language.code() {
            score += scoring::LANGUAGE_BONUS;
        }
        if hinted.contains(entry.category.as_str()) {
            score += scoring::CATEGORY_BONUS;
        }

        Some((scoring::round_to(score.clamp(0.0, 1.0), 4), matched))
    }
}

impl RetrievalService for LexicalRetriever {
    fn retrieve(
        &self,
        query: &str,
        language: Language,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult<'_>>> {
        let query_tokens = self.tokenizer.tokenize_query(query);
        if query_tokens.is_empty() {
            return Err(AppError::EmptyQuery);
        }

        let index = self.store.index();
        let query_weight: f32 = query_tokens.iter().map(|token| index.idf(token)).sum();
        let hinted = query_categories(&query_tokens);

        let mut results: Vec<(usize, RetrievalResult<'_>)> = Vec::new();
        for position in index.candidates(&query_tokens) {
            let Some(entry) = self.store.entry(position) else {
                continue;
            };
            let Some((score, matched_tokens)) = self.score_entry(
                position,
                entry,
                &query_tokens,
                query_weight,
                language,
                &hinted,
            ) else {
                continue;
            };
            if score < self.min_score {
                continue;
            }
            results.push((
                position,
                RetrievalResult {
                    entry,
                    score,
                    matched_tokens,
                },
            ));
        }

        results.sort_by(|(pos_a, a), (pos_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(pos_a.cmp(pos_b))
        });
        results.truncate(top_k);

        debug!(
            tokens = ?query_tokens,
            hits = results.len(),
            "Retrieved knowledge entries"
        );

        Ok(results.into_iter().map(|(_, result)| result).collect())
    }

    fn default_top_k(&self) -> usize {
        self.top_k
    }
}

/// 创建检索服务
pub fn create_retrieval_service(
    store: Arc<KnowledgeStore>,
    config: &RetrievalConfig,
) -> Box<dyn RetrievalService> {
    Box::new(LexicalRetriever::new(store, config))
}
