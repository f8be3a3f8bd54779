//! 疾病检索 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::DiseaseMatch;

fn default_limit() -> usize {
    3
}

/// 疾病检索参数
#[derive(Debug, Deserialize, Validate)]
pub struct DiseaseSearchParams {
    /// 疾病名称或症状描述
    #[validate(length(min = 2, max = 120))]
    pub q: String,
    /// 返回数量
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 5))]
    pub limit: usize,
}

/// 疾病匹配项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseMatchItem {
    pub id: String,
    pub name: String,
    pub category: String,
    /// `exact_name` / `exact_alias` / `substring` / `token_overlap`
    pub match_type: String,
    pub score: f32,
    pub overview: String,
    pub treatment_summary: String,
    pub medicine_guidance: Vec<String>,
    pub home_care: Vec<String>,
    pub red_flags: Vec<String>,
    pub source: String,
}

impl From<DiseaseMatch<'_>> for DiseaseMatchItem {
    fn from(found: DiseaseMatch<'_>) -> Self {
        let record = found.record;
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            match_type: found.tier.as_str().to_string(),
            score: found.score,
            overview: record.overview.clone(),
            treatment_summary: record.treatment_summary.clone(),
            medicine_guidance: record.medicine_guidance.clone(),
            home_care: record.home_care.clone(),
            red_flags: record.red_flags.clone(),
            source: record.source.clone(),
        }
    }
}

/// 疾病检索响应
#[derive(Debug, Serialize, Deserialize)]
pub struct DiseaseSearchResponse {
    pub query: String,
    pub matches: Vec<DiseaseMatchItem>,
}
