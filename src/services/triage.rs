//! 安全分诊服务
//!
//! 只看原始查询文本，与检索结果无关。命中红旗症状一律升级为 emergency，
//! 检索置信度不足时降级为 caution。

use tracing::{info, warn};

use super::localization::{MessageKey, t};
use super::red_flags::{RedFlagCatalog, emergency_steps, generic_override};
use crate::config::TriageConfig;
use crate::error::Result;
use crate::models::{Language, TriageVerdict, Urgency};

/// 默认的 caution 阈值
pub const DEFAULT_CAUTION_THRESHOLD: f32 = 0.35;

/// 分诊服务接口
#[cfg_attr(test, mockall::automock)]
pub trait TriageService: Send + Sync {
    /// 评估原始查询
    fn assess(&self, raw_query: &str, language: Language) -> Result<TriageVerdict>;

    /// 按检索置信度调整非紧急结论
    fn apply_confidence(
        &self,
        verdict: TriageVerdict,
        confidence: f32,
        language: Language,
    ) -> TriageVerdict;
}

/// 基于红旗词表的分诊层
pub struct TriageLayer {
    catalog: RedFlagCatalog,
    caution_threshold: f32,
}

impl TriageLayer {
    pub fn new(catalog: RedFlagCatalog, config: &TriageConfig) -> Self {
        Self {
            catalog,
            caution_threshold: config.caution_threshold,
        }
    }

    pub fn with_builtin_catalog(config: &TriageConfig) -> Self {
        Self::new(RedFlagCatalog::builtin(), config)
    }

    pub fn caution_threshold(&self) -> f32 {
        self.caution_threshold
    }

    /// 扫描请求语言与英语词表，第一个命中的症状组胜出
    pub fn evaluate(&self, raw_query: &str, language: Language) -> TriageVerdict {
        let lowered = raw_query.to_lowercase();

        for pack in self.catalog.scan_order(language) {
            for group in &pack.groups {
                if let Some(terms) = group.find_match(&lowered) {
                    info!(group = %group.id, language = %language, "Red flag matched");
                    return TriageVerdict {
                        urgency: Urgency::Emergency,
                        override_answer: Some(group.override_answer.clone()),
                        next_steps: group.next_steps.clone(),
                        matched_group: Some(group.id.clone()),
                        matched_terms: terms.to_vec(),
                    };
                }
            }
        }

        TriageVerdict::routine(vec![t(language, MessageKey::FollowUp).to_string()])
    }
}

impl TriageService for TriageLayer {
    fn assess(&self, raw_query: &str, language: Language) -> Result<TriageVerdict> {
        Ok(self.evaluate(raw_query, language))
    }

    fn apply_confidence(
        &self,
        verdict: TriageVerdict,
        confidence: f32,
        language: Language,
    ) -> TriageVerdict {
        demote_by_confidence(verdict, confidence, self.caution_threshold, language)
    }
}

/// emergency 原样返回；置信度低于阈值（含 NaN）降级为 caution，否则为 routine
pub fn demote_by_confidence(
    verdict: TriageVerdict,
    confidence: f32,
    threshold: f32,
    language: Language,
) -> TriageVerdict {
    if verdict.is_emergency() {
        return verdict;
    }

    if confidence >= threshold {
        return TriageVerdict {
            urgency: Urgency::Routine,
            next_steps: vec![t(language, MessageKey::FollowUp).to_string()],
            ..verdict
        };
    }

    TriageVerdict {
        urgency: Urgency::Caution,
        override_answer: None,
        next_steps: vec![
            t(language, MessageKey::NoInfoStep1).to_string(),
            t(language, MessageKey::NoInfoStep2).to_string(),
        ],
        ..verdict
    }
}

impl TriageVerdict {
    /// 分诊本身出错时的保守结论
    pub fn fail_safe(language: Language) -> Self {
        warn!(language = %language, "Triage unavailable, failing safe to emergency");
        TriageVerdict {
            urgency: Urgency::Emergency,
            override_answer: Some(generic_override(language)),
            next_steps: emergency_steps(language),
            matched_group: None,
            matched_terms: Vec::new(),
        }
    }
}

/// 创建分诊服务
pub fn create_triage_service(config: &TriageConfig) -> Box<dyn TriageService> {
    Box::new(TriageLayer::with_builtin_catalog(config))
}
