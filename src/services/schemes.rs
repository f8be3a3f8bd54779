//! 政府卫生计划导航

use serde::Serialize;

use crate::models::{Language, Scheme};

/// 计划来源的固定得分
pub const SCHEME_SOURCE_SCORE: f32 = 0.88;

const SCHEME_INTENT_WORDS: &[&str] = &[
    "scheme",
    "insurance",
    "card",
    "benefit",
    "yojana",
    "eligibility",
    "apply",
    "registration",
    "cashless",
    "pmjay",
    "ayushman",
    "esanjeevani",
    "jsy",
    "pmmvy",
];

const CLINICAL_INTENT_WORDS: &[&str] = &[
    "pain",
    "fever",
    "bleeding",
    "vomiting",
    "headache",
    "swelling",
    "dizziness",
    "breath",
    "symptom",
    "month",
    "weeks",
    "pregnant",
    "pregnancy",
    "sugar",
    "bp",
];

/// 回答中引用的来源
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceRef {
    pub title: String,
    pub source: String,
    pub score: f32,
}

/// 计划导航的回答
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeAnswer {
    pub answer: String,
    pub next_steps: Vec<String>,
    pub sources: Vec<SourceRef>,
}

/// 计划导航器
#[derive(Debug, Clone, Default)]
pub struct SchemeNavigator {
    schemes: Vec<Scheme>,
}

impl SchemeNavigator {
    pub fn new(schemes: Vec<Scheme>) -> Self {
        Self { schemes }
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    /// 出现计划类词语，且没有临床词语或明确提到 scheme/yojana
    pub fn has_scheme_intent(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        if !SCHEME_INTENT_WORDS.iter().any(|word| lowered.contains(word)) {
            return false;
        }
        let clinical = CLINICAL_INTENT_WORDS.iter().any(|word| lowered.contains(word));
        !clinical || lowered.contains("scheme") || lowered.contains("yojana")
    }

    /// 关键词命中的计划；都没命中但有计划意图时返回前两个
    pub fn search(&self, query: &str) -> Vec<&Scheme> {
        let lowered = query.to_lowercase();
        let matches: Vec<&Scheme> = self
            .schemes
            .iter()
            .filter(|scheme| {
                scheme
                    .keywords
                    .iter()
                    .any(|keyword| lowered.contains(&keyword.to_lowercase()))
            })
            .collect();

        if !matches.is_empty() {
            return matches;
        }
        if self.has_scheme_intent(query) {
            return self.schemes.iter().take(2).collect();
        }
        Vec::new()
    }

    /// 最多两个计划，每个计划取两条步骤，去重后最多三条
    pub fn format_response(&self, matches: &[&Scheme], language: Language) -> SchemeAnswer {
        let mut lines = Vec::new();
        let mut next_steps: Vec<String> = Vec::new();
        let mut sources = Vec::new();

        for scheme in matches.iter().take(2) {
            lines.push(format!("{}: {}", scheme.name, scheme.summary(language.code())));
            for step in scheme.next_steps.iter().take(2) {
                if !next_steps.contains(step) {
                    next_steps.push(step.clone());
                }
            }
            sources.push(SourceRef {
                title: scheme.name.clone(),
                source: scheme.source.clone(),
                score: SCHEME_SOURCE_SCORE,
            });
        }
        next_steps.truncate(3);

        SchemeAnswer {
            answer: lines.join("\n"),
            next_steps,
            sources,
        }
    }
}
