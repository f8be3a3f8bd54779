//! 健康助手
//!
//! 组装一次聊天回答：
//! 1. 分诊先行，紧急结论直接返回固定急救指引；
//! 2. 政府计划意图走计划导航；
//! 3. 孕期语境给出分阶段产检指导；
//! 4. 高质量疾病匹配给出结构化医疗指导；
//! 5. 其余走知识检索，并按置信度与分诊结论合并。

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::disease::DiseaseMatcher;
use super::guidance::{
    MedicalGuidance, derive_age_group, extract_pincode, format_hospital_section,
    hospital_unavailable_section,
};
use super::hospitals::HospitalService;
use super::localization::{MessageKey, t};
use super::pregnancy;
use super::retrieval::{RetrievalResult, RetrievalService};
use super::schemes::{SCHEME_SOURCE_SCORE, SchemeNavigator, SourceRef};
use super::triage::TriageService;
use crate::error::AppError;
use crate::index::scoring::round_to;
use crate::models::{Language, TriageVerdict, Urgency};

/// 紧急回答的固定置信度
pub const EMERGENCY_CONFIDENCE: f32 = 0.99;

/// 检索回答的置信度上限
pub const MAX_GROUNDED_CONFIDENCE: f32 = 0.9;

const HOSPITAL_SECTION_LIMIT: usize = 5;

const TOPIC_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "for", "to", "of", "in", "on", "with", "my", "me", "i", "am",
    "is", "are", "what", "how", "why", "can", "should", "please", "about", "need", "help", "have",
    "has", "had", "this", "that", "it", "from",
];

/// 输入方式，只用于日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Text,
    Voice,
}

/// 一次聊天请求
#[derive(Debug, Clone, Default)]
pub struct ChatQuery {
    pub query: String,
    pub language: Language,
    pub mode: ChatMode,
    pub age_years: Option<u32>,
    pub location: Option<String>,
}

impl ChatQuery {
    pub fn new(query: impl Into<String>, language: Language) -> Self {
        Self {
            query: query.into(),
            language,
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_age(mut self, age_years: u32) -> Self {
        self.age_years = Some(age_years);
        self
    }
}

/// 聊天回答
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssistantReply {
    pub answer: String,
    pub language: Language,
    pub urgency: Urgency,
    pub disclaimer: String,
    pub next_steps: Vec<String>,
    pub confidence: f32,
    pub sources: Vec<SourceRef>,
}

/// 健康助手
pub struct HealthAssistant {
    retrieval: Arc<dyn RetrievalService>,
    diseases: Arc<DiseaseMatcher>,
    triage: Arc<dyn TriageService>,
    schemes: Arc<SchemeNavigator>,
    hospitals: Option<Arc<dyn HospitalService>>,
    lookup_timeout: Duration,
}

impl HealthAssistant {
    pub fn new(
        retrieval: Arc<dyn RetrievalService>,
        diseases: Arc<DiseaseMatcher>,
        triage: Arc<dyn TriageService>,
        schemes: Arc<SchemeNavigator>,
    ) -> Self {
        Self {
            retrieval,
            diseases,
            triage,
            schemes,
            hospitals: None,
            lookup_timeout: Duration::from_secs(20),
        }
    }

    /// 启用聊天回答中的医院段落
    pub fn with_hospitals(mut self, hospitals: Arc<dyn HospitalService>, timeout: Duration) -> Self {
        self.hospitals = Some(hospitals);
        self.lookup_timeout = timeout;
        self
    }

    pub async fn answer(&self, request: &ChatQuery) -> AssistantReply {
        let query = request.query.trim();
        let language = request.language;
        debug!(language = %language, mode = ?request.mode, "Answering chat query");

        let verdict = self.triage.assess(query, language).unwrap_or_else(|e| {
            warn!("Triage failed: {}", e);
            TriageVerdict::fail_safe(language)
        });

        if verdict.is_emergency() {
            return self.emergency_reply(request, verdict).await;
        }

        let scheme_intent = self.schemes.has_scheme_intent(query);
        if scheme_intent {
            let matches = self.schemes.search(query);
            if !matches.is_empty() {
                let formatted = self.schemes.format_response(&matches, language);
                return AssistantReply {
                    answer: formatted.answer,
                    language,
                    urgency: Urgency::Routine,
                    disclaimer: t(language, MessageKey::Disclaimer).to_string(),
                    next_steps: formatted.next_steps,
                    confidence: SCHEME_SOURCE_SCORE,
                    sources: formatted.sources,
                };
            }
        } else if pregnancy::has_pregnancy_context(query) {
            return self.pregnancy_reply(request).await;
        }

        if let Some(reply) = self.disease_reply(request).await {
            return reply;
        }

        self.grounded_reply(request, verdict).await
    }

    async fn emergency_reply(&self, request: &ChatQuery, verdict: TriageVerdict) -> AssistantReply {
        let language = request.language;
        info!(
            group = verdict.matched_group.as_deref().unwrap_or("fail_safe"),
            "Emergency override applied"
        );

        let overview = verdict
            .override_answer
            .clone()
            .unwrap_or_else(|| t(language, MessageKey::CriticalBody).to_string());
        let red_flags = if verdict.matched_terms.is_empty() {
            vec![
                "Severe chest pain".to_string(),
                "Unconsciousness".to_string(),
                "Severe bleeding".to_string(),
            ]
        } else {
            verdict.matched_terms.clone()
        };
        let medicines = [
            "Emergency medicines should be given only by trained clinicians.".to_string(),
            "Do not self-administer high-risk medicines or injections at home.".to_string(),
        ];
        let avoid = [
            "Do not delay emergency transfer.".to_string(),
            "Do not wait for symptoms to settle on their own.".to_string(),
        ];

        let guidance = MedicalGuidance {
            condition: "Emergency symptoms detected",
            age_group: derive_age_group(&request.query, request.age_years),
            overview: &overview,
            treatment_summary: "Immediate emergency triage and hospital stabilization are required.",
            medicines: &medicines,
            lifestyle: &verdict.next_steps,
            avoid: &avoid,
            red_flags: &red_flags,
            emotional_support: "Stay calm, keep the patient accompanied, and use clear communication with emergency staff.",
        }
        .render();

        AssistantReply {
            answer: self.with_hospital_section(guidance, request, true).await,
            language,
            urgency: Urgency::Emergency,
            disclaimer: t(language, MessageKey::Disclaimer).to_string(),
            next_steps: verdict.next_steps,
            confidence: EMERGENCY_CONFIDENCE,
            sources: vec![SourceRef {
                title: "Emergency Triage Guidance".to_string(),
                source: "MoHFW Emergency Protocol".to_string(),
                score: 1.0,
            }],
        }
    }

    async fn pregnancy_reply(&self, request: &ChatQuery) -> AssistantReply {
        let language = request.language;
        let advice = pregnancy::build_guidance(&request.query);
        let medicines = [
            "Pregnancy-safe medicines should be chosen only by a qualified doctor.".to_string(),
            "Iron, folic acid, calcium, and vaccines should follow ANC protocol and doctor advice.".to_string(),
            "Avoid over-the-counter painkillers, herbal medicines, or antibiotics without prescription.".to_string(),
        ];
        let avoid = [
            "Do not skip scheduled ANC/PNC checkups.".to_string(),
            "Do not self-medicate during pregnancy.".to_string(),
        ];
        let red_flags = [
            "Vaginal bleeding".to_string(),
            "Severe headache or blurred vision".to_string(),
            "Reduced fetal movement".to_string(),
            "Convulsions or severe breathlessness".to_string(),
        ];

        let guidance = MedicalGuidance {
            condition: "Pregnancy support",
            age_group: derive_age_group(&request.query, request.age_years),
            overview: &advice.answer,
            treatment_summary: "Antenatal care, blood pressure monitoring, fetal monitoring, and obstetric review are the core approaches.",
            medicines: &medicines,
            lifestyle: &advice.next_steps,
            avoid: &avoid,
            red_flags: &red_flags,
            emotional_support: "Seek family support, discuss concerns with ANM/doctor, and ask for counselling if anxiety is high.",
        }
        .render();

        AssistantReply {
            answer: self.with_hospital_section(guidance, request, false).await,
            language,
            urgency: Urgency::Routine,
            disclaimer: format!(
                "{} Pregnancy symptoms should be clinically reviewed; do not self-medicate.",
                t(language, MessageKey::Disclaimer)
            ),
            next_steps: advice.next_steps,
            confidence: advice.confidence,
            sources: vec![SourceRef {
                title: "Pregnancy ANC Guidance".to_string(),
                source: advice.source.to_string(),
                score: advice.confidence,
            }],
        }
    }

    async fn disease_reply(&self, request: &ChatQuery) -> Option<AssistantReply> {
        let query = request.query.as_str();
        let language = request.language;
        let matches = self.diseases.search(query, super::disease::MAX_LIMIT);
        let top = matches.first()?;

        let relevant = self.diseases.query_mentions_disease(query, top.record)
            || self.diseases.has_lookup_intent(query);
        if !self.diseases.is_high_quality(top) || !relevant {
            debug!(disease = %top.record.name, score = top.score, "Disease match not used");
            return None;
        }

        let record = top.record;
        let avoid = [
            "Do not start or stop prescription medicines without medical advice.".to_string(),
            "Do not use leftover antibiotics or steroid combinations without diagnosis.".to_string(),
        ];
        let guidance = MedicalGuidance {
            condition: &record.name,
            age_group: derive_age_group(query, request.age_years),
            overview: &record.overview,
            treatment_summary: &record.treatment_summary,
            medicines: &record.medicine_guidance,
            lifestyle: &record.home_care,
            avoid: &avoid,
            red_flags: &record.red_flags,
            emotional_support: "Chronic symptoms can be stressful; consider counselling or support groups and involve family in care planning.",
        }
        .render();

        Some(AssistantReply {
            answer: self.with_hospital_section(guidance, request, false).await,
            language,
            urgency: Urgency::Routine,
            disclaimer: format!(
                "{} Never start/stop prescription medicines without a licensed doctor.",
                t(language, MessageKey::Disclaimer)
            ),
            next_steps: build_next_steps(query, language),
            confidence: round_to(top.score.clamp(0.55, 0.99), 2),
            sources: vec![SourceRef {
                title: record.name.clone(),
                source: record.source.clone(),
                score: round_to(top.score, 2),
            }],
        })
    }

    async fn grounded_reply(&self, request: &ChatQuery, verdict: TriageVerdict) -> AssistantReply {
        let query = request.query.as_str();
        let language = request.language;

        let retrieval = match self.retrieval.search(query, language) {
            Ok(retrieval) => retrieval,
            Err(AppError::EmptyQuery) => {
                let verdict = self.triage.apply_confidence(verdict, 0.0, language);
                return AssistantReply {
                    answer: t(language, MessageKey::Rephrase).to_string(),
                    language,
                    urgency: verdict.urgency,
                    disclaimer: t(language, MessageKey::Disclaimer).to_string(),
                    next_steps: verdict.next_steps,
                    confidence: 0.0,
                    sources: Vec::new(),
                };
            }
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                return self.low_information_reply(request, verdict, &[], 0.0).await;
            }
        };

        let verdict = self
            .triage
            .apply_confidence(verdict, retrieval.confidence, language);
        debug!(
            results = retrieval.results.len(),
            confidence = retrieval.confidence,
            urgency = %verdict.urgency,
            "Retrieval merged with triage"
        );

        match verdict.urgency {
            Urgency::Emergency => self.emergency_reply(request, verdict).await,
            Urgency::Caution => {
                self.low_information_reply(request, verdict, &retrieval.results, retrieval.confidence)
                    .await
            }
            Urgency::Routine => {
                let answer = compose_grounded_answer(&retrieval.results, query, language);
                AssistantReply {
                    answer: self.with_hospital_section(answer, request, false).await,
                    language,
                    urgency: Urgency::Routine,
                    disclaimer: t(language, MessageKey::Disclaimer).to_string(),
                    next_steps: build_next_steps(query, language),
                    confidence: round_to(retrieval.confidence.min(MAX_GROUNDED_CONFIDENCE), 2),
                    sources: source_refs(&retrieval.results),
                }
            }
        }
    }

    async fn low_information_reply(
        &self,
        request: &ChatQuery,
        verdict: TriageVerdict,
        results: &[RetrievalResult<'_>],
        confidence: f32,
    ) -> AssistantReply {
        let query = request.query.as_str();
        let language = request.language;
        let topic = topic_from_query(query);

        let mut answer = format!(
            "{} I need a little more detail to give safe and useful guidance for {topic}. \
             Share symptoms, duration, age, and known conditions (for example diabetes, pregnancy, BP).",
            t(language, MessageKey::LowConfidence)
        );
        for result in results {
            answer.push_str(&format!("\n- {}: {}", result.entry.title, result.entry.summary()));
        }

        let mut next_steps = Vec::new();
        if results.is_empty() {
            let example: String = query.chars().take(80).collect();
            next_steps.push(format!(
                "Describe your main symptom and duration clearly (example: '{example}')."
            ));
            next_steps.push(
                "Mention age, pregnancy status, chronic diseases, and current medicines.".to_string(),
            );
        }
        next_steps.extend(verdict.next_steps);

        // caution 回答必须带上就医步骤
        let clinician = t(language, MessageKey::NoInfoStep1);
        if !next_steps.iter().any(|step| step == clinician) {
            next_steps.push(clinician.to_string());
        }

        AssistantReply {
            answer: self.with_hospital_section(answer, request, false).await,
            language,
            urgency: Urgency::Caution,
            disclaimer: t(language, MessageKey::Disclaimer).to_string(),
            next_steps,
            confidence: round_to(confidence, 2),
            sources: source_refs(results),
        }
    }

    async fn with_hospital_section(&self, answer: String, request: &ChatQuery, emergency: bool) -> String {
        match self.hospital_section(request, emergency).await {
            Some(section) => format!("{answer}\n\n{section}"),
            None => answer,
        }
    }

    /// 查询或位置中有邮编，或提供了位置时才查医院；超时或失败给出兜底段落
    async fn hospital_section(&self, request: &ChatQuery, emergency: bool) -> Option<String> {
        let hospitals = self.hospitals.as_ref()?;
        let location = request
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());
        let pincode = extract_pincode(&request.query).or_else(|| location.and_then(extract_pincode));

        let lookup = match (pincode, location) {
            (Some(pincode), _) => {
                tokio::time::timeout(
                    self.lookup_timeout,
                    hospitals.lookup_nearest(pincode, HOSPITAL_SECTION_LIMIT),
                )
                .await
            }
            (None, Some(location)) => {
                tokio::time::timeout(
                    self.lookup_timeout,
                    hospitals.lookup_nearest_by_location(location, HOSPITAL_SECTION_LIMIT),
                )
                .await
            }
            (None, None) => return None,
        };

        match lookup {
            Ok(Ok(lookup)) => format_hospital_section(&lookup, emergency),
            Ok(Err(e)) => {
                warn!("Hospital section unavailable: {}", e);
                Some(hospital_unavailable_section())
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.lookup_timeout.as_secs(),
                    "Hospital lookup timed out"
                );
                Some(hospital_unavailable_section())
            }
        }
    }
}

/// 从查询里挑最多四个有意义的词作为话题
pub fn topic_from_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| w.len() > 2 && !TOPIC_STOPWORDS.contains(w))
        .take(4)
        .collect();
    if words.is_empty() {
        "your health concern".to_string()
    } else {
        words.join(" ")
    }
}

/// 跟进步骤加上关键词触发的提醒，最多三条
pub fn build_next_steps(query: &str, language: Language) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut steps = vec![t(language, MessageKey::FollowUp).to_string()];

    let triggers: [(&[&str], &str); 3] = [
        (
            &["fever", "temperature", "cough", "cold", "sore throat"],
            "Track fever/breathing symptoms every 6-8 hours and keep hydration adequate.",
        ),
        (
            &["sugar", "diabetes", "bp", "pressure", "hypertension"],
            "Check sugar/BP readings regularly and carry the log to your next clinic visit.",
        ),
        (
            &["pregnan", "fetal", "trimester", "weeks"],
            "If pregnant, keep ANC visits on schedule and seek urgent care for bleeding or reduced fetal movement.",
        ),
    ];
    for (words, step) in triggers {
        if words.iter().any(|w| lowered.contains(w)) && !steps.iter().any(|s| s == step) {
            steps.push(step.to_string());
        }
    }

    steps.truncate(3);
    steps
}

fn compose_grounded_answer(results: &[RetrievalResult<'_>], query: &str, language: Language) -> String {
    let mut lines = vec![format!(
        "{} Topic: {}.",
        t(language, MessageKey::GroundedIntro),
        topic_from_query(query)
    )];
    lines.extend(
        results
            .iter()
            .take(3)
            .map(|r| format!("- {}: {}", r.entry.title, r.entry.summary())),
    );
    lines.join("\n")
}

fn source_refs(results: &[RetrievalResult<'_>]) -> Vec<SourceRef> {
    results
        .iter()
        .take(3)
        .map(|r| SourceRef {
            title: r.entry.title.clone(),
            source: r.entry.source_label.clone(),
            score: round_to(r.score, 2),
        })
        .collect()
}
