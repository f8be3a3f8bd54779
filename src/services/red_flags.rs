//! 红旗症状词表
//!
//! 每种语言一个词表包，包内症状组按优先级排列。一个模式由若干词条组成，
//! 所有词条都以不区分大小写的子串形式出现在查询中时，该模式命中。

use std::collections::HashMap;

use super::localization::{MessageKey, t};
use crate::models::Language;

/// 红旗症状组
#[derive(Debug, Clone, PartialEq)]
pub struct RedFlagGroup {
    /// 组标识，用于日志和指标
    pub id: String,
    /// 任一模式命中即整组命中
    pub patterns: Vec<Vec<String>>,
    /// 固定的紧急回答
    pub override_answer: String,
    /// 紧急后续步骤
    pub next_steps: Vec<String>,
}

impl RedFlagGroup {
    pub fn new<I, P, S>(
        id: impl Into<String>,
        patterns: I,
        override_answer: impl Into<String>,
        next_steps: Vec<String>,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.into(),
            patterns: patterns
                .into_iter()
                .map(|pattern| {
                    pattern
                        .into_iter()
                        .map(|term| term.as_ref().to_lowercase())
                        .collect()
                })
                .collect(),
            override_answer: override_answer.into(),
            next_steps,
        }
    }

    /// 返回第一个命中模式的词条
    ///
    /// `lowered_query` 必须已经小写化。
    pub fn find_match(&self, lowered_query: &str) -> Option<&[String]> {
        self.patterns
            .iter()
            .filter(|pattern| !pattern.is_empty())
            .find(|pattern| pattern.iter().all(|term| lowered_query.contains(term.as_str())))
            .map(Vec::as_slice)
    }
}

/// 单一语言的红旗症状包
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguagePack {
    pub groups: Vec<RedFlagGroup>,
}

impl LanguagePack {
    pub fn new(groups: Vec<RedFlagGroup>) -> Self {
        Self { groups }
    }
}

/// 语言 → 红旗症状包
#[derive(Debug, Clone, Default)]
pub struct RedFlagCatalog {
    packs: HashMap<Language, LanguagePack>,
}

impl RedFlagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pack(mut self, language: Language, pack: LanguagePack) -> Self {
        self.packs.insert(language, pack);
        self
    }

    pub fn pack(&self, language: Language) -> Option<&LanguagePack> {
        self.packs.get(&language)
    }

    /// 扫描顺序：请求语言，然后英语
    pub fn scan_order(&self, language: Language) -> impl Iterator<Item = &LanguagePack> {
        let fallback = (language != Language::En).then_some(Language::En);
        std::iter::once(language)
            .chain(fallback)
            .filter_map(|lang| self.packs.get(&lang))
    }

    /// 内置词表
    pub fn builtin() -> Self {
        let mut catalog = Self::new().with_pack(Language::En, english_pack());
        for (language, keywords) in [
            (
                Language::Hi,
                &["सीने में दर्द", "सांस लेने में दिक्कत", "बेहोश", "दौरा", "स्ट्रोक", "ज्यादा खून"][..],
            ),
            (
                Language::Ta,
                &["மார்பு வலி", "மூச்சுத்திணறல்", "மயக்கம்", "வலிப்பு", "பக்கவாதம்"][..],
            ),
            (
                Language::Te,
                &[
                    "ఛాతి నొప్పి",
                    "శ్వాస తీసుకోవడంలో ఇబ్బంది",
                    "అపస్మారక స్థితి",
                    "ఫిట్స్",
                    "స్ట్రోక్",
                ][..],
            ),
            (
                Language::Bn,
                &["বুকে ব্যথা", "শ্বাসকষ্ট", "অজ্ঞান", "খিঁচুনি", "স্ট্রোক"][..],
            ),
        ] {
            catalog = catalog.with_pack(language, keyword_pack(language, keywords));
        }
        catalog
    }
}

/// 本地化的紧急步骤
pub fn emergency_steps(language: Language) -> Vec<String> {
    [
        MessageKey::CriticalStep1,
        MessageKey::CriticalStep2,
        MessageKey::CriticalStep3,
    ]
    .into_iter()
    .map(|key| t(language, key).to_string())
    .collect()
}

/// 本地化的通用紧急回答
pub fn generic_override(language: Language) -> String {
    format!(
        "{} {}",
        t(language, MessageKey::CriticalHeader),
        t(language, MessageKey::CriticalBody)
    )
}

fn keyword_pack(language: Language, keywords: &[&str]) -> LanguagePack {
    LanguagePack::new(vec![RedFlagGroup::new(
        "critical_symptoms",
        keywords.iter().map(|keyword| [*keyword]),
        generic_override(language),
        emergency_steps(language),
    )])
}

fn group(id: &str, patterns: &[&[&str]], answer: &str, extra: &[&str]) -> RedFlagGroup {
    let mut next_steps = emergency_steps(Language::En);
    next_steps.extend(extra.iter().map(|step| step.to_string()));
    RedFlagGroup::new(id, patterns.iter().map(|p| p.iter()), answer, next_steps)
}

/// 儿童称谓
const CHILD_NOUNS: &[&str] = &["child", "baby", "son", "daughter", "kid", "toddler"];

/// 与儿童称谓同时出现时构成危险信号
const CHILD_DANGER_CUES: &[&str] = &[
    "not waking",
    "unresponsive",
    "not responding",
    "convulsion",
    "very drowsy",
];

fn pediatric_group(fixed: &[&[&str]]) -> RedFlagGroup {
    let mut patterns: Vec<Vec<&str>> = CHILD_NOUNS
        .iter()
        .flat_map(|noun| CHILD_DANGER_CUES.iter().map(move |cue| vec![*noun, *cue]))
        .collect();
    patterns.extend(fixed.iter().map(|pattern| pattern.to_vec()));

    let mut next_steps = emergency_steps(Language::En);
    next_steps.push(
        "Do not give any medicine by mouth to a child who cannot wake or swallow.".to_string(),
    );
    RedFlagGroup::new(
        "pediatric_danger",
        patterns,
        "⚠️ Critical symptoms detected. These are danger signs in a child. \
         Take the child to the nearest hospital or call 108 immediately. \
         Keep the child warm and continue breastfeeding if the child can swallow.",
        next_steps,
    )
}

fn english_pack() -> LanguagePack {
    LanguagePack::new(vec![
        group(
            "chest_pain",
            &[
                &["chest pain"],
                &["chest pressure"],
                &["chest tightness"],
                &["heart attack"],
            ],
            "⚠️ Critical symptoms detected. Chest pain can be a sign of a heart attack. \
             Call 108 or go to the nearest emergency department immediately. \
             Keep the person seated and at rest while help arrives.",
            &["Do not let the person walk or drive to the hospital alone."],
        ),
        group(
            "breathing_difficulty",
            &[
                &["difficulty breathing"],
                &["shortness of breath"],
                &["cannot breathe"],
                &["can't breathe"],
                &["not breathing"],
                &["trouble breathing"],
                &["gasping"],
            ],
            "⚠️ Critical symptoms detected. Severe breathing difficulty needs emergency care now. \
             Call 108 or reach the nearest hospital immediately. \
             Sit upright and loosen tight clothing while waiting for help.",
            &["Keep the person upright and away from smoke or dust."],
        ),
        pediatric_group(&[
            &["baby", "not feeding"],
            &["infant", "not feeding"],
            &["newborn", "not feeding"],
            &["baby", "turning blue"],
        ]),
        group(
            "neurological_emergency",
            &[
                &["unconscious"],
                &["unresponsive"],
                &["not waking"],
                &["not responding"],
                &["collapsed"],
                &["seizure"],
                &["stroke"],
                &["convulsion"],
                &["fainted"],
                &["face drooping"],
                &["slurred speech"],
            ],
            "⚠️ Critical symptoms detected. Loss of consciousness, seizures or stroke signs need \
             emergency care now. Call 108 immediately and note the time the symptoms started.",
            &["Turn an unconscious person on their side and do not put anything in their mouth."],
        ),
        group(
            "heavy_bleeding",
            &[
                &["severe bleeding"],
                &["heavy bleeding"],
                &["bleeding", "won't stop"],
                &["bleeding", "not stopping"],
                &["vomiting blood"],
                &["coughing blood"],
                &["coughing up blood"],
            ],
            "⚠️ Critical symptoms detected. Heavy bleeding is an emergency. \
             Apply firm pressure with a clean cloth and call 108 or reach the nearest hospital now.",
            &["Keep pressing on the wound until trained help takes over."],
        ),
        group(
            "self_harm",
            &[
                &["suicidal"],
                &["suicide"],
                &["kill myself"],
                &["end my life"],
                &["self harm"],
                &["self-harm"],
                &["want to die"],
            ],
            "⚠️ You deserve support right now. If you are thinking about harming yourself, \
             please call 108 or the Tele-MANAS helpline 14416, or go to the nearest hospital. \
             Stay with someone you trust.",
            &["Call Tele-MANAS (14416) to talk to a trained counsellor at any hour."],
        ),
    ])
}
