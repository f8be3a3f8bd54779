//! 孕期指导

use once_cell::sync::Lazy;
use regex::Regex;

/// 孕期回答的固定置信度
pub const PREGNANCY_CONFIDENCE: f32 = 0.82;

pub const PREGNANCY_SOURCE: &str = "RMNCH+A maternal care guidance + National Health Portal";

const PREGNANCY_TERMS: &[&str] = &[
    "pregnant",
    "pregnancy",
    "trimester",
    "weeks pregnant",
    "months pregnant",
    "gestation",
    "7 months",
    "8 months",
    "9 months",
];

static MONTHS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([1-9]|1[0-2])\s*months?\b").expect("valid months pattern"));

static WEEKS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([1-4][0-9]|[1-9])\s*weeks?\b").expect("valid weeks pattern"));

/// 孕期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PregnancyStage {
    Unknown,
    SecondTrimester,
    ThirdTrimester,
}

impl PregnancyStage {
    pub fn from_months(months: Option<u32>) -> Self {
        match months {
            Some(m) if m >= 7 => PregnancyStage::ThirdTrimester,
            Some(m) if m >= 4 => PregnancyStage::SecondTrimester,
            _ => PregnancyStage::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PregnancyStage::Unknown => "pregnancy",
            PregnancyStage::SecondTrimester => "second trimester",
            PregnancyStage::ThirdTrimester => "third trimester",
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            PregnancyStage::ThirdTrimester => {
                "At this stage, monitor baby movements daily and keep regular ANC visits (usually every 2 weeks or as advised)."
            }
            PregnancyStage::SecondTrimester => {
                "Continue scheduled ANC visits, anemia prevention, and routine fetal growth monitoring."
            }
            PregnancyStage::Unknown => {
                "Register and continue antenatal care early with regular checkups at PHC/obstetric clinic."
            }
        }
    }
}

/// 孕期指导内容
#[derive(Debug, Clone, PartialEq)]
pub struct PregnancyGuidance {
    pub stage: PregnancyStage,
    pub answer: String,
    pub next_steps: Vec<String>,
    pub confidence: f32,
    pub source: &'static str,
}

/// 查询是否涉及怀孕
pub fn has_pregnancy_context(query: &str) -> bool {
    let lowered = query.to_lowercase();
    PREGNANCY_TERMS.iter().any(|term| lowered.contains(term))
}

/// 提取孕月；只有周数时按 4.35 周/月换算并限制在 1..=9
pub fn extract_months(query: &str) -> Option<u32> {
    let lowered = query.to_lowercase();
    if let Some(months) = MONTHS_PATTERN
        .captures(&lowered)
        .and_then(|caps| caps[1].parse::<u32>().ok())
    {
        return Some(months);
    }

    WEEKS_PATTERN
        .captures(&lowered)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|weeks| ((weeks as f32 / 4.35).round() as u32).clamp(1, 9))
}

/// 生成分阶段的孕期指导
pub fn build_guidance(query: &str) -> PregnancyGuidance {
    let stage = PregnancyStage::from_months(extract_months(query));

    let answer = [
        format!("Pregnancy support ({})", stage.label()),
        stage.guidance().to_string(),
        "Track blood pressure, swelling, headache, vision changes, bleeding, fever, or reduced fetal movement.".to_string(),
        "Use only doctor-approved medicines and supplements (iron, calcium, folic acid as prescribed).".to_string(),
        "Plan hospital delivery location, emergency transport, and keep MCP/ANC records ready.".to_string(),
    ]
    .join("\n");

    PregnancyGuidance {
        stage,
        answer,
        next_steps: vec![
            "Book/continue ANC checkup at nearest PHC/OB clinic this week.".to_string(),
            "If 7+ months, count fetal movements and seek urgent care if movement is reduced.".to_string(),
            "Emergency now if bleeding, severe headache, blurred vision, fits, breathlessness, or severe abdominal pain.".to_string(),
        ],
        confidence: PREGNANCY_CONFIDENCE,
        source: PREGNANCY_SOURCE,
    }
}
