//! 回答排版
//!
//! 结构化的八段式医疗指导，以及附加在回答末尾的医院查询段落。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::HospitalLookup;

pub const SECTION_RULE: &str = "------------------------------------------------------";

static PINCODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[1-9][0-9]{5}\b").expect("valid pincode pattern"));

static AGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:age\s*)?(\d{1,3})\s*(?:years?|yrs?|year old|year-old|yo|y/o)\b")
        .expect("valid age pattern")
});

const GOVERNMENT_MARKERS: &[&str] = &[
    "government",
    "govt",
    "district hospital",
    "civil hospital",
    "medical college",
    "aiims",
    "cg",
    "phc",
    "chc",
    "esi",
];

/// 名称中的词以关键词开头即视为该专科
const SPECIALTY_HINTS: &[(&str, &str)] = &[
    ("cancer", "Oncology"),
    ("oncology", "Oncology"),
    ("cardiac", "Cardiology"),
    ("heart", "Cardiology"),
    ("neuro", "Neurology"),
    ("ortho", "Orthopedics"),
    ("pediatric", "Pediatrics"),
    ("paediatric", "Pediatrics"),
    ("children", "Pediatrics"),
    ("maternity", "Obstetrics & Gynecology"),
    ("women", "Obstetrics & Gynecology"),
    ("eye", "Ophthalmology"),
    ("ent", "ENT"),
    ("kidney", "Nephrology/Urology"),
    ("renal", "Nephrology/Urology"),
    ("trauma", "Emergency/Trauma"),
    ("emergency", "Emergency/Trauma"),
];

/// 年龄段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Child,
    Teen,
    Adult,
    Elderly,
}

impl AgeGroup {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=12 => AgeGroup::Child,
            13..=18 => AgeGroup::Teen,
            19..=59 => AgeGroup::Adult,
            _ => AgeGroup::Elderly,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Child => "Child (0–12)",
            AgeGroup::Teen => "Teen (13–18)",
            AgeGroup::Adult => "Adult (19–59)",
            AgeGroup::Elderly => "Elderly (60+)",
        }
    }

    fn impact(&self, condition: &str) -> String {
        match self {
            AgeGroup::Child => format!(
                "{condition} in children can progress quickly due to lower physiological reserve; early pediatric review is important."
            ),
            AgeGroup::Teen => format!(
                "{condition} in teens may affect growth, school performance, and emotional wellbeing; age-appropriate counselling helps."
            ),
            AgeGroup::Elderly => format!(
                "{condition} in older adults can worsen faster with comorbidities (diabetes/BP/heart/kidney disease), so close monitoring is needed."
            ),
            AgeGroup::Adult => format!(
                "{condition} in adults may affect daily function and work capacity; timely diagnosis improves outcomes."
            ),
        }
    }
}

/// 年龄段：显式年龄优先，其次查询中的 "N years"，再次关键词，默认成人
pub fn derive_age_group(query: &str, age_years: Option<u32>) -> AgeGroup {
    if let Some(years) = age_years {
        return AgeGroup::from_years(years);
    }
    if let Some(years) = AGE_PATTERN
        .captures(query)
        .and_then(|caps| caps[1].parse::<u32>().ok())
    {
        return AgeGroup::from_years(years);
    }

    let lowered = query.to_lowercase();
    if mentions_any(&lowered, &["newborn", "infant", "child", "kid"]) {
        AgeGroup::Child
    } else if mentions_any(&lowered, &["teen", "adolescent"]) {
        AgeGroup::Teen
    } else if mentions_any(&lowered, &["elderly", "senior", "aged"]) {
        AgeGroup::Elderly
    } else {
        AgeGroup::Adult
    }
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

/// 八段式医疗指导
#[derive(Debug, Clone)]
pub struct MedicalGuidance<'a> {
    pub condition: &'a str,
    pub age_group: AgeGroup,
    pub overview: &'a str,
    pub treatment_summary: &'a str,
    pub medicines: &'a [String],
    pub lifestyle: &'a [String],
    pub avoid: &'a [String],
    pub red_flags: &'a [String],
    pub emotional_support: &'a str,
}

impl MedicalGuidance<'_> {
    pub fn render(&self) -> String {
        let medicines = cleaned(self.medicines, 5, "Doctor-guided medicine choice after confirmed diagnosis.");
        let lifestyle = cleaned(
            self.lifestyle,
            5,
            "Maintain hydration, rest, and follow-up with a licensed doctor.",
        );
        let avoid = cleaned(self.avoid, 4, "Avoid self-medication or delaying medical consultation.");
        let red_flags = cleaned(
            self.red_flags,
            5,
            "Severe breathing difficulty or altered consciousness.",
        );

        let mut lines = vec![
            SECTION_RULE.to_string(),
            String::new(),
            "MEDICAL GUIDANCE SECTION".to_string(),
            String::new(),
            "1. Condition Overview".to_string(),
            format!("- {}: {}", self.condition, self.overview),
            String::new(),
            "2. How it affects this age group".to_string(),
            format!("- Age group identified: {}", self.age_group.label()),
            format!("- {}", self.age_group.impact(self.condition)),
            String::new(),
            "3. Common treatment approaches (categories only)".to_string(),
            format!("- {}", self.treatment_summary),
            "- Categories: clinical evaluation, doctor-guided medicines, monitoring, specialist referral if needed.".to_string(),
            String::new(),
            "4. Medicine types commonly used (no dosage)".to_string(),
            "- Medicines commonly used (doctor-guided):".to_string(),
        ];
        lines.extend(medicines.iter().map(|item| format!("  - {item}")));

        lines.push(String::new());
        lines.push("5. Lifestyle recommendations".to_string());
        lines.extend(lifestyle.iter().map(|item| format!("- {item}")));

        lines.push(String::new());
        lines.push("6. What to avoid".to_string());
        lines.extend(avoid.iter().map(|item| format!("- {item}")));

        lines.push(String::new());
        lines.push("7. Warning signs requiring emergency care".to_string());
        lines.extend(red_flags.iter().map(|item| format!("- {item}")));

        lines.push(String::new());
        lines.push("8. Emotional and mental health support advice".to_string());
        lines.push(format!("- {}", self.emotional_support));
        lines.push(
            "- Speak with a qualified doctor/counsellor if fear, stress, or low mood is persistent."
                .to_string(),
        );

        lines.join("\n")
    }
}

fn cleaned<'a>(items: &'a [String], max: usize, fallback: &'a str) -> Vec<&'a str> {
    let kept: Vec<&str> = items
        .iter()
        .take(max)
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    if kept.is_empty() { vec![fallback] } else { kept }
}

/// 文本中的第一个六位邮编
pub fn extract_pincode(text: &str) -> Option<&str> {
    PINCODE_PATTERN.find(text).map(|m| m.as_str())
}

fn name_words(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// 按名称推断公立/私立
pub fn infer_hospital_type(name: &str) -> &'static str {
    let padded = format!(" {} ", name_words(name).join(" "));
    if GOVERNMENT_MARKERS
        .iter()
        .any(|marker| padded.contains(&format!(" {marker} ")))
    {
        "Government"
    } else {
        "Private"
    }
}

/// 按名称推断专科
pub fn infer_specialty(name: &str) -> &'static str {
    let words = name_words(name);
    SPECIALTY_HINTS
        .iter()
        .find(|(keyword, _)| words.iter().any(|w| w.starts_with(keyword)))
        .map_or("General", |(_, specialty)| *specialty)
}

/// 医院查询暂不可用时的段落
pub fn hospital_unavailable_section() -> String {
    format!(
        "{SECTION_RULE}\n\nHOSPITAL FINDER SECTION (India Only)\n\n\
         Hospital lookup is temporarily unavailable. Please call 108 or visit the nearest PHC/government hospital immediately."
    )
}

/// 最多列出五家医院；没有医院时返回 `None`
pub fn format_hospital_section(lookup: &HospitalLookup, emergency: bool) -> Option<String> {
    if lookup.hospitals.is_empty() {
        return None;
    }

    let mut lines = vec![
        SECTION_RULE.to_string(),
        String::new(),
        "HOSPITAL FINDER SECTION (India Only)".to_string(),
        String::new(),
        "Method: Input location/pincode → latitude/longitude → Haversine distance → nearest-first sorting.".to_string(),
    ];
    if emergency {
        lines.push(
            "Emergency note: Critical symptoms detected. Please proceed immediately to the nearest emergency-capable hospital."
                .to_string(),
        );
    }
    lines.push(String::new());
    lines.push("Top 5 nearest hospitals:".to_string());

    for (position, hospital) in lookup.hospitals.iter().take(5).enumerate() {
        let pincode = extract_pincode(&hospital.address)
            .or_else(|| (!lookup.pincode.is_empty()).then_some(lookup.pincode.as_str()))
            .unwrap_or("Not available");
        lines.push(format!("{}. Hospital Name: {}", position + 1, hospital.name));
        lines.push(format!("   - Type: {}", infer_hospital_type(&hospital.name)));
        lines.push(format!("   - Specialty: {}", infer_specialty(&hospital.name)));
        lines.push(format!("   - Full Address: {}", hospital.address));
        lines.push(format!("   - Pincode: {pincode}"));
        lines.push(format!("   - Distance in KM: {}", hospital.distance_km));
        lines.push(format!(
            "   - Contact: {}",
            hospital.contact.as_deref().unwrap_or("Not available")
        ));
    }

    Some(lines.join("\n"))
}
