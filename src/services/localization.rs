//! 本地化消息目录
//!
//! 只提供预置的模板文本，不做翻译。缺失的键回落到英语。

use crate::models::Language;

/// 消息键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Disclaimer,
    CriticalHeader,
    CriticalBody,
    CriticalStep1,
    CriticalStep2,
    CriticalStep3,
    NoInfo,
    NoInfoStep1,
    NoInfoStep2,
    GroundedIntro,
    FollowUp,
    LowConfidence,
    Rephrase,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::Disclaimer => "disclaimer",
            MessageKey::CriticalHeader => "critical_header",
            MessageKey::CriticalBody => "critical_body",
            MessageKey::CriticalStep1 => "critical_steps_1",
            MessageKey::CriticalStep2 => "critical_steps_2",
            MessageKey::CriticalStep3 => "critical_steps_3",
            MessageKey::NoInfo => "no_info",
            MessageKey::NoInfoStep1 => "no_info_step_1",
            MessageKey::NoInfoStep2 => "no_info_step_2",
            MessageKey::GroundedIntro => "grounded_intro",
            MessageKey::FollowUp => "follow_up",
            MessageKey::LowConfidence => "low_confidence",
            MessageKey::Rephrase => "rephrase",
        }
    }
}

type Catalog = &'static [(MessageKey, &'static str)];

const EN: Catalog = &[
    (MessageKey::Disclaimer, "This is preliminary health guidance, not a doctor replacement."),
    (MessageKey::CriticalHeader, "⚠️ Critical symptoms detected."),
    (
        MessageKey::CriticalBody,
        "Please contact emergency services or visit the nearest health center immediately.",
    ),
    (MessageKey::CriticalStep1, "Call local emergency support (ambulance/108)."),
    (MessageKey::CriticalStep2, "Do not delay. Reach the nearest hospital/PHC now."),
    (MessageKey::CriticalStep3, "Carry any current prescriptions and patient records."),
    (
        MessageKey::NoInfo,
        "I do not have enough verified information for this specific question.",
    ),
    (MessageKey::NoInfoStep1, "Consult an ASHA worker, ANM, or a licensed doctor."),
    (MessageKey::NoInfoStep2, "Use eSanjeevani or a nearby PHC for clinical advice."),
    (MessageKey::GroundedIntro, "Based on verified health resources:"),
    (
        MessageKey::FollowUp,
        "If symptoms worsen or persist, seek in-person medical care.",
    ),
    (
        MessageKey::LowConfidence,
        "Low confidence: the verified sources only partly match this question. Please confirm with a qualified clinician.",
    ),
    (
        MessageKey::Rephrase,
        "I could not find any recognisable health terms in this question. Please rephrase it with your main symptom or topic.",
    ),
];

const HI: Catalog = &[
    (MessageKey::Disclaimer, "यह प्रारंभिक स्वास्थ्य मार्गदर्शन है, डॉक्टर का विकल्प नहीं।"),
    (MessageKey::CriticalHeader, "⚠️ गंभीर लक्षण पाए गए हैं।"),
    (
        MessageKey::CriticalBody,
        "कृपया तुरंत आपातकालीन सेवा से संपर्क करें या नज़दीकी स्वास्थ्य केंद्र जाएं।",
    ),
    (MessageKey::CriticalStep1, "स्थानीय आपातकालीन सहायता (एम्बुलेंस/108) पर कॉल करें।"),
    (MessageKey::CriticalStep2, "देरी न करें। तुरंत नज़दीकी अस्पताल/PHC जाएं।"),
    (MessageKey::CriticalStep3, "चल रही दवाइयों और मेडिकल रिकॉर्ड साथ लें।"),
    (MessageKey::NoInfo, "इस प्रश्न के लिए मेरे पास पर्याप्त सत्यापित जानकारी नहीं है।"),
    (MessageKey::NoInfoStep1, "ASHA कार्यकर्ता, ANM या पंजीकृत डॉक्टर से सलाह लें।"),
    (
        MessageKey::NoInfoStep2,
        "क्लिनिकल सलाह के लिए eSanjeevani या नज़दीकी PHC का उपयोग करें।",
    ),
    (MessageKey::GroundedIntro, "सत्यापित स्वास्थ्य स्रोतों के आधार पर:"),
    (
        MessageKey::FollowUp,
        "लक्षण बढ़ें या बने रहें तो व्यक्तिगत रूप से डॉक्टर से मिलें।",
    ),
];

const TA: Catalog = &[
    (
        MessageKey::Disclaimer,
        "இது தொடக்கநிலை சுகாதார வழிகாட்டல்; மருத்துவருக்குப் பதிலல்ல.",
    ),
    (MessageKey::CriticalHeader, "⚠️ ஆபத்தான அறிகுறிகள் கண்டறியப்பட்டன."),
    (
        MessageKey::CriticalBody,
        "உடனே அவசர சேவையை தொடர்புகொள்ளவும் அல்லது அருகிலுள்ள மருத்துவமனைக்கு செல்லவும்.",
    ),
    (MessageKey::CriticalStep1, "உள்ளூர் அவசர உதவிக்கு (ஆம்புலன்ஸ்/108) அழைக்கவும்."),
    (
        MessageKey::CriticalStep2,
        "தாமதிக்காமல் அருகிலுள்ள மருத்துவமனை/PHC-க்கு செல்லவும்.",
    ),
    (
        MessageKey::CriticalStep3,
        "பயன்பாட்டில் உள்ள மருந்து மற்றும் மருத்துவ பதிவுகளை எடுத்துச் செல்லவும்.",
    ),
    (
        MessageKey::NoInfo,
        "இந்த கேள்விக்கான உறுதி செய்யப்பட்ட தகவல் போதுமானதாக இல்லை.",
    ),
    (
        MessageKey::NoInfoStep1,
        "ASHA பணியாளர், ANM அல்லது தகுதி பெற்ற மருத்துவரிடம் ஆலோசிக்கவும்.",
    ),
    (
        MessageKey::NoInfoStep2,
        "eSanjeevani அல்லது அருகிலுள்ள PHC மூலம் ஆலோசனை பெறவும்.",
    ),
    (
        MessageKey::GroundedIntro,
        "உறுதி செய்யப்பட்ட சுகாதார ஆதாரங்களின் அடிப்படையில்:",
    ),
    (
        MessageKey::FollowUp,
        "அறிகுறிகள் நீடித்தால் நேரடியாக மருத்துவரை அணுகவும்.",
    ),
];

const TE: Catalog = &[
    (
        MessageKey::Disclaimer,
        "ఇది ప్రాథమిక ఆరోగ్య మార్గదర్శకం మాత్రమే; వైద్యుడికి ప్రత్యామ్నాయం కాదు.",
    ),
    (MessageKey::CriticalHeader, "⚠️ అత్యవసర లక్షణాలు గుర్తించబడ్డాయి."),
    (
        MessageKey::CriticalBody,
        "దయచేసి వెంటనే అత్యవసర సేవలను సంప్రదించండి లేదా సమీప ఆరోగ్య కేంద్రానికి వెళ్లండి.",
    ),
    (
        MessageKey::CriticalStep1,
        "స్థానిక అత్యవసర సేవ (అంబులెన్స్/108)కు కాల్ చేయండి.",
    ),
    (
        MessageKey::CriticalStep2,
        "ఆలస్యం చేయకుండా సమీప ఆసుపత్రి/PHC కి వెళ్లండి.",
    ),
    (
        MessageKey::CriticalStep3,
        "ప్రస్తుతం వాడుతున్న మందులు మరియు రికార్డులు వెంట తీసుకెళ్లండి.",
    ),
    (MessageKey::NoInfo, "ఈ ప్రశ్నకు సరిపడిన ధృవీకరించిన సమాచారం నాకు లేదు."),
    (
        MessageKey::NoInfoStep1,
        "ASHA వర్కర్, ANM లేదా లైసెన్స్ ఉన్న వైద్యుడిని సంప్రదించండి.",
    ),
    (
        MessageKey::NoInfoStep2,
        "క్లినికల్ సలహా కోసం eSanjeevani లేదా సమీప PHC ను ఉపయోగించండి.",
    ),
    (MessageKey::GroundedIntro, "ధృవీకరించిన ఆరోగ్య వనరుల ఆధారంగా:"),
    (
        MessageKey::FollowUp,
        "లక్షణాలు కొనసాగితే ప్రత్యక్ష వైద్య సహాయం పొందండి.",
    ),
];

const BN: Catalog = &[
    (MessageKey::Disclaimer, "এটি প্রাথমিক স্বাস্থ্য সহায়তা, ডাক্তারের বিকল্প নয়।"),
    (MessageKey::CriticalHeader, "⚠️ গুরুতর উপসর্গ শনাক্ত হয়েছে।"),
    (
        MessageKey::CriticalBody,
        "দয়া করে দ্রুত জরুরি পরিষেবায় যোগাযোগ করুন বা নিকটস্থ স্বাস্থ্যকেন্দ্রে যান।",
    ),
    (MessageKey::CriticalStep1, "স্থানীয় জরুরি নম্বরে (অ্যাম্বুলেন্স/১০৮) ফোন করুন।"),
    (MessageKey::CriticalStep2, "দেরি না করে নিকটস্থ হাসপাতাল/PHC-তে যান।"),
    (MessageKey::CriticalStep3, "চলমান ওষুধ ও চিকিৎসা নথি সঙ্গে নিন।"),
    (
        MessageKey::NoInfo,
        "এই প্রশ্নের জন্য আমার কাছে পর্যাপ্ত যাচাই করা তথ্য নেই।",
    ),
    (MessageKey::NoInfoStep1, "ASHA কর্মী, ANM বা নিবন্ধিত ডাক্তারের পরামর্শ নিন।"),
    (
        MessageKey::NoInfoStep2,
        "ক্লিনিকাল পরামর্শের জন্য eSanjeevani বা নিকটস্থ PHC ব্যবহার করুন।",
    ),
    (MessageKey::GroundedIntro, "যাচাইকৃত স্বাস্থ্য উৎসের ভিত্তিতে:"),
    (MessageKey::FollowUp, "উপসর্গ বাড়লে বা থাকলে সরাসরি চিকিৎসা নিন।"),
];

fn catalog(language: Language) -> Catalog {
    match language {
        Language::En => EN,
        Language::Hi => HI,
        Language::Ta => TA,
        Language::Te => TE,
        Language::Bn => BN,
    }
}

fn lookup(catalog: Catalog, key: MessageKey) -> Option<&'static str> {
    catalog
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, text)| *text)
}

/// 取本地化文本，缺失时回落到英语
pub fn t(language: Language, key: MessageKey) -> &'static str {
    lookup(catalog(language), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or_else(|| key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [MessageKey; 13] = [
        MessageKey::Disclaimer,
        MessageKey::CriticalHeader,
        MessageKey::CriticalBody,
        MessageKey::CriticalStep1,
        MessageKey::CriticalStep2,
        MessageKey::CriticalStep3,
        MessageKey::NoInfo,
        MessageKey::NoInfoStep1,
        MessageKey::NoInfoStep2,
        MessageKey::GroundedIntro,
        MessageKey::FollowUp,
        MessageKey::LowConfidence,
        MessageKey::Rephrase,
    ];

    #[test]
    fn test_english_catalog_is_complete() {
        for key in ALL_KEYS {
            assert!(lookup(EN, key).is_some(), "missing {}", key.as_str());
        }
    }

    #[test]
    fn test_localized_text() {
        assert_eq!(
            t(Language::Hi, MessageKey::GroundedIntro),
            "सत्यापित स्वास्थ्य स्रोतों के आधार पर:"
        );
    }

    #[test]
    fn test_missing_key_falls_back_to_english() {
        assert_eq!(
            t(Language::Ta, MessageKey::LowConfidence),
            t(Language::En, MessageKey::LowConfidence)
        );
    }
}
