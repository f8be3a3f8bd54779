//! 核心数据模型模块
//!
//! 定义 Arogya 的核心数据结构：知识条目、疾病记录、政府计划、医院与分诊结论。

pub mod disease;
pub mod hospital;
pub mod knowledge;
pub mod language;
pub mod scheme;
pub mod triage;

pub use disease::DiseaseRecord;
pub use hospital::{Hospital, HospitalLookup};
pub use knowledge::{KnowledgeEntry, RawKnowledgeEntry};
pub use language::Language;
pub use scheme::Scheme;
pub use triage::{TriageVerdict, Urgency};
