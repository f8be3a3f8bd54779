//! 服务模块

pub mod assistant;
pub mod disease;
pub mod guidance;
pub mod hospitals;
pub mod localization;
pub mod pregnancy;
pub mod red_flags;
pub mod retrieval;
pub mod schemes;
pub mod triage;

pub use assistant::{AssistantReply, ChatMode, ChatQuery, HealthAssistant};
pub use disease::{DiseaseMatch, DiseaseMatcher, MatchTier};
pub use hospitals::{HospitalError, HospitalLocator, HospitalService, create_hospital_service};
pub use localization::{MessageKey, t};
pub use red_flags::{LanguagePack, RedFlagCatalog, RedFlagGroup};
pub use retrieval::{
    LexicalRetriever, Retrieval, RetrievalResult, RetrievalService, create_retrieval_service,
};
pub use schemes::{SchemeAnswer, SchemeNavigator, SourceRef};
pub use triage::{TriageLayer, TriageService, create_triage_service};
