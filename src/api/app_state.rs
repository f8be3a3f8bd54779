use crate::config::AppConfig;
use crate::observability::AppMetrics;
use crate::security::validation::RequestValidator;
use crate::services::{DiseaseMatcher, HealthAssistant, HospitalService, SchemeNavigator};
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Chat orchestration over triage, schemes, diseases and retrieval
    pub assistant: Arc<HealthAssistant>,
    /// Disease library used by the search endpoint
    pub disease_matcher: Arc<DiseaseMatcher>,
    /// Government scheme navigator
    pub scheme_navigator: Arc<SchemeNavigator>,
    /// Nearest hospital lookup, absent when disabled in config
    pub hospital_service: Option<Arc<dyn HospitalService>>,
    /// Field-level request validator
    pub validator: Arc<RequestValidator>,
    /// Prometheus metrics
    pub metrics: Arc<AppMetrics>,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("assistant", &"Arc<HealthAssistant>")
            .field("disease_matcher", &self.disease_matcher.len())
            .field("scheme_navigator", &self.scheme_navigator.schemes().len())
            .field(
                "hospital_service",
                &self.hospital_service.as_ref().map(|_| "Arc<dyn HospitalService>"),
            )
            .field("validator", &self.validator)
            .field("metrics", &"Arc<AppMetrics>")
            .field("config", &self.config.app_name)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        assistant: HealthAssistant,
        disease_matcher: Arc<DiseaseMatcher>,
        scheme_navigator: Arc<SchemeNavigator>,
        hospital_service: Option<Arc<dyn HospitalService>>,
        metrics: Arc<AppMetrics>,
        config: AppConfig,
    ) -> Self {
        let validator = RequestValidator::new()
            .with_max_field_length(config.security.max_query_length)
            .with_max_body_size(config.server.max_request_size);
        Self {
            assistant: Arc::new(assistant),
            disease_matcher,
            scheme_navigator,
            hospital_service,
            validator: Arc::new(validator),
            metrics,
            config: Arc::new(config),
        }
    }
}
