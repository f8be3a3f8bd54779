use anyhow::{Context, Result};
use arogya::api::{self, app_state::AppState};
use arogya::config::ConfigLoader;
use arogya::observability::{AppMetrics, HealthCheckResult, ObservabilityState, init_tracing};
use arogya::services::{
    DiseaseMatcher, HealthAssistant, HospitalService, SchemeNavigator, create_hospital_service,
    create_retrieval_service, create_triage_service,
};
use arogya::storage::{KnowledgeStore, load_disease_records, load_schemes};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;
    let _log_guard = init_tracing(&config.logging).context("failed to initialize logging")?;

    info!("Starting Arogya ({})...", config.environment);

    let store = Arc::new(
        KnowledgeStore::load(&config.data.knowledge_paths)
            .context("failed to load knowledge sources")?,
    );
    info!(
        "Knowledge store loaded: {} entries from {} sources",
        store.len(),
        store.sources().len()
    );

    let observability_metrics = Arc::new(AppMetrics::new().context("failed to register metrics")?);
    let observability = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION"),
        observability_metrics.clone(),
    ));
    observability
        .add_health_check(HealthCheckResult::healthy(
            "knowledge_store",
            format!("{} entries", store.len()),
        ))
        .await;

    let diseases = match load_disease_records(&config.data.disease_path) {
        Ok(records) => {
            info!("Disease library loaded: {} records", records.len());
            observability
                .add_health_check(HealthCheckResult::healthy(
                    "disease_library",
                    format!("{} records", records.len()),
                ))
                .await;
            records
        }
        Err(e) => {
            warn!("Disease library unavailable: {}", e);
            observability
                .add_health_check(HealthCheckResult::unhealthy("disease_library", e.to_string()))
                .await;
            Vec::new()
        }
    };
    let disease_matcher = Arc::new(DiseaseMatcher::new(diseases, &config.disease));

    let schemes = match load_schemes(&config.data.schemes_path) {
        Ok(schemes) => {
            info!("Scheme list loaded: {} schemes", schemes.len());
            schemes
        }
        Err(e) => {
            warn!("Scheme list unavailable: {}", e);
            Vec::new()
        }
    };
    let scheme_navigator = Arc::new(SchemeNavigator::new(schemes));

    let hospital_service: Option<Arc<dyn HospitalService>> = if config.hospital.enabled {
        match create_hospital_service(&config.hospital) {
            Ok(service) => {
                info!("Hospital locator initialized");
                Some(Arc::from(service))
            }
            Err(e) => {
                warn!("Hospital locator disabled: {}", e);
                None
            }
        }
    } else {
        info!("Hospital locator disabled by configuration");
        None
    };

    let retrieval = Arc::from(create_retrieval_service(store.clone(), &config.retrieval));
    let triage = Arc::from(create_triage_service(&config.triage));
    let mut assistant = HealthAssistant::new(
        retrieval,
        disease_matcher.clone(),
        triage,
        scheme_navigator.clone(),
    );
    if let Some(hospitals) = &hospital_service {
        assistant = assistant.with_hospitals(
            hospitals.clone(),
            Duration::from_secs(config.hospital.chat_lookup_timeout),
        );
    }
    info!("Health assistant initialized");

    let app_state = AppState::new(
        assistant,
        disease_matcher,
        scheme_navigator,
        hospital_service,
        observability_metrics,
        config.clone(),
    );
    let router = api::create_router(app_state, observability);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("Arogya stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
