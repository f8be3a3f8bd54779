#[cfg(test)]
mod router_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::AppConfig;
    use crate::models::{DiseaseRecord, Hospital, HospitalLookup, KnowledgeEntry, Scheme};
    use crate::observability::{AppMetrics, ObservabilityState};
    use crate::services::hospitals::MockHospitalService;
    use crate::services::{
        DiseaseMatcher, HealthAssistant, HospitalError, HospitalService, LexicalRetriever,
        SchemeNavigator, TriageLayer,
    };
    use crate::storage::KnowledgeStore;

    fn seed_lookup() -> HospitalLookup {
        HospitalLookup {
            pincode: "560001".into(),
            location: "Bengaluru, Karnataka".into(),
            source: "Seed hospital dataset".into(),
            cached: true,
            hospitals: vec![Hospital {
                name: "Bowring and Lady Curzon Hospital".into(),
                distance_km: 1.4,
                address: "Shivajinagar, Bengaluru".into(),
                latitude: 12.9829,
                longitude: 77.6044,
                source: "Seed hospital dataset".into(),
                contact: None,
            }],
        }
    }

    fn app(hospitals: Option<Arc<dyn HospitalService>>) -> (Router, Arc<AppMetrics>) {
        app_with_config(hospitals, AppConfig::development())
    }

    fn app_with_config(
        hospitals: Option<Arc<dyn HospitalService>>,
        config: AppConfig,
    ) -> (Router, Arc<AppMetrics>) {
        let store = Arc::new(KnowledgeStore::from_entries(vec![
            KnowledgeEntry::new(
                "faq-fever-headache",
                "Fever and headache care",
                "Rest, drink fluids and use paracetamol only as advised by a doctor.",
                "National Health Portal",
            ),
            KnowledgeEntry::new(
                "faq-ors",
                "Oral rehydration",
                "Oral rehydration solution replaces fluids lost in diarrhoea.",
                "WHO",
            ),
        ]));
        let retrieval = Arc::new(LexicalRetriever::new(store, &config.retrieval));

        let mut dengue = DiseaseRecord::new("dis-dengue", "Dengue", "Infectious")
            .with_aliases(["dengue fever"]);
        dengue.overview = "A mosquito-borne viral infection.".into();
        dengue.medicine_guidance = vec!["Paracetamol for fever (doctor-guided)".into()];
        let diseases = Arc::new(DiseaseMatcher::new(vec![dengue], &config.disease));

        let schemes = Arc::new(SchemeNavigator::new(vec![Scheme {
            id: "pmjay".into(),
            name: "Ayushman Bharat PM-JAY".into(),
            keywords: vec!["ayushman".into()],
            summaries: HashMap::from([("en".to_string(), "Cashless cover.".to_string())]),
            next_steps: vec!["Check eligibility at a CSC".into()],
            source: "National Health Authority".into(),
        }]));

        let triage = Arc::new(TriageLayer::with_builtin_catalog(&config.triage));
        let assistant =
            HealthAssistant::new(retrieval, diseases.clone(), triage, schemes.clone());

        let metrics = Arc::new(AppMetrics::new().unwrap());
        let observability = Arc::new(ObservabilityState::new("test", metrics.clone()));
        let state = AppState::new(assistant, diseases, schemes, hospitals, metrics.clone(), config);

        (create_router(state, observability), metrics)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn chat_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_emergency() {
        let (app, metrics) = app(None);
        let response = app
            .oneshot(chat_request(json!({
                "query": "My uncle has chest pain and difficulty breathing right now.",
                "language": "en"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        let body = body_json(response).await;
        assert_eq!(body["urgency"], "emergency");
        assert!(body["next_steps"].as_array().unwrap().len() >= 2);
        assert!(metrics.gather().unwrap().contains("arogya_chat_requests_total"));
    }

    #[tokio::test]
    async fn test_chat_routine_with_unknown_language() {
        let (app, _) = app(None);
        let response = app
            .oneshot(chat_request(json!({
                "query": "headache and fever care",
                "language": "fr",
                "mode": "voice"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["language"], "en");
        assert_eq!(body["urgency"], "routine");
        assert!(
            body["answer"]
                .as_str()
                .unwrap()
                .starts_with("Based on verified health resources")
        );
        assert_eq!(body["sources"][0]["title"], "Fever and headache care");
    }

    #[tokio::test]
    async fn test_chat_rejects_short_query() {
        let (app, _) = app(None);
        let response = app
            .oneshot(chat_request(json!({"query": "a"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_chat_query_limit_follows_config() {
        let query = "headache and fever care ".repeat(38);
        assert!(query.trim().chars().count() > 800);

        let (app_default, _) = app(None);
        let response = app_default
            .oneshot(chat_request(json!({"query": query})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut config = AppConfig::development();
        config.security.max_query_length = 1000;
        let (app_raised, _) = app_with_config(None, config);
        let response = app_raised
            .oneshot(chat_request(json!({"query": query})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_requires_json() {
        let (app, _) = app(None);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("Content-Type", "text/plain")
                    .body(Body::from("fever"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_disease_search() {
        let (app, _) = app(None);
        let response = app
            .oneshot(get("/diseases/search?q=dengue&limit=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["name"], "Dengue");
        assert_eq!(matches[0]["match_type"], "exact_name");
        assert!(!matches[0]["medicine_guidance"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disease_search_limit_bounds() {
        let (app, _) = app(None);
        let response = app
            .oneshot(get("/diseases/search?q=dengue&limit=9"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_scheme_lookup() {
        let (app, _) = app(None);
        let response = app
            .clone()
            .oneshot(get("/schemes?q=ayushman%20card&language=hi"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["language"], "hi");
        // no Hindi summary configured, falls back to English
        assert!(body["answer"].as_str().unwrap().contains("Cashless cover."));
        assert_eq!(body["sources"][0]["source"], "National Health Authority");

        let response = app.oneshot(get("/schemes?q=qwxz%20ptlm")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_pincode_never_reaches_service() {
        let mut mock = MockHospitalService::new();
        mock.expect_lookup_nearest().never();
        let (app, _) = app(Some(Arc::new(mock)));

        let response = app
            .oneshot(get("/hospitals/nearest?pincode=12345"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearest_hospitals() {
        let mut mock = MockHospitalService::new();
        mock.expect_lookup_nearest()
            .withf(|pincode, limit| pincode == "560001" && *limit == 2)
            .times(1)
            .returning(|_, _| Ok(seed_lookup()));
        let (app, metrics) = app(Some(Arc::new(mock)));

        let response = app
            .oneshot(get("/hospitals/nearest?pincode=560001&limit=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["cached"], true);
        assert_eq!(body["hospitals"][0]["name"], "Bowring and Lady Curzon Hospital");
        assert!(
            metrics
                .gather()
                .unwrap()
                .contains("arogya_hospital_lookups_total{outcome=\"cached\"} 1")
        );
    }

    #[tokio::test]
    async fn test_hospital_upstream_failure_is_bad_gateway() {
        let mut mock = MockHospitalService::new();
        mock.expect_lookup_nearest()
            .returning(|_, _| Err(HospitalError::LookupFailed("upstream down".into())));
        let (app, _) = app(Some(Arc::new(mock)));

        let response = app
            .oneshot(get("/hospitals/nearest?pincode=110001"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_hospital_lookup_disabled() {
        let (app, _) = app(None);
        let response = app
            .oneshot(get("/hospitals/nearest?pincode=110001"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_observability_routes_are_merged() {
        let (app, _) = app(None);
        let response = app.clone().oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/version")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["version"], "test");
    }
}
