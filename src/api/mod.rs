//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::app_state::AppState;
use crate::observability::{ObservabilityState, create_observability_router, metrics_middleware};
use crate::security::middleware::{security_headers_middleware, validation_middleware};

/// 空列表时允许任意来源
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_router(app_state: AppState, observability: Arc<ObservabilityState>) -> Router {
    let validator = app_state.validator.clone();
    let metrics = app_state.metrics.clone();
    let max_body_size = app_state.config.server.max_request_size;
    let request_timeout = Duration::from_secs(app_state.config.server.request_timeout.max(1));
    let security_headers = app_state.config.security.security_headers;
    let cors = cors_layer(&app_state.config.security.allowed_origins);

    let api = Router::new()
        .merge(routes::chat_routes::create_chat_router())
        .merge(routes::disease_routes::create_disease_router())
        .merge(routes::scheme_routes::create_scheme_router())
        .merge(routes::hospital_routes::create_hospital_router())
        .layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
            let validator = validator.clone();
            async move { validation_middleware(req, next, validator, max_body_size).await }
        }))
        .with_state(app_state);

    let router = Router::new()
        .merge(api)
        .merge(create_observability_router(observability))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    if security_headers {
        router.layer(middleware::from_fn(security_headers_middleware))
    } else {
        router
    }
}
