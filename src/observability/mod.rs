//! 可观测性模块
//!
//! 提供 Prometheus 指标、结构化日志和健康检查。

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry as TracingRegistry, fmt, prelude::*};

use crate::config::LoggingConfig;
use crate::error::AppError;
use crate::models::Urgency;

// ===== Metrics =====

/// 应用指标
#[derive(Clone)]
pub struct AppMetrics {
    registry: Registry,
    chat_requests: IntCounterVec,
    disease_searches: IntCounter,
    hospital_lookups: IntCounterVec,
    http_requests: IntCounterVec,
    http_duration: HistogramVec,
    errors: IntCounter,
}

impl AppMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("arogya".to_string()), None)?;

        let chat_requests = IntCounterVec::new(
            Opts::new("chat_requests_total", "Chat answers by urgency"),
            &["urgency"],
        )?;
        let disease_searches =
            IntCounter::new("disease_searches_total", "Disease library searches")?;
        let hospital_lookups = IntCounterVec::new(
            Opts::new("hospital_lookups_total", "Hospital lookups by outcome"),
            &["outcome"],
        )?;
        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests"),
            &["method", "status"],
        )?;
        let http_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency"),
            &["method"],
        )?;
        let errors = IntCounter::new("errors_total", "Responses with a 5xx status")?;

        registry.register(Box::new(chat_requests.clone()))?;
        registry.register(Box::new(disease_searches.clone()))?;
        registry.register(Box::new(hospital_lookups.clone()))?;
        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_duration.clone()))?;
        registry.register(Box::new(errors.clone()))?;

        Ok(Self {
            registry,
            chat_requests,
            disease_searches,
            hospital_lookups,
            http_requests,
            http_duration,
            errors,
        })
    }

    /// 记录聊天回答
    pub fn record_chat(&self, urgency: Urgency) {
        self.chat_requests
            .with_label_values(&[urgency.as_str()])
            .inc();
    }

    /// 记录疾病检索
    pub fn record_disease_search(&self) {
        self.disease_searches.inc();
    }

    /// 记录医院查询结果：`remote` / `cached` / `invalid` / `failed`
    pub fn record_hospital_lookup(&self, outcome: &str) {
        self.hospital_lookups.with_label_values(&[outcome]).inc();
    }

    /// 记录 HTTP 请求
    pub fn record_http_request(&self, method: &str, status: u16, seconds: f64) {
        self.http_requests
            .with_label_values(&[method, &status.to_string()])
            .inc();
        self.http_duration
            .with_label_values(&[method])
            .observe(seconds);
        if status >= 500 {
            self.errors.inc();
        }
    }

    /// 生成 Prometheus 文本格式
    pub fn gather(&self) -> Result<String, AppError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| AppError::Metrics(e.to_string()))
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// 单个健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
}

/// 健康检查结果
#[derive(Debug, Clone)]
pub struct HealthCheckResult {
    pub name: String,
    pub healthy: bool,
    pub message: String,
}

impl HealthCheckResult {
    pub fn healthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: true,
            message: message.into(),
        }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: false,
            message: message.into(),
        }
    }
}

fn status_label(healthy: bool) -> String {
    let label = if healthy { "healthy" } else { "unhealthy" };
    label.to_string()
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub health_checks: Arc<Mutex<Vec<HealthCheckResult>>>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: impl Into<String>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            metrics,
            health_checks: Arc::new(Mutex::new(Vec::new())),
            start_time: Utc::now(),
            version: version.into(),
        }
    }

    /// 添加或替换同名的健康检查结果
    pub async fn add_health_check(&self, result: HealthCheckResult) {
        let mut checks = self.health_checks.lock().await;
        checks.retain(|c| c.name != result.name);
        checks.push(result);
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = state.health_checks.lock().await;
    let all_healthy = checks.iter().all(|c| c.healthy);

    let health_status = HealthStatus {
        status: status_label(all_healthy),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        checks: checks
            .iter()
            .map(|c| HealthCheck {
                name: c.name.clone(),
                status: status_label(c.healthy),
                message: Some(c.message.clone()),
            })
            .collect(),
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查：至少登记过一项且全部健康
pub async fn readiness(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = state.health_checks.lock().await;

    if !checks.is_empty() && checks.iter().all(|c| c.healthy) {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
    }
}

/// Prometheus 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> Result<String, AppError> {
    state.metrics.gather()
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(metrics): State<Arc<AppMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    metrics.record_http_request(
        &method,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

// ===== Structured Logging =====

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的级别；配置了 `log_dir` 时额外按天滚动写文件，
/// 返回的 guard 必须存活到进程退出。
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>, AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AppError::Config(format!("无效的日志级别 '{}': {}", config.level, e)))?;

    let mut layers: Vec<Box<dyn Layer<TracingRegistry> + Send + Sync>> = Vec::new();

    let console = fmt::layer().with_target(true).with_line_number(true);
    if config.structured {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.boxed());
    }

    let guard = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "arogya.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| AppError::Internal(format!("日志初始化失败: {}", e)))?;

    Ok(guard)
}
