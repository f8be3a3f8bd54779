//! Security Middleware Module
//!
//! Provides Axum middleware for request validation and security headers.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::result::Result as StdResult;
use std::sync::Arc;

use crate::security::validation::RequestValidator;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    ("content-security-policy", "default-src 'none'; frame-ancestors 'none'"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    // Location comes from the pincode, never from the browser.
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
];

fn plain_response(status: StatusCode, message: String) -> Response {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}

/// Request validation middleware
pub async fn validation_middleware(
    req: Request<Body>,
    next: Next,
    validator: Arc<RequestValidator>,
    max_body_size: usize,
) -> StdResult<Response, StatusCode> {
    if matches!(req.method(), &Method::POST | &Method::PUT | &Method::PATCH) {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok());

        if let Err(e) = validator.validate_content_type(content_type) {
            tracing::debug!(error = %e, "Rejected request with unsupported content type");
            return Ok(plain_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Validation error: {}", e),
            ));
        }
    }

    if let Some(size) = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
    {
        if size > max_body_size {
            return Ok(plain_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ));
        }
    }

    Ok(next.run(req).await)
}

/// Security headers middleware
pub async fn security_headers_middleware(
    req: Request<Body>,
    next: Next,
) -> StdResult<Response, StatusCode> {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(*name, HeaderValue::from_static(*value));
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::post};
    use tower::ServiceExt;

    fn guarded_router(max_body_size: usize) -> Router {
        let validator = Arc::new(RequestValidator::new());
        Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
                let validator = validator.clone();
                async move { validation_middleware(req, next, validator, max_body_size).await }
            }))
            .layer(middleware::from_fn(security_headers_middleware))
    }

    #[tokio::test]
    async fn test_security_headers_are_added() {
        let response = guarded_router(1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["cache-control"], "no-store");
    }

    #[tokio::test]
    async fn test_post_without_json_is_rejected() {
        let response = guarded_router(1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-type", "text/plain")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let body = "x".repeat(64);
        let response = guarded_router(16)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-type", "application/json")
                    .header("content-length", body.len().to_string())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
