//! Security Module
//!
//! Provides request hardening for the Arogya API:
//! - Request Validation
//! - Security Middleware

pub mod middleware;
pub mod validation;

pub use middleware::{security_headers_middleware, validation_middleware};
pub use validation::{RequestValidator, ValidationError, validators};
