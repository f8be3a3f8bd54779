//! Request Validation Module
//!
//! Provides request validation and input sanitization for security.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

/// Validation error types
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Field '{field}' is too long (max: {max}, got: {got})")]
    TooLong {
        field: String,
        max: usize,
        got: usize,
    },

    #[error("Field '{field}' is too short (min: {min}, got: {got})")]
    TooShort {
        field: String,
        min: usize,
        got: usize,
    },

    #[error("Field '{field}' contains invalid characters: {chars}")]
    InvalidCharacters { field: String, chars: String },

    #[error("Request body too large: max={max} bytes, got={got} bytes")]
    BodyTooLarge { max: usize, got: usize },

    #[error("Invalid content type: expected={expected}, got={got}")]
    InvalidContentType { expected: String, got: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::TooLong { field, .. } => field.as_str(),
            Self::TooShort { field, .. } => field.as_str(),
            Self::InvalidCharacters { field, .. } => field.as_str(),
            Self::BodyTooLarge { .. } => "body",
            Self::InvalidContentType { .. } => "content_type",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Validation result type
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Request validator implementation
#[derive(Debug, Clone)]
pub struct RequestValidator {
    /// Maximum allowed length for free-text fields
    max_field_length: usize,
    /// Maximum request body size
    max_body_size: usize,
    /// Allowed content types
    allowed_content_types: Vec<String>,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    /// Create new validator
    pub fn new() -> Self {
        Self {
            max_field_length: 800,
            max_body_size: 64 * 1024,
            allowed_content_types: vec![
                "application/json".to_string(),
                "application/json; charset=utf-8".to_string(),
            ],
        }
    }

    /// Set maximum field length
    pub fn with_max_field_length(mut self, length: usize) -> Self {
        self.max_field_length = length;
        self
    }

    /// Set maximum body size
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    pub fn max_field_length(&self) -> usize {
        self.max_field_length
    }

    /// Validate field length in characters
    pub fn validate_length(
        &self,
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> ValidationResult<()> {
        let length = value.chars().count();

        if let Some(min_len) = min {
            if length < min_len {
                return Err(ValidationError::TooShort {
                    field: field.to_string(),
                    min: min_len,
                    got: length,
                });
            }
        }

        if let Some(max_len) = max {
            if length > max_len {
                return Err(ValidationError::TooLong {
                    field: field.to_string(),
                    max: max_len,
                    got: length,
                });
            }
        }

        Ok(())
    }

    /// Validate free text against the configured maximum
    pub fn validate_text(&self, field: &str, value: &str, min: usize) -> ValidationResult<()> {
        self.validate_length(field, value, Some(min), Some(self.max_field_length))
    }

    /// Reject characters outside the allowed set
    pub fn validate_chars(
        &self,
        field: &str,
        value: &str,
        allowed: impl Fn(char) -> bool,
    ) -> ValidationResult<()> {
        let invalid: String = value.chars().filter(|c| !allowed(*c)).collect();

        if !invalid.is_empty() {
            Err(ValidationError::InvalidCharacters {
                field: field.to_string(),
                chars: invalid,
            })
        } else {
            Ok(())
        }
    }

    /// Sanitize string input
    pub fn sanitize_string(input: &str) -> String {
        // Remove null bytes and control characters
        input
            .trim()
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == ' ')
            .collect()
    }

    /// Check content type is allowed
    pub fn validate_content_type(&self, content_type: Option<&str>) -> ValidationResult<()> {
        let ct = content_type.ok_or_else(|| ValidationError::InvalidContentType {
            expected: self.allowed_content_types.join(", "),
            got: "none".to_string(),
        })?;

        let ct_base = ct.split(';').next().unwrap_or(ct).trim().to_lowercase();

        if !self.allowed_content_types.iter().any(|allowed| {
            let allowed_base = allowed.split(';').next().unwrap_or(allowed).trim();
            ct_base == allowed_base.to_lowercase()
        }) {
            return Err(ValidationError::InvalidContentType {
                expected: self.allowed_content_types.join(", "),
                got: ct.to_string(),
            });
        }

        Ok(())
    }

    /// Check body size
    pub fn validate_body_size(&self, size: usize) -> ValidationResult<()> {
        if size > self.max_body_size {
            return Err(ValidationError::BodyTooLarge {
                max: self.max_body_size,
                got: size,
            });
        }
        Ok(())
    }
}

/// Common validation helpers
pub mod validators {
    use super::*;

    /// Validate and clean a chat query
    pub fn validate_chat_query(validator: &RequestValidator, query: &str) -> ValidationResult<String> {
        let cleaned = RequestValidator::sanitize_string(query);
        validator.validate_text("query", &cleaned, 2)?;
        Ok(cleaned)
    }

    /// Validate an optional free-text location
    pub fn validate_location(location: Option<&str>) -> ValidationResult<Option<String>> {
        let Some(raw) = location else {
            return Ok(None);
        };
        let cleaned = RequestValidator::sanitize_string(raw);
        if cleaned.is_empty() {
            return Ok(None);
        }
        let validator = RequestValidator::new();
        validator.validate_length("location", &cleaned, None, Some(120))?;
        // Indic scripts need combining marks, so only markup and quoting are refused.
        validator.validate_chars("location", &cleaned, |c| {
            !matches!(c, '<' | '>' | '{' | '}' | '[' | ']' | '"' | '\\' | ';' | '`')
        })?;
        Ok(Some(cleaned))
    }

    /// Pincodes are exactly six ASCII digits
    pub fn validate_pincode_format(pincode: &str) -> ValidationResult<()> {
        let validator = RequestValidator::new();
        let pincode = pincode.trim();
        validator.validate_length("pincode", pincode, Some(6), Some(6))?;
        validator.validate_chars("pincode", pincode, |c| c.is_ascii_digit())
    }
}
