//! Error types for campus-rs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// A single rejected field in a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as sent by the client (camelCase).
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidFields(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) | Self::InvalidState(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) | Self::InvalidFields(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message shown to clients.
    ///
    /// Server errors never leak their inner detail.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(what) => format!("{what} not found"),
            Self::Forbidden(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::InvalidState(msg) => msg.clone(),
            Self::Unauthorized => "Authentication required".to_string(),
            Self::InvalidFields(_) => "Validation failed".to_string(),
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => "Server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let mut body = json!({
            "success": false,
            "code": code,
            "message": self.public_message(),
        });
        if let Self::InvalidFields(errors) = &self {
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map_or_else(|| format!("Invalid value ({})", e.code), ToString::to_string);
                    FieldError::new(camel_case(&field), message)
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Self::InvalidFields(errors)
    }
}

/// `item_name` -> `itemName`, matching the JSON field names clients send.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
        #[validate(range(min = 0.0))]
        amount: f64,
    }

    #[test]
    fn test_state_errors_map_to_conflict() {
        let err = AppError::InvalidState("Item is not available for claiming".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "INVALID_STATE");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_bad_input_is_always_validation() {
        let plain = AppError::Validation("Malformed JSON".to_string());
        let fields = AppError::InvalidFields(Vec::new());
        for err in [plain, fields] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.error_code(), "VALIDATION_ERROR");
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database("connection refused on 10.0.0.3".to_string());
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "Server error");
    }

    #[test]
    fn test_validation_errors_become_field_errors() {
        let sample = Sample {
            title: String::new(),
            amount: -1.0,
        };
        let err: AppError = sample.validate().unwrap_err().into();

        let AppError::InvalidFields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "amount");
        assert_eq!(errors[1], FieldError::new("title", "Title is required"));
    }

    #[test]
    fn test_field_names_are_camel_case() {
        assert_eq!(camel_case("item_name"), "itemName");
        assert_eq!(camel_case("contact_phone"), "contactPhone");
        assert_eq!(camel_case("title"), "title");
    }

    #[tokio::test]
    async fn test_response_envelope_carries_field_errors() {
        let response =
            AppError::InvalidFields(vec![FieldError::new("title", "Title is required")])
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"][0]["field"], "title");
    }
}
