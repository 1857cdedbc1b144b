//! Error types for the KPI engine.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for KPI engine operations.
#[derive(Debug, Error)]
pub enum KpiError {
    /// Malformed or out-of-policy request parameters. Raised before any I/O.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A KPI identifier with no dispatch entry.
    #[error("Unsupported KPI: {0}")]
    UnsupportedKpi(String),

    /// The analytics store did not answer, or answered with a transport-level error.
    #[error("Analytics store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store answered with something that is not a JSON document.
    #[error("Malformed store response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KpiError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            KpiError::InvalidRequest(_) => "INVALID_REQUEST",
            KpiError::UnsupportedKpi(_) => "UNSUPPORTED_KPI",
            KpiError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            KpiError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            KpiError::Config(_) => "CONFIG_ERROR",
            KpiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for KpiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message, details) = match &self {
            KpiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            KpiError::UnsupportedKpi(id) => (
                StatusCode::NOT_FOUND,
                format!("Unknown KPI '{}'", id),
                None,
            ),
            KpiError::StoreUnavailable(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Analytics store error");
                (
                    StatusCode::BAD_GATEWAY,
                    "The analytics store is unavailable".to_string(),
                    None,
                )
            }
            KpiError::MalformedResponse(e) => {
                tracing::error!(error = %e, "Malformed analytics store response");
                (
                    StatusCode::BAD_GATEWAY,
                    "The analytics store returned an unreadable response".to_string(),
                    None,
                )
            }
            KpiError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
            KpiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for KPI engine operations.
pub type KpiResult<T> = Result<T, KpiError>;
