//! Response types for the payroll engine API.
//!
//! This module defines the error response structures, the mapping from
//! engine errors to HTTP statuses, and the small response DTOs that are
//! not just serialized domain types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::StatutoryDeductions;
use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new("CONFIG_ERROR", error.to_string()),
                }
            }
            EngineError::CycleNotFound { .. }
            | EngineError::PayslipNotFound { .. }
            | EngineError::DisbursementNotFound { .. }
            | EngineError::EmployeeNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", error.to_string()),
            },
            EngineError::MissingSalaryStructure { .. }
            | EngineError::InvalidCycleDates { .. }
            | EngineError::EmptySelection { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("VALIDATION_ERROR", error.to_string()),
            },
            EngineError::InvalidCycleStatus { .. }
            | EngineError::InvalidPayslipTransition { .. }
            | EngineError::InvalidDisbursementTransition { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("STATE_ERROR", error.to_string()),
            },
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match &rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::new("VALIDATION_ERROR", body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => ApiError::new(
                "MISSING_CONTENT_TYPE",
                "Content-Type must be application/json",
            ),
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

/// Response body for the statutory deduction preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutoryPreviewResponse {
    /// Provident fund deduction.
    pub pf: Decimal,
    /// Insurance contribution.
    pub esi: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Sum of the three.
    pub total: Decimal,
}

impl From<StatutoryDeductions> for StatutoryPreviewResponse {
    fn from(deductions: StatutoryDeductions) -> Self {
        Self {
            total: deductions.total(),
            pf: deductions.pf,
            esi: deductions.esi,
            professional_tax: deductions.professional_tax,
        }
    }
}
