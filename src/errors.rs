use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

use crate::entities::candidate::DimensionMismatch;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    BadRequest(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::BadRequest(msg) => serde_json::json!({"error": msg}),
            _ => serde_json::json!({"error": self.to_string()}),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::ValidationError(field_errors)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// Failure talking to an upstream collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BackendError {
    #[display("Upstream request failed: {_0}")]
    Network(String),

    #[display("Upstream responded {status}: {body}")]
    NonOk { status: u16, body: String },

    #[display("Upstream response did not match the expected schema: {_0}")]
    Schema(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Network(err.to_string())
    }
}

/// Why a submission attempt was refused or failed.
///
/// Every variant returns the caller to a retryable state; none is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SubmitError {
    #[display("Please select an image.")]
    MissingImage,

    #[display("Please enter a valid Level ID.")]
    InvalidLevel,

    #[display("Image dimensions unknown. Please re-import the image.")]
    UnknownDimensions,

    #[display("{_0}")]
    DimensionMismatch(DimensionMismatch),

    #[display("You must be logged in to submit an advertisement.")]
    NotAuthenticated,

    #[display("Active advertisement limit reached ({active_count}/{max})")]
    QuotaExceeded { active_count: usize, max: usize },

    #[display("{_0}")]
    Backend(BackendError),
}

impl From<DimensionMismatch> for SubmitError {
    fn from(err: DimensionMismatch) -> Self {
        SubmitError::DimensionMismatch(err)
    }
}

impl ResponseError for SubmitError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // the upstream body is shown to the user verbatim
            SubmitError::Backend(BackendError::NonOk { status, body }) => serde_json::json!({
                "error": "Failed to submit advertisement.",
                "upstream_status": status,
                "upstream_body": body,
            }),
            _ => serde_json::json!({"error": self.to_string()}),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            SubmitError::MissingImage
            | SubmitError::InvalidLevel
            | SubmitError::UnknownDimensions
            | SubmitError::DimensionMismatch(_) => StatusCode::BAD_REQUEST,
            SubmitError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            SubmitError::QuotaExceeded { .. } => StatusCode::CONFLICT,
            SubmitError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
