//! HTTP adapter mapping for lookup failures.
//!
//! Purpose: keep `WeatherLookupError` HTTP-agnostic while turning validation
//! and lookup failures into consistent JSON bodies and status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CityValidationError, ResponseStatus, WeatherLookupError};
use crate::middleware::trace::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

const INVALID_INPUT_TITLE: &str = "Invalid input";
const INTERNAL_ERROR_TITLE: &str = "Internal server error";

/// Failure body for lookup errors and unknown routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Short error title.
    #[schema(example = "Internal server error")]
    pub error: String,
    /// Human-readable detail.
    #[schema(example = "Connection Error: dns error")]
    pub message: String,
    /// Request trace identifier, when one is in scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub trace_id: Option<String>,
}

impl ErrorBody {
    /// Build a body tagged with the current trace identifier.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }
}

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldIssue {
    /// Name of the offending field.
    #[schema(example = "city")]
    pub field: String,
    /// Rule the field broke.
    #[schema(example = "City name must be between 2-25 characters")]
    pub message: String,
}

/// Failure body for rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationFailureBody {
    /// Always `fail`.
    pub status: ResponseStatus,
    /// Always `Invalid input`.
    #[schema(example = "Invalid input")]
    pub error: String,
    /// Field-level problems.
    pub details: Vec<FieldIssue>,
}

/// Errors returned by weather handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The `city` path parameter failed validation.
    #[error("invalid city: {0}")]
    InvalidCity(#[from] CityValidationError),
    /// The lookup itself failed.
    #[error(transparent)]
    Lookup(#[from] WeatherLookupError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCity(_) => StatusCode::BAD_REQUEST,
            Self::Lookup(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = TraceId::current() {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }

        match self {
            Self::InvalidCity(reason) => builder.json(ValidationFailureBody {
                status: ResponseStatus::Fail,
                error: INVALID_INPUT_TITLE.to_owned(),
                details: vec![FieldIssue {
                    field: "city".to_owned(),
                    message: reason.to_string(),
                }],
            }),
            Self::Lookup(err) if err.is_client_error() => {
                builder.json(ErrorBody::new(INVALID_INPUT_TITLE, err.to_string()))
            }
            Self::Lookup(err) => builder.json(ErrorBody::new(INTERNAL_ERROR_TITLE, err.to_string())),
        }
    }
}
