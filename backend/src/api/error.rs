//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating
//! [`DomainError`] into Actix responses here. Every envelope carries the
//! request's trace identifier when one is in scope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorCode};
use crate::middleware::trace::TraceId;

/// Standard error envelope returned by the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[schema(example = "conflict")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    /// Construct an envelope from a domain failure, capturing any ambient
    /// trace identifier.
    #[must_use]
    pub fn from_domain(error: DomainError) -> Self {
        Self {
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: error.details().cloned(),
        }
    }

    /// Internal-error envelope with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::from_domain(DomainError::internal(message))
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier propagated from the request scope.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from_domain(value)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(self)
    }
}

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
