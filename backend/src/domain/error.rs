//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP layer maps them onto
//! response envelopes; services map port failures into the variants below so
//! callers see one stable taxonomy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The write conflicts with existing state (uniqueness, refused
    /// transition).
    Conflict,
    /// A remote collaborator (record store, blob store, identity provider)
    /// could not be reached or refused the operation.
    Unavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// # Examples
/// ```
/// use backend::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::conflict("linked user already taken");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainError {
    #[schema(example = "conflict")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl DomainError {
    /// Create a new error with the given code and message.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details for adapters.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::Unavailable`].
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(DomainError::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(DomainError::unauthorized("who"), ErrorCode::Unauthorized)]
    #[case(DomainError::forbidden("no"), ErrorCode::Forbidden)]
    #[case(DomainError::not_found("gone"), ErrorCode::NotFound)]
    #[case(DomainError::conflict("dup"), ErrorCode::Conflict)]
    #[case(DomainError::unavailable("down"), ErrorCode::Unavailable)]
    #[case(DomainError::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_codes(#[case] err: DomainError, #[case] expected: ErrorCode) {
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn details_round_trip_through_serde() {
        let err = DomainError::conflict("duplicate").with_details(json!({ "field": "email" }));
        let value = serde_json::to_value(&err).expect("serializable");
        assert_eq!(value["code"], "conflict");
        assert_eq!(value["details"]["field"], "email");
        let back: DomainError = serde_json::from_value(value).expect("deserializable");
        assert_eq!(back, err);
    }

    #[rstest]
    fn display_uses_message() {
        let err = DomainError::not_found("client missing");
        assert_eq!(err.to_string(), "client missing");
    }
}
