//! Identifier newtypes shared across the domain.
//!
//! Identity ids are opaque strings minted by the remote identity provider;
//! record ids are generated locally so storage paths and record ids can be
//! kept consistent. Both validate shape at the boundary so downstream code
//! never handles blank identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned when constructing identifier newtypes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    /// Value is empty after trimming whitespace.
    #[error("identifier must not be empty")]
    Empty,
    /// Value contains leading or trailing whitespace.
    #[error("identifier must not contain surrounding whitespace")]
    ContainsWhitespace,
}

/// Opaque identity id minted by the remote identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Construct an identity id, rejecting blank or padded values.
    pub fn new(value: impl Into<String>) -> Result<Self, IdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(IdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(IdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for IdentityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Locally generated record id for clients, documents and todos.
///
/// Generated ids are UUIDv4 strings; upload paths embed the same id as the
/// record so the two never diverge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Mint a fresh record id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Construct a record id from an existing string.
    pub fn new(value: impl Into<String>) -> Result<Self, IdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(IdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(IdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailValidationError {
    /// Address is empty after trimming.
    #[error("email address must not be empty")]
    Empty,
    /// Address lacks a local part or domain.
    #[error("email address must contain a local part and a domain")]
    MalformedAddress,
}

/// Normalised email address (trimmed, lowercased).
///
/// Invites use the normalised address as their record id, so two spellings of
/// one mailbox can never produce two invites.
///
/// # Examples
/// ```
/// use backend::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Firm.example ").expect("valid address");
/// assert_eq!(email.as_str(), "ada@firm.example");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalise an address.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let normalised = value.as_ref().trim().to_ascii_lowercase();
        if normalised.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        let mut parts = normalised.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() {
            return Err(EmailValidationError::MalformedAddress);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn identity_id_rejects_blank(#[case] value: &str) {
        let err = IdentityId::new(value).expect_err("blank ids rejected");
        assert_eq!(err, IdValidationError::Empty);
    }

    #[rstest]
    #[case(" uid-1")]
    #[case("uid-1 ")]
    fn identity_id_rejects_padding(#[case] value: &str) {
        let err = IdentityId::new(value).expect_err("padded ids rejected");
        assert_eq!(err, IdValidationError::ContainsWhitespace);
    }

    #[rstest]
    fn record_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[rstest]
    #[case("Ada@Firm.example", "ada@firm.example")]
    #[case("  bob@firm.example  ", "bob@firm.example")]
    #[case("MIXED@CASE.EXAMPLE", "mixed@case.example")]
    fn email_normalises(#[case] input: &str, #[case] expected: &str) {
        let email = EmailAddress::parse(input).expect("valid address");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("no-at-sign", EmailValidationError::MalformedAddress)]
    #[case("@firm.example", EmailValidationError::MalformedAddress)]
    #[case("ada@", EmailValidationError::MalformedAddress)]
    fn email_rejects_malformed(#[case] input: &str, #[case] expected: EmailValidationError) {
        let err = EmailAddress::parse(input).expect_err("invalid address");
        assert_eq!(err, expected);
    }
}
