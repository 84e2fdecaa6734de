//! Driving port for authentication against the remote identity provider.
//!
//! Inbound adapters call this to verify credentials without knowing the
//! backing infrastructure, which keeps handler tests deterministic: they
//! substitute a test double instead of wiring a live provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::auth::LoginCredentials;
use crate::domain::identity::{EmailAddress, IdentityId};

/// Identity facts returned by a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// Stable identity id.
    pub id: IdentityId,
    /// Address the identity authenticated with.
    pub email: EmailAddress,
}

/// Errors raised by identity provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityProviderError {
    /// The credentials did not match any identity.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The provider could not be reached.
    #[error("identity provider unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl IdentityProviderError {
    /// Helper for connectivity failures.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Port for credential verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedIdentity, IdentityProviderError>;
}
