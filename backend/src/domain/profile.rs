//! User profiles resolved from the identity provider's identities.
//!
//! A profile is created exactly once, by redeeming an invite during the
//! setup flow. Its id is the authentication identity's id and its role is
//! fixed at creation; only the active flag (and display name) may change
//! afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::{EmailAddress, IdentityId};
use super::role::Role;

/// An active portal user, keyed by the identity provider's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity id shared with the identity provider.
    pub id: IdentityId,
    /// Normalised email address the invite was issued to.
    pub email: EmailAddress,
    /// Display name carried over from the invite.
    pub name: String,
    /// Role fixed at invite redemption.
    pub role: Role,
    /// Deactivated profiles keep their records but cannot act.
    pub active: bool,
    /// Stamped by the record store on creation.
    pub created_at: DateTime<Utc>,
}

/// Partial update applied to an existing profile.
///
/// The role is deliberately absent: no update path changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfilePatch {
    /// Replacement display name, when present.
    pub name: Option<String>,
    /// Replacement active flag, when present.
    pub active: Option<bool>,
}

impl UserProfilePatch {
    /// Whether the patch carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.active.is_none()
    }
}
