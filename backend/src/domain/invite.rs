//! Invites gate profile creation.
//!
//! An invite is keyed by its normalised email address, so at most one invite
//! can exist per mailbox. Redemption converts the invite into a profile and
//! deletes it; the two writes are sequential and best-effort, not
//! transactional.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::EmailAddress;
use super::role::Role;

/// A pending invitation for one email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    /// Normalised address; doubles as the record id.
    pub email: EmailAddress,
    /// Display name the redeemed profile will carry.
    pub name: String,
    /// Role the redeemed profile will be created with.
    pub role: Role,
    /// Stamped by the record store on creation.
    pub created_at: DateTime<Utc>,
}

/// Data required to issue a new invite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewInvite {
    /// Address the invite is issued to; normalised before storage.
    pub email: EmailAddress,
    /// Display name for the future profile.
    pub name: String,
    /// Role the future profile receives.
    pub role: Role,
}
