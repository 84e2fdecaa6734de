//! Client accounts managed by the firm.
//!
//! A client account optionally links to one portal login (`linked_user_id`)
//! and carries the set of professionals assigned to it. Both fields are the
//! source the permission denormalisation copies from when documents and
//! todos are created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::{EmailAddress, IdentityId, RecordId};
use super::linkage::OwnerLinkage;

/// A client of the firm.
///
/// ## Invariants
/// - `linked_user_id`, when present, is unique among active client accounts:
///   no two clients may share one portal login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientAccount {
    /// Record id.
    pub id: RecordId,
    /// Portal login linked to this account, if any.
    pub linked_user_id: Option<IdentityId>,
    /// Firm-facing display name.
    pub name: String,
    /// Contact address shown in listings.
    pub email: Option<EmailAddress>,
    /// Professionals assigned to this account.
    pub assigned_professional_ids: Vec<IdentityId>,
    /// Inactive accounts are hidden from scoped listings.
    pub active: bool,
    /// Stamped by the record store on creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the record store on every merge.
    pub updated_at: DateTime<Utc>,
}

impl ClientAccount {
    /// Snapshot of the linkage fields copied onto child records at creation.
    #[must_use]
    pub fn linkage(&self) -> OwnerLinkage {
        OwnerLinkage::new(
            self.linked_user_id.clone(),
            self.assigned_professional_ids.clone(),
        )
    }
}

/// Data required to open a new client account.
///
/// New accounts start active with an empty assignment set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewClientAccount {
    /// Portal login to link, if already known.
    pub linked_user_id: Option<IdentityId>,
    /// Firm-facing display name.
    pub name: String,
    /// Contact address shown in listings.
    pub email: Option<EmailAddress>,
}

/// Partial update applied to an existing client account.
///
/// `linked_user_id` uses a double option: absent leaves the link untouched,
/// `Some(None)` clears it, `Some(Some(id))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientAccountPatch {
    /// Replacement display name, when present.
    pub name: Option<String>,
    /// Replacement contact address, when present.
    pub email: Option<EmailAddress>,
    /// Link change, when present.
    #[serde(default, with = "double_option")]
    pub linked_user_id: Option<Option<IdentityId>>,
    /// Replacement active flag, when present.
    pub active: Option<bool>,
}

mod double_option {
    //! Serde helper distinguishing "absent" from "explicitly null".
    use serde::{Deserialize, Deserializer};

    use crate::domain::identity::IdentityId;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<IdentityId>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<IdentityId>::deserialize(deserializer).map(Some)
    }
}

impl ClientAccountPatch {
    /// Whether the patch carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.linked_user_id.is_none()
            && self.active.is_none()
    }
}
