//! Denormalised permission fields copied onto child records.
//!
//! Documents and todos carry a verbatim copy of the owning client's
//! `linked_user_id` and `assigned_professional_ids`, taken at creation time.
//! Reads can then filter on the child record alone, without joining back to
//! the client. The copy is not re-fetched at write time: the caller supplies
//! the values it loaded with the client context, and the copy goes stale if
//! the client is reassigned later. That staleness is an accepted trade-off,
//! not a bug to fix here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::client::ClientAccount;
use super::identity::IdentityId;

/// Snapshot of a client's linkage fields, embedded in child records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerLinkage {
    /// Portal login linked to the owning client at copy time.
    pub linked_user_id: Option<IdentityId>,
    /// Professionals assigned to the owning client at copy time.
    pub assigned_professional_ids: Vec<IdentityId>,
}

impl OwnerLinkage {
    /// Build a linkage snapshot from its two fields.
    #[must_use]
    pub fn new(linked_user_id: Option<IdentityId>, assigned_professional_ids: Vec<IdentityId>) -> Self {
        Self {
            linked_user_id,
            assigned_professional_ids,
        }
    }

    /// Whether this snapshot still matches the owning client's live fields.
    #[must_use]
    pub fn matches(&self, client: &ClientAccount) -> bool {
        self.linked_user_id == client.linked_user_id
            && self.assigned_professional_ids == client.assigned_professional_ids
    }
}

/// Recompute a child record's linkage from the owning client's live fields.
///
/// This is the re-sync seam for stale copies after a client reassignment.
/// Nothing calls it today: the read path tolerates staleness by design, and
/// rewriting every child on reassignment would turn one small update into an
/// unbounded fan-out. Kept so a future batch job has one obvious entry
/// point.
#[must_use]
pub fn reconcile(stale: &OwnerLinkage, client: &ClientAccount) -> Option<OwnerLinkage> {
    if stale.matches(client) {
        None
    } else {
        Some(client.linkage())
    }
}
