//! Read-scope construction for role-filtered queries.
//!
//! Every list operation funnels through [`AccessScope::for_actor`]: admins
//! read unrestricted, professionals read records whose assignment set
//! contains them, clients read records whose denormalised linked-user id is
//! theirs. The remote store enforces the same predicates in its own
//! authorisation rules; this scope exists so the portal never even requests
//! records the store would refuse.
//!
//! The store cannot combine an array-membership predicate with store-side
//! ordering, so scoped "recent" listings fetch by predicate first and sort
//! in memory; only the unrestricted path may ask the store to order.

use serde::{Deserialize, Serialize};

use super::client::ClientAccount;
use super::identity::IdentityId;
use super::linkage::OwnerLinkage;
use super::role::Role;

/// The caller on whose behalf a service operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identity id from the session.
    pub identity: IdentityId,
    /// Role from the resolved profile.
    pub role: Role,
}

impl Actor {
    /// Build an actor from its parts.
    #[must_use]
    pub fn new(identity: IdentityId, role: Role) -> Self {
        Self { identity, role }
    }

    /// The read scope this actor queries under.
    #[must_use]
    pub fn scope(&self) -> AccessScope {
        AccessScope::for_actor(self)
    }
}

/// Read predicate scoping which records a caller may list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Full collection scope; only admins hold it.
    Unrestricted,
    /// Records whose assignment set contains the professional.
    AssignedProfessional(IdentityId),
    /// Records whose denormalised linked-user id equals the portal user.
    LinkedUser(IdentityId),
}

impl AccessScope {
    /// Build the scope for a caller.
    #[must_use]
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            Role::Admin => Self::Unrestricted,
            Role::Professional => Self::AssignedProfessional(actor.identity.clone()),
            Role::Client => Self::LinkedUser(actor.identity.clone()),
        }
    }

    /// Whether this scope may ask the store to order results for it.
    ///
    /// Membership-filtered queries cannot be ordered store-side without a
    /// composite index, so scoped callers sort in memory instead.
    #[must_use]
    pub fn supports_store_ordering(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Apply the predicate to a denormalised linkage snapshot.
    #[must_use]
    pub fn permits_linkage(&self, linkage: &OwnerLinkage) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::AssignedProfessional(id) => linkage.assigned_professional_ids.contains(id),
            Self::LinkedUser(id) => linkage.linked_user_id.as_ref() == Some(id),
        }
    }

    /// Apply the predicate to a client account's own fields.
    #[must_use]
    pub fn permits_client(&self, client: &ClientAccount) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::AssignedProfessional(id) => client.assigned_professional_ids.contains(id),
            Self::LinkedUser(id) => client.linked_user_id.as_ref() == Some(id),
        }
    }
}

/// Sort newest-first by the given key and truncate to `limit`.
///
/// Scoped recent listings run this after the predicate fetch, standing in
/// for the store-side ordering the predicate rules out.
#[must_use]
pub fn sort_recent_in_memory<T, K>(mut records: Vec<T>, key: K, limit: usize) -> Vec<T>
where
    K: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    records.sort_by(|a, b| key(b).cmp(&key(a)));
    records.truncate(limit);
    records
}
