//! Tasks raised against a client account.
//!
//! Todos are addressed to one audience (the linked portal user or the
//! assigned professionals) and carry the same denormalised permission fields
//! as documents. The only exercised transition is `open -> resolved`;
//! `cancelled` exists in the type but no operation reaches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::{IdentityId, RecordId};
use super::linkage::OwnerLinkage;
use super::role::Role;

/// Lifecycle status of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    /// Awaiting action by the target audience.
    Open,
    /// Completed by an audience member.
    Resolved,
    /// Declared but unreachable: no exposed operation produces it.
    Cancelled,
}

/// Who a todo is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TodoAudience {
    /// The portal user linked to the owning client account.
    Client,
    /// The professionals assigned to the owning client account.
    Professional,
}

/// A task raised against a client account.
///
/// ## Invariants
/// - `linkage` mirrors the owning client's fields as of creation time.
/// - `resolved_at` is present exactly when `status` is
///   [`TodoStatus::Resolved`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Record id.
    pub id: RecordId,
    /// Owning client account.
    pub client_id: RecordId,
    /// Short task title.
    pub title: String,
    /// Longer description, possibly empty.
    pub description: String,
    /// Identity that raised the task.
    pub created_by: IdentityId,
    /// Role the creator held at creation time.
    pub created_by_role: Role,
    /// Audience the task is addressed to.
    pub audience: TodoAudience,
    /// Lifecycle status.
    pub status: TodoStatus,
    /// Permission fields copied from the owning client at creation time.
    #[serde(flatten)]
    pub linkage: OwnerLinkage,
    /// Stamped by the record store on creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the record store on every merge.
    pub updated_at: DateTime<Utc>,
    /// Set when the task is resolved; absent otherwise.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Whether the given caller belongs to this todo's target audience.
    ///
    /// Clients match through the denormalised linked-user id; professionals
    /// through membership of the denormalised assignment set. Admins may act
    /// for either audience.
    #[must_use]
    pub fn addressed_to(&self, identity: &IdentityId, role: Role) -> bool {
        match (self.audience, role) {
            (_, Role::Admin) => true,
            (TodoAudience::Client, Role::Client) => {
                self.linkage.linked_user_id.as_ref() == Some(identity)
            }
            (TodoAudience::Professional, Role::Professional) => {
                self.linkage.assigned_professional_ids.contains(identity)
            }
            _ => false,
        }
    }
}

/// Data required to raise a new todo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    /// Owning client account.
    pub client_id: RecordId,
    /// Short task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Audience the task is addressed to.
    pub audience: TodoAudience,
    /// Permission fields from the owning client, loaded by the caller.
    #[serde(flatten)]
    pub linkage: OwnerLinkage,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn todo(audience: TodoAudience, linked: Option<&str>, assigned: &[&str]) -> Todo {
        Todo {
            id: RecordId::generate(),
            client_id: RecordId::generate(),
            title: "Send bank statements".into(),
            description: String::new(),
            created_by: IdentityId::new("admin-1").expect("valid id"),
            created_by_role: Role::Admin,
            audience,
            status: TodoStatus::Open,
            linkage: OwnerLinkage::new(
                linked.map(|id| IdentityId::new(id).expect("valid id")),
                assigned
                    .iter()
                    .map(|id| IdentityId::new(*id).expect("valid id"))
                    .collect(),
            ),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[rstest]
    fn client_audience_matches_linked_user_only() {
        let todo = todo(TodoAudience::Client, Some("login-1"), &["pro-1"]);
        let linked = IdentityId::new("login-1").expect("valid id");
        let other = IdentityId::new("login-2").expect("valid id");
        assert!(todo.addressed_to(&linked, Role::Client));
        assert!(!todo.addressed_to(&other, Role::Client));
        let pro = IdentityId::new("pro-1").expect("valid id");
        assert!(!todo.addressed_to(&pro, Role::Professional));
    }

    #[rstest]
    fn professional_audience_matches_assignment_set() {
        let todo = todo(TodoAudience::Professional, Some("login-1"), &["pro-1"]);
        let pro = IdentityId::new("pro-1").expect("valid id");
        let outsider = IdentityId::new("pro-9").expect("valid id");
        assert!(todo.addressed_to(&pro, Role::Professional));
        assert!(!todo.addressed_to(&outsider, Role::Professional));
    }

    #[rstest]
    #[case(TodoAudience::Client)]
    #[case(TodoAudience::Professional)]
    fn admins_can_act_for_either_audience(#[case] audience: TodoAudience) {
        let todo = todo(audience, Some("login-1"), &["pro-1"]);
        let admin = IdentityId::new("admin-1").expect("valid id");
        assert!(todo.addressed_to(&admin, Role::Admin));
    }
}
