//! Portal roles and capability resolution.
//!
//! Role-gated behaviour is decided in exactly one place: [`capabilities`]
//! maps a role to the set of actions it may perform. The route guard and the
//! entity services both consult this table instead of re-deriving
//! `role == admin` at each call site.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Portal role assigned to a user profile at invite time.
///
/// A profile's role never changes after creation; no update path touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Firm administrator: manages users, invites and client accounts.
    Admin,
    /// Staff member assigned to a subset of client accounts.
    Professional,
    /// Portal user linked to a single client account.
    Client,
}

impl Role {
    /// Stable lowercase name used in audit payloads and session state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Professional => "professional",
            Self::Client => "client",
        }
    }

    /// Whether this role holds the given capability.
    #[must_use]
    pub fn allows(self, capability: Capability) -> bool {
        capabilities(self).contains(&capability)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions a role may be permitted to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Capability {
    /// List, update and delete user profiles.
    ManageUsers,
    /// Create and revoke invites.
    ManageInvites,
    /// Create, update and delete client accounts.
    ManageClients,
    /// Replace a client's assigned-professional set.
    AssignProfessionals,
    /// Upload documents for a client account.
    UploadDocuments,
    /// Approve or reject pending documents.
    ReviewDocuments,
    /// Delete a document record and its backing blob.
    DeleteDocuments,
    /// Create tasks for a client account.
    CreateTodos,
    /// Resolve tasks addressed to the caller's audience.
    ResolveTodos,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ManageUsers,
    Capability::ManageInvites,
    Capability::ManageClients,
    Capability::AssignProfessionals,
    Capability::UploadDocuments,
    Capability::ReviewDocuments,
    Capability::DeleteDocuments,
    Capability::CreateTodos,
    Capability::ResolveTodos,
];

const PROFESSIONAL_CAPABILITIES: &[Capability] = &[
    Capability::UploadDocuments,
    Capability::ReviewDocuments,
    Capability::CreateTodos,
    Capability::ResolveTodos,
];

const CLIENT_CAPABILITIES: &[Capability] = &[Capability::UploadDocuments, Capability::ResolveTodos];

/// Resolve the set of capabilities granted to a role.
///
/// # Examples
/// ```
/// use backend::domain::{Capability, Role, capabilities};
///
/// assert!(capabilities(Role::Admin).contains(&Capability::ManageClients));
/// assert!(!capabilities(Role::Client).contains(&Capability::ReviewDocuments));
/// ```
#[must_use]
pub fn capabilities(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin => ADMIN_CAPABILITIES,
        Role::Professional => PROFESSIONAL_CAPABILITIES,
        Role::Client => CLIENT_CAPABILITIES,
    }
}

/// Roles granted a capability.
///
/// The navigation guard derives a scope's admitted roles from the same
/// table the services check, so the two can never disagree.
#[must_use]
pub fn roles_holding(capability: Capability) -> Vec<Role> {
    [Role::Admin, Role::Professional, Role::Client]
        .into_iter()
        .filter(|role| role.allows(capability))
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, Capability::ManageUsers, true)]
    #[case(Role::Admin, Capability::DeleteDocuments, true)]
    #[case(Role::Professional, Capability::ManageUsers, false)]
    #[case(Role::Professional, Capability::ReviewDocuments, true)]
    #[case(Role::Professional, Capability::DeleteDocuments, false)]
    #[case(Role::Client, Capability::UploadDocuments, true)]
    #[case(Role::Client, Capability::CreateTodos, false)]
    #[case(Role::Client, Capability::ResolveTodos, true)]
    fn capability_table(#[case] role: Role, #[case] capability: Capability, #[case] allowed: bool) {
        assert_eq!(role.allows(capability), allowed);
    }

    #[rstest]
    fn guard_role_sets_follow_the_capability_table() {
        assert_eq!(roles_holding(Capability::ManageUsers), vec![Role::Admin]);
        assert_eq!(
            roles_holding(Capability::ReviewDocuments),
            vec![Role::Admin, Role::Professional]
        );
        assert_eq!(
            roles_holding(Capability::UploadDocuments),
            vec![Role::Admin, Role::Professional, Role::Client]
        );
    }

    #[rstest]
    fn roles_serialise_lowercase() {
        let json = serde_json::to_string(&Role::Professional).expect("serializable");
        assert_eq!(json, "\"professional\"");
        let back: Role = serde_json::from_str("\"client\"").expect("deserializable");
        assert_eq!(back, Role::Client);
    }
}
