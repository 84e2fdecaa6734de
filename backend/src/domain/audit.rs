//! Audit trail entries appended alongside every mutating service call.
//!
//! The trail is append-only and best-effort: a failed append is logged and
//! swallowed, never surfaced, and never rolls back the primary write. Sinks
//! stamp the timestamp on append, the way the record store stamps creation
//! times.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::access::Actor;
use super::role::Role;

/// Collection a mutation targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// User profiles.
    Users,
    /// Pending invites.
    Invites,
    /// Client accounts.
    Clients,
    /// Document records.
    Documents,
    /// Tasks.
    Todos,
}

impl EntityKind {
    /// Stable lowercase collection name used in audit payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Invites => "invites",
            Self::Clients => "clients",
            Self::Documents => "documents",
            Self::Todos => "todos",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record, before the sink stamps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Action name, e.g. `client_created`.
    pub action: String,
    /// Collection the mutation targeted.
    pub target_collection: EntityKind,
    /// Id of the mutated record.
    pub target_id: String,
    /// Identity that performed the mutation.
    pub actor_id: String,
    /// Role the actor held at the time.
    pub actor_role: Role,
    /// Free-form detail payload.
    pub details: Value,
}

impl AuditEntry {
    /// Build an entry for the given actor.
    #[must_use]
    pub fn record(
        action: impl Into<String>,
        target_collection: EntityKind,
        target_id: impl Into<String>,
        actor: &Actor,
        details: Value,
    ) -> Self {
        Self {
            action: action.into(),
            target_collection,
            target_id: target_id.into(),
            actor_id: actor.identity.as_str().to_owned(),
            actor_role: actor.role,
            details,
        }
    }
}
