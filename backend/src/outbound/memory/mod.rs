//! In-memory platform adapter.
//!
//! Implements every remote-platform port against process-local maps. It
//! backs the dev server and the integration tests, and it reproduces the
//! store's observable semantics: server-stamped timestamps, merge updates
//! refreshing `updated_at`, and membership-filtered queries coming back
//! unordered.

mod audit;
mod blobs;
mod identity;
mod records;

pub use audit::StampedAuditEntry;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::{ClientAccount, DocumentFile, IdentityId, Invite, Todo, UserProfile};

pub(crate) struct Credential {
    pub password: String,
    pub identity: IdentityId,
}

/// Process-local stand-in for the managed platform.
pub struct MemoryPlatform {
    clock: Arc<dyn Clock>,
    pub(crate) profiles: RwLock<HashMap<String, UserProfile>>,
    pub(crate) invites: RwLock<HashMap<String, Invite>>,
    pub(crate) clients: RwLock<HashMap<String, ClientAccount>>,
    pub(crate) documents: RwLock<HashMap<String, DocumentFile>>,
    pub(crate) todos: RwLock<HashMap<String, Todo>>,
    pub(crate) blobs: RwLock<HashMap<String, Bytes>>,
    pub(crate) credentials: RwLock<HashMap<String, Credential>>,
    pub(crate) audit: RwLock<Vec<StampedAuditEntry>>,
}

impl MemoryPlatform {
    /// Create an empty platform stamping records with the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            profiles: RwLock::new(HashMap::new()),
            invites: RwLock::new(HashMap::new()),
            clients: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
            todos: RwLock::new(HashMap::new()),
            blobs: RwLock::new(HashMap::new()),
            credentials: RwLock::new(HashMap::new()),
            audit: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Register a login the identity provider will accept.
    pub fn register_identity(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        identity: IdentityId,
    ) {
        write_guard(&self.credentials).insert(
            email.into().trim().to_ascii_lowercase(),
            Credential {
                password: password.into(),
                identity,
            },
        );
    }

    /// Insert a profile record directly, bypassing the services.
    pub fn seed_profile(&self, profile: UserProfile) {
        write_guard(&self.profiles).insert(profile.id.as_str().to_owned(), profile);
    }

    /// Insert an invite record directly, bypassing the services.
    pub fn seed_invite(&self, invite: Invite) {
        write_guard(&self.invites).insert(invite.email.as_str().to_owned(), invite);
    }

    /// Insert a client record directly, bypassing the services.
    pub fn seed_client(&self, client: ClientAccount) {
        write_guard(&self.clients).insert(client.id.as_str().to_owned(), client);
    }

    /// Snapshot of every audit entry appended so far, oldest first.
    #[must_use]
    pub fn audit_entries(&self) -> Vec<StampedAuditEntry> {
        read_guard(&self.audit).clone()
    }
}

// Lock poisoning cannot corrupt these maps (no invariants span a panic), so
// a poisoned guard is recovered rather than propagated.
pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
