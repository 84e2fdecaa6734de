//! Best-effort audit recording in front of the sink port.
//!
//! Every mutating service call records exactly one entry through this
//! recorder. A failed append is logged and swallowed: the audit trail is an
//! observability aid, not a ledger the primary write depends on.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use super::access::Actor;
use super::audit::{AuditEntry, EntityKind};
use super::ports::AuditSink;

/// Records audit entries, tolerating sink failures.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Create a recorder in front of the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append one entry; failures are logged and swallowed.
    pub async fn record(
        &self,
        action: &str,
        target_collection: EntityKind,
        target_id: impl Into<String>,
        actor: &Actor,
        details: Value,
    ) {
        let entry = AuditEntry::record(action, target_collection, target_id, actor, details);
        if let Err(error) = self.sink.append(&entry).await {
            warn!(
                %error,
                action = %entry.action,
                collection = %entry.target_collection,
                target = %entry.target_id,
                "audit append failed; primary operation stands"
            );
        }
    }
}
