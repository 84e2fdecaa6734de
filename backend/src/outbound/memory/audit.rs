//! Audit-sink port implementation over an in-memory, append-only log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::AuditEntry;
use crate::domain::ports::{AuditSink, AuditSinkError};

use super::{MemoryPlatform, write_guard};

/// An audit entry with the sink-stamped append time.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedAuditEntry {
    /// The entry as the recorder built it.
    pub entry: AuditEntry,
    /// Append time stamped by the sink.
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
impl AuditSink for MemoryPlatform {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditSinkError> {
        let stamped = StampedAuditEntry {
            entry: entry.clone(),
            timestamp: self.now(),
        };
        write_guard(&self.audit).push(stamped);
        Ok(())
    }
}
