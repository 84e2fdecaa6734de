//! Port for the append-only audit trail.

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by audit sink adapters.
    pub enum AuditSinkError {
        /// Sink could not be reached.
        Connection { message: String } =>
            "audit sink connection failed: {message}",
        /// The sink refused the append.
        Rejected { message: String } =>
            "audit sink rejected the entry: {message}",
    }
}

/// Port for appending audit entries.
///
/// Appends are best-effort from the caller's point of view: the recorder in
/// front of this port logs and swallows every error. Adapters stamp the
/// entry's timestamp on append.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one entry to the trail.
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditSinkError>;
}

/// Sink that discards every entry.
///
/// Useful in unit tests where audit behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuditSink;

#[async_trait]
impl AuditSink for FixtureAuditSink {
    async fn append(&self, _entry: &AuditEntry) -> Result<(), AuditSinkError> {
        Ok(())
    }
}
