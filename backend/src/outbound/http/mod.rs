//! HTTP adapters for remote collaborators.

mod audit_sink;

pub use audit_sink::HttpAuditSink;
