//! Driven adapters implementing the domain ports.

pub mod http;
pub mod memory;

pub use http::HttpAuditSink;
pub use memory::{MemoryPlatform, StampedAuditEntry};
