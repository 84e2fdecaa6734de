//! Actix middleware: request tracing and the role-gated navigation guard.

pub mod guard;
pub mod trace;

pub use guard::{RouteGuard, SESSION_EMAIL_KEY, SESSION_IDENTITY_KEY};
pub use trace::{Trace, TraceId};
