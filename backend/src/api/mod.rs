//! HTTP surface: handlers, extractors and the error envelope.

pub mod clients;
pub mod documents;
pub mod error;
pub mod extract;
pub mod health;
pub mod session;
pub mod todos;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use extract::{AuthContext, CurrentActor};
