//! Client-management portal backend.
//!
//! A thin access-control and data-shaping layer between the portal UI and a
//! managed remote platform (identity provider, document-oriented record
//! store, blob store). The domain holds the entities, role capabilities,
//! access scoping and services; adapters implement the platform ports; the
//! HTTP layer exposes the use-cases behind a role-gated navigation guard.

pub mod api;
pub mod doc;
pub mod domain;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
