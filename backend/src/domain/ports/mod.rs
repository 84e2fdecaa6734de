//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with the remote
//! platform (record store, blob store, identity provider, audit collector).
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

mod macros;

mod audit_sink;
mod blob_store;
mod client_repository;
mod document_repository;
mod identity_provider;
mod invite_repository;
mod profile_repository;
mod todo_repository;

#[cfg(test)]
pub use audit_sink::MockAuditSink;
pub use audit_sink::{AuditSink, AuditSinkError, FixtureAuditSink};
#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobStore, BlobStoreError, ProgressObserver, silent_progress};
#[cfg(test)]
pub use client_repository::MockClientRepository;
pub use client_repository::{ClientRepository, ClientRepositoryError, visible_to};
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{DocumentRepository, DocumentRepositoryError, NewDocumentRecord};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{AuthenticatedIdentity, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use invite_repository::MockInviteRepository;
pub use invite_repository::{InviteRepository, InviteRepositoryError};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{NewUserProfile, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{NewTodoRecord, TodoRepository, TodoRepositoryError};
