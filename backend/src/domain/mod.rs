//! Domain primitives, entities and services for the portal core.
//!
//! The domain is transport agnostic: entities and services know nothing
//! about HTTP or the concrete remote platform. Adapters live behind the
//! traits in [`ports`]; the HTTP layer consumes the services and the
//! navigation gate.

pub mod access;
pub mod audit;
pub mod audit_service;
pub mod auth;
pub mod client;
pub mod client_service;
pub mod document;
pub mod document_service;
pub mod error;
pub mod identity;
pub mod invite;
pub mod linkage;
pub mod ports;
pub mod profile;
pub mod role;
pub mod session;
pub mod todo;
pub mod todo_service;
pub mod user_service;

pub use self::access::{AccessScope, Actor, sort_recent_in_memory};
pub use self::audit::{AuditEntry, EntityKind};
pub use self::audit_service::AuditRecorder;
pub use self::auth::{
    AuthState, GateDecision, LoginCredentials, LoginValidationError, evaluate_gate,
};
pub use self::client::{ClientAccount, ClientAccountPatch, NewClientAccount};
pub use self::client_service::ClientService;
pub use self::document::{DocumentFile, DocumentStatus, DocumentUpload, storage_path_for};
pub use self::document_service::DocumentService;
pub use self::error::{DomainError, ErrorCode};
pub use self::identity::{
    EmailAddress, EmailValidationError, IdValidationError, IdentityId, RecordId,
};
pub use self::invite::{Invite, NewInvite};
pub use self::linkage::{OwnerLinkage, reconcile};
pub use self::profile::{UserProfile, UserProfilePatch};
pub use self::role::{Capability, Role, capabilities, roles_holding};
pub use self::session::{AuthResolver, ProfileCache};
pub use self::todo::{NewTodo, Todo, TodoAudience, TodoStatus};
pub use self::todo_service::TodoService;
pub use self::user_service::UserService;

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
