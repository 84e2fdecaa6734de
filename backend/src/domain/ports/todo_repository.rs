//! Port for task records in the remote store.

use async_trait::async_trait;

use crate::domain::access::AccessScope;
use crate::domain::identity::{IdentityId, RecordId};
use crate::domain::linkage::OwnerLinkage;
use crate::domain::role::Role;
use crate::domain::todo::{Todo, TodoAudience};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by todo repository adapters.
    pub enum TodoRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "todo repository query failed: {message}",
        /// The referenced record does not exist.
        Missing { id: String } =>
            "todo record {id} does not exist",
    }
}

/// Fully assembled record handed to the store at creation.
///
/// Adapters stamp timestamps and set the status to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodoRecord {
    /// Caller-generated record id.
    pub id: RecordId,
    /// Owning client account.
    pub client_id: RecordId,
    /// Short task title.
    pub title: String,
    /// Longer description, empty when none was given.
    pub description: String,
    /// Identity that raised the task.
    pub created_by: IdentityId,
    /// Role the creator held at creation time.
    pub created_by_role: Role,
    /// Audience the task is addressed to.
    pub audience: TodoAudience,
    /// Permission fields copied from the owning client.
    pub linkage: OwnerLinkage,
}

/// Port for task storage and retrieval.
///
/// The same ordering restriction as documents applies: scoped listings come
/// back unordered and are sorted by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Fetch one record by id.
    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Todo>, TodoRepositoryError>;

    /// Records of one client visible to the scope, unordered.
    async fn list_for_client(
        &self,
        client_id: &RecordId,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Open records visible to the scope, unordered.
    ///
    /// The unrestricted path filters by status alone; it deliberately skips
    /// store-side ordering so the status filter needs no composite index.
    async fn list_open_scoped(
        &self,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Write the record under its pre-generated id.
    async fn insert(&self, record: &NewTodoRecord) -> Result<Todo, TodoRepositoryError>;

    /// Mark the record resolved, stamping `resolved_at` and refreshing
    /// `updated_at`.
    async fn mark_resolved(&self, id: &RecordId) -> Result<Todo, TodoRepositoryError>;
}
