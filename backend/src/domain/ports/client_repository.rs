//! Port for client account records in the remote store.

use async_trait::async_trait;

use crate::domain::access::AccessScope;
use crate::domain::client::{ClientAccount, ClientAccountPatch, NewClientAccount};
use crate::domain::identity::{IdentityId, RecordId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by client repository adapters.
    pub enum ClientRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "client repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "client repository query failed: {message}",
        /// The referenced record does not exist.
        Missing { id: String } =>
            "client record {id} does not exist",
    }
}

/// Port for client account storage and retrieval.
///
/// Adapters stamp `created_at`/`updated_at` themselves, mirroring a store
/// with server-generated timestamps; `merge` refreshes `updated_at` on every
/// call whether or not the patch changed anything.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Full collection, ordered newest first by the store.
    ///
    /// Only the unrestricted scope may call this; scoped callers use
    /// [`ClientRepository::list_assigned_to`] or
    /// [`ClientRepository::find_active_by_linked_user`].
    async fn list_all_ordered(&self) -> Result<Vec<ClientAccount>, ClientRepositoryError>;

    /// Fetch one record by id.
    async fn find_by_id(
        &self,
        id: &RecordId,
    ) -> Result<Option<ClientAccount>, ClientRepositoryError>;

    /// Active records linked to the given portal login.
    ///
    /// Used both for the uniqueness check at create/update time and for the
    /// client portal's own account lookup.
    async fn find_active_by_linked_user(
        &self,
        user: &IdentityId,
    ) -> Result<Vec<ClientAccount>, ClientRepositoryError>;

    /// Active records whose assignment set contains the professional.
    ///
    /// Membership-filtered, so the store returns them unordered.
    async fn list_assigned_to(
        &self,
        professional: &IdentityId,
        limit: usize,
    ) -> Result<Vec<ClientAccount>, ClientRepositoryError>;

    /// Insert a new account under the caller-generated id.
    ///
    /// New accounts start active with an empty assignment set.
    async fn insert(
        &self,
        id: &RecordId,
        account: &NewClientAccount,
    ) -> Result<ClientAccount, ClientRepositoryError>;

    /// Merge the patch into an existing record and refresh `updated_at`.
    async fn merge(
        &self,
        id: &RecordId,
        patch: &ClientAccountPatch,
    ) -> Result<ClientAccount, ClientRepositoryError>;

    /// Replace the assignment set wholesale and refresh `updated_at`.
    async fn replace_assignments(
        &self,
        id: &RecordId,
        professional_ids: &[IdentityId],
    ) -> Result<ClientAccount, ClientRepositoryError>;

    /// Remove the record. Child documents and todos are left in place.
    async fn delete(&self, id: &RecordId) -> Result<(), ClientRepositoryError>;
}

/// Check whether a scope may see the given account at all.
///
/// Shared by service `get` paths so a scoped caller reading a foreign
/// account gets the same not-found answer the store's rules would give.
#[must_use]
pub fn visible_to(account: &ClientAccount, scope: &AccessScope) -> bool {
    scope.permits_client(account)
}
