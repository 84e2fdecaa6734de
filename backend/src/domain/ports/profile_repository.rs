//! Port for user profile records in the remote store.

use async_trait::async_trait;

use crate::domain::identity::{EmailAddress, IdentityId};
use crate::domain::profile::{UserProfile, UserProfilePatch};
use crate::domain::role::Role;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
        /// The referenced record does not exist.
        Missing { id: String } =>
            "profile record {id} does not exist",
    }
}

/// Data required to create a profile at invite redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    /// Identity id the profile is keyed by.
    pub id: IdentityId,
    /// Normalised address the identity authenticated with.
    pub email: EmailAddress,
    /// Display name carried over from the invite.
    pub name: String,
    /// Role carried over from the invite.
    pub role: Role,
}

/// Port for user profile storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Full collection, unordered.
    async fn list_all(&self) -> Result<Vec<UserProfile>, ProfileRepositoryError>;

    /// Fetch one record by identity id.
    async fn find_by_id(
        &self,
        id: &IdentityId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError>;

    /// Fetch one record by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError>;

    /// Insert a new profile; adapters stamp `created_at` and set it active.
    async fn insert(
        &self,
        profile: &NewUserProfile,
    ) -> Result<UserProfile, ProfileRepositoryError>;

    /// Merge the patch into an existing record.
    async fn merge(
        &self,
        id: &IdentityId,
        patch: &UserProfilePatch,
    ) -> Result<UserProfile, ProfileRepositoryError>;

    /// Remove the record.
    async fn delete(&self, id: &IdentityId) -> Result<(), ProfileRepositoryError>;
}
