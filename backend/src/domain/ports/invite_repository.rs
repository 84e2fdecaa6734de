//! Port for pending invite records in the remote store.

use async_trait::async_trait;

use crate::domain::identity::EmailAddress;
use crate::domain::invite::{Invite, NewInvite};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by invite repository adapters.
    pub enum InviteRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "invite repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "invite repository query failed: {message}",
    }
}

/// Port for invite storage and retrieval.
///
/// The normalised email is the record id, so `put` is an upsert: issuing a
/// second invite for the same mailbox replaces the first rather than
/// duplicating it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Full collection, unordered.
    async fn list_all(&self) -> Result<Vec<Invite>, InviteRepositoryError>;

    /// Fetch one record by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Invite>, InviteRepositoryError>;

    /// Insert or replace the invite keyed by its email; adapters stamp
    /// `created_at`.
    async fn put(&self, invite: &NewInvite) -> Result<Invite, InviteRepositoryError>;

    /// Remove the invite for the given email. Removing an absent invite is
    /// not an error.
    async fn delete(&self, email: &EmailAddress) -> Result<(), InviteRepositoryError>;
}
