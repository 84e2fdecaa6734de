//! Port for document records in the remote store.

use async_trait::async_trait;

use crate::domain::access::AccessScope;
use crate::domain::document::{DocumentFile, DocumentStatus};
use crate::domain::identity::{IdentityId, RecordId};
use crate::domain::linkage::OwnerLinkage;
use crate::domain::role::Role;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "document repository query failed: {message}",
        /// The referenced record does not exist.
        Missing { id: String } =>
            "document record {id} does not exist",
    }
}

/// Fully assembled record handed to the store after the blob upload.
///
/// The id is generated before the blob write so the storage path segment and
/// the record id always match; adapters stamp timestamps and set the status
/// to [`DocumentStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocumentRecord {
    /// Caller-generated record id, already embedded in `storage_path`.
    pub id: RecordId,
    /// Owning client account.
    pub client_id: RecordId,
    /// Identity that performed the upload.
    pub uploaded_by: IdentityId,
    /// Role the uploader held at upload time.
    pub uploaded_by_role: Role,
    /// Firm-defined category label.
    pub category: String,
    /// Free-text note, empty when none was given.
    pub note: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the uploader.
    pub file_type: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Blob-store path the bytes were written to.
    pub storage_path: String,
    /// Locator handed back by the blob store.
    pub download_url: String,
    /// Permission fields copied from the owning client.
    pub linkage: OwnerLinkage,
}

/// Port for document record storage and retrieval.
///
/// Scoped listings (`list_for_client`, `list_scoped`) apply membership or
/// equality predicates and therefore return records unordered; only
/// [`DocumentRepository::list_recent_ordered`] may ask the store to order,
/// and only the unrestricted scope uses it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetch one record by id.
    async fn find_by_id(
        &self,
        id: &RecordId,
    ) -> Result<Option<DocumentFile>, DocumentRepositoryError>;

    /// Records of one client visible to the scope, unordered.
    async fn list_for_client(
        &self,
        client_id: &RecordId,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<DocumentFile>, DocumentRepositoryError>;

    /// Records visible to the scope across all clients, unordered.
    async fn list_scoped(
        &self,
        scope: &AccessScope,
        limit: usize,
    ) -> Result<Vec<DocumentFile>, DocumentRepositoryError>;

    /// Newest records first, ordered by the store. Unrestricted scope only.
    async fn list_recent_ordered(
        &self,
        limit: usize,
    ) -> Result<Vec<DocumentFile>, DocumentRepositoryError>;

    /// Write the record under its pre-generated id.
    async fn insert(
        &self,
        record: &NewDocumentRecord,
    ) -> Result<DocumentFile, DocumentRepositoryError>;

    /// Set the review status (and optionally replace the note), refreshing
    /// `updated_at`.
    async fn merge_status<'a>(
        &'a self,
        id: &'a RecordId,
        status: DocumentStatus,
        note: Option<&'a str>,
    ) -> Result<DocumentFile, DocumentRepositoryError>;

    /// Remove the record. The backing blob is the blob store's concern.
    async fn delete(&self, id: &RecordId) -> Result<(), DocumentRepositoryError>;
}
