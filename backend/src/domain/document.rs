//! Document records and their review state machine.
//!
//! A document record pairs with a blob stored at
//! `clients/{client_id}/documents/{record_id}/{file_name}`; the path segment
//! and the record id are always the same generated id. Review status moves
//! from pending to approved or rejected, both terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::{IdentityId, RecordId};
use super::linkage::OwnerLinkage;
use super::role::Role;

/// Review status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Awaiting review.
    Pending,
    /// Accepted by an admin or professional. Terminal.
    Approved,
    /// Refused by an admin or professional. Terminal.
    Rejected,
}

impl DocumentStatus {
    /// Whether a transition from `self` to `next` is defined.
    ///
    /// Only `pending -> approved` and `pending -> rejected` exist; nothing
    /// leads out of a terminal status.
    #[must_use]
    pub fn can_transition_to(self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

/// A stored document and its review metadata.
///
/// ## Invariants
/// - `linkage` mirrors the owning client's fields as of upload time; it is
///   not rewritten when the client's assignments later change.
/// - `storage_path` contains `id` as its third path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    /// Record id; also the storage path segment.
    pub id: RecordId,
    /// Owning client account.
    pub client_id: RecordId,
    /// Identity that performed the upload.
    pub uploaded_by: IdentityId,
    /// Role the uploader held at upload time.
    pub uploaded_by_role: Role,
    /// Firm-defined category label.
    pub category: String,
    /// Free-text note shown alongside the document.
    pub note: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the uploader.
    pub file_type: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Blob-store path the bytes live at.
    pub storage_path: String,
    /// Locator handed back by the blob store after upload.
    pub download_url: String,
    /// Review status.
    pub status: DocumentStatus,
    /// Permission fields copied from the owning client at upload time.
    #[serde(flatten)]
    pub linkage: OwnerLinkage,
    /// Stamped by the record store on creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the record store on every merge.
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied metadata accompanying an upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    /// Owning client account.
    pub client_id: RecordId,
    /// Firm-defined category label.
    pub category: String,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the uploader.
    pub file_type: String,
    /// Permission fields from the owning client, loaded by the caller.
    #[serde(flatten)]
    pub linkage: OwnerLinkage,
}

/// Build the blob-store path for a document upload.
///
/// # Examples
/// ```
/// use backend::domain::{RecordId, storage_path_for};
///
/// let client = RecordId::new("c-1").expect("valid id");
/// let document = RecordId::new("d-1").expect("valid id");
/// assert_eq!(
///     storage_path_for(&client, &document, "ledger.pdf"),
///     "clients/c-1/documents/d-1/ledger.pdf"
/// );
/// ```
#[must_use]
pub fn storage_path_for(client_id: &RecordId, document_id: &RecordId, file_name: &str) -> String {
    format!("clients/{client_id}/documents/{document_id}/{file_name}")
}
