//! Document use-cases: scoped listing, two-phase upload, review and removal.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::json;
use tracing::warn;

use super::access::{Actor, sort_recent_in_memory};
use super::audit::EntityKind;
use super::audit_service::AuditRecorder;
use super::document::{DocumentFile, DocumentStatus, DocumentUpload, storage_path_for};
use super::error::DomainError;
use super::identity::RecordId;
use super::ports::{
    BlobStore, BlobStoreError, DocumentRepository, DocumentRepositoryError, NewDocumentRecord,
    ProgressObserver,
};
use super::role::{Capability, Role};

/// Per-client listing ceiling, matching the store rule set.
const CLIENT_LIST_LIMIT: usize = 100;
/// Records fetched for a scoped recent listing before the in-memory sort.
const SCOPED_RECENT_FETCH: usize = 50;
/// Records fetched for the pending-count query.
const PENDING_FETCH: usize = 100;

/// Document service implementing upload, review and listing use-cases.
pub struct DocumentService<R, B> {
    documents: Arc<R>,
    blobs: Arc<B>,
    audit: AuditRecorder,
}

impl<R, B> Clone for DocumentService<R, B> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            blobs: Arc::clone(&self.blobs),
            audit: self.audit.clone(),
        }
    }
}

impl<R, B> DocumentService<R, B> {
    /// Create a service over the given repositories and audit recorder.
    #[must_use]
    pub fn new(documents: Arc<R>, blobs: Arc<B>, audit: AuditRecorder) -> Self {
        Self {
            documents,
            blobs,
            audit,
        }
    }
}

fn map_document_error(error: DocumentRepositoryError) -> DomainError {
    match error {
        DocumentRepositoryError::Connection { message } => {
            DomainError::unavailable(format!("document repository unavailable: {message}"))
        }
        DocumentRepositoryError::Query { message } => {
            DomainError::internal(format!("document repository error: {message}"))
        }
        DocumentRepositoryError::Missing { id } => {
            DomainError::not_found(format!("document {id} does not exist"))
        }
    }
}

fn map_blob_error(error: BlobStoreError) -> DomainError {
    match error {
        BlobStoreError::Connection { message } => {
            DomainError::unavailable(format!("blob store unavailable: {message}"))
        }
        BlobStoreError::Transfer { message } => {
            DomainError::unavailable(format!("blob transfer failed: {message}"))
        }
    }
}

impl<R, B> DocumentService<R, B>
where
    R: DocumentRepository,
    B: BlobStore,
{
    /// Documents of one client visible to the caller, newest first.
    pub async fn list_for_client(
        &self,
        actor: &Actor,
        client_id: &RecordId,
    ) -> Result<Vec<DocumentFile>, DomainError> {
        let records = self
            .documents
            .list_for_client(client_id, &actor.scope(), CLIENT_LIST_LIMIT)
            .await
            .map_err(map_document_error)?;
        Ok(sort_recent_in_memory(
            records,
            |record| record.created_at,
            CLIENT_LIST_LIMIT,
        ))
    }

    /// Number of pending documents awaiting the professional.
    ///
    /// Other roles get 0 without a store round-trip; the count itself is
    /// computed in memory to keep the query free of composite predicates.
    pub async fn pending_count(&self, actor: &Actor) -> Result<usize, DomainError> {
        if actor.role != Role::Professional {
            return Ok(0);
        }
        let records = self
            .documents
            .list_scoped(&actor.scope(), PENDING_FETCH)
            .await
            .map_err(map_document_error)?;
        Ok(records
            .iter()
            .filter(|record| record.status == DocumentStatus::Pending)
            .count())
    }

    /// Most recent documents visible to the caller.
    ///
    /// The unrestricted scope asks the store to order and truncate; scoped
    /// callers fetch by predicate and sort in memory.
    pub async fn recent(
        &self,
        actor: &Actor,
        limit: usize,
    ) -> Result<Vec<DocumentFile>, DomainError> {
        let scope = actor.scope();
        let records = if scope.supports_store_ordering() {
            self.documents
                .list_recent_ordered(limit)
                .await
                .map_err(map_document_error)?
        } else {
            self.documents
                .list_scoped(&scope, SCOPED_RECENT_FETCH)
                .await
                .map_err(map_document_error)?
        };
        Ok(sort_recent_in_memory(
            records,
            |record| record.created_at,
            limit,
        ))
    }

    /// Two-phase upload: stream the blob, then write the record.
    ///
    /// The record id is generated first so the storage path segment and the
    /// record id match. If the record write fails after the blob landed, the
    /// blob is deleted as best-effort compensation; a crash between the
    /// phases can still leave an orphaned blob behind.
    pub async fn upload(
        &self,
        actor: &Actor,
        upload: DocumentUpload,
        bytes: Bytes,
        progress: ProgressObserver,
    ) -> Result<DocumentFile, DomainError> {
        if !actor.role.allows(Capability::UploadDocuments) {
            return Err(DomainError::forbidden("role may not upload documents"));
        }
        if !actor.scope().permits_linkage(&upload.linkage) {
            return Err(DomainError::forbidden(
                "caller is not linked to this client account",
            ));
        }

        let id = RecordId::generate();
        let storage_path = storage_path_for(&upload.client_id, &id, &upload.file_name);

        let download_url = self
            .blobs
            .put(&storage_path, bytes.clone(), progress)
            .await
            .map_err(map_blob_error)?;

        let record = NewDocumentRecord {
            id,
            client_id: upload.client_id.clone(),
            uploaded_by: actor.identity.clone(),
            uploaded_by_role: actor.role,
            category: upload.category,
            note: upload.note.unwrap_or_default(),
            file_name: upload.file_name,
            file_type: upload.file_type,
            file_size: bytes.len() as u64,
            storage_path: storage_path.clone(),
            download_url,
            linkage: upload.linkage,
        };

        let created = match self.documents.insert(&record).await {
            Ok(created) => created,
            Err(error) => {
                // Compensate phase one; an orphaned blob beats a phantom record.
                if let Err(cleanup) = self.blobs.delete(&storage_path).await {
                    warn!(%cleanup, path = %storage_path, "orphaned blob left behind");
                }
                return Err(map_document_error(error));
            }
        };

        self.audit
            .record(
                "document_uploaded",
                EntityKind::Documents,
                created.id.as_str(),
                actor,
                json!({
                    "fileName": created.file_name,
                    "clientId": created.client_id.as_str(),
                }),
            )
            .await;
        Ok(created)
    }

    /// Move a pending document to approved or rejected.
    ///
    /// Transitions out of a terminal status are refused as conflicts; the
    /// interface never offers them.
    pub async fn set_status(
        &self,
        actor: &Actor,
        id: &RecordId,
        status: DocumentStatus,
        note: Option<String>,
    ) -> Result<DocumentFile, DomainError> {
        if !actor.role.allows(Capability::ReviewDocuments) {
            return Err(DomainError::forbidden("role may not review documents"));
        }

        let current = self
            .documents
            .find_by_id(id)
            .await
            .map_err(map_document_error)?
            .ok_or_else(|| DomainError::not_found(format!("document {id} does not exist")))?;
        if !current.status.can_transition_to(status) {
            return Err(DomainError::conflict(format!(
                "no transition from {:?} to {status:?}",
                current.status
            )));
        }

        let updated = self
            .documents
            .merge_status(id, status, note.as_deref())
            .await
            .map_err(map_document_error)?;

        self.audit
            .record(
                "document_status_changed",
                EntityKind::Documents,
                updated.id.as_str(),
                actor,
                json!({ "status": updated.status }),
            )
            .await;
        Ok(updated)
    }

    /// Remove a document record and its backing blob.
    ///
    /// The blob is attempted first and a missing blob is tolerated, so a
    /// record whose bytes were lost can still be cleaned up.
    pub async fn delete(&self, actor: &Actor, id: &RecordId) -> Result<(), DomainError> {
        if !actor.role.allows(Capability::DeleteDocuments) {
            return Err(DomainError::forbidden("role may not delete documents"));
        }

        let record = self
            .documents
            .find_by_id(id)
            .await
            .map_err(map_document_error)?
            .ok_or_else(|| DomainError::not_found(format!("document {id} does not exist")))?;

        if let Err(error) = self.blobs.delete(&record.storage_path).await {
            warn!(%error, path = %record.storage_path, "blob missing during delete");
        }
        self.documents.delete(id).await.map_err(map_document_error)?;

        self.audit
            .record(
                "document_deleted",
                EntityKind::Documents,
                id.as_str(),
                actor,
                json!({}),
            )
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::access::AccessScope;
    use crate::domain::identity::IdentityId;
    use crate::domain::linkage::OwnerLinkage;
    use crate::domain::ports::{
        FixtureAuditSink, MockBlobStore, MockDocumentRepository, silent_progress,
    };
    use chrono::Utc;
    use std::sync::Mutex;

    fn admin() -> Actor {
        Actor::new(IdentityId::new("admin-1").expect("valid id"), Role::Admin)
    }

    fn professional(id: &str) -> Actor {
        Actor::new(IdentityId::new(id).expect("valid id"), Role::Professional)
    }

    fn stored(id: &str, status: DocumentStatus) -> DocumentFile {
        DocumentFile {
            id: RecordId::new(id).expect("valid id"),
            client_id: RecordId::new("c-1").expect("valid id"),
            uploaded_by: IdentityId::new("login-1").expect("valid id"),
            uploaded_by_role: Role::Client,
            category: "tax".into(),
            note: String::new(),
            file_name: "ledger.pdf".into(),
            file_type: "application/pdf".into(),
            file_size: 3,
            storage_path: format!("clients/c-1/documents/{id}/ledger.pdf"),
            download_url: format!("memory://clients/c-1/documents/{id}/ledger.pdf"),
            status,
            linkage: OwnerLinkage::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        repo: MockDocumentRepository,
        blobs: MockBlobStore,
    ) -> DocumentService<MockDocumentRepository, MockBlobStore> {
        DocumentService::new(
            Arc::new(repo),
            Arc::new(blobs),
            AuditRecorder::new(Arc::new(FixtureAuditSink)),
        )
    }

    fn upload_for(linked: &str) -> DocumentUpload {
        DocumentUpload {
            client_id: RecordId::new("c-1").expect("valid id"),
            category: "tax".into(),
            note: None,
            file_name: "ledger.pdf".into(),
            file_type: "application/pdf".into(),
            linkage: OwnerLinkage::new(
                Some(IdentityId::new(linked).expect("valid id")),
                vec![IdentityId::new("pro-1").expect("valid id")],
            ),
        }
    }

    #[tokio::test]
    async fn upload_writes_record_under_the_storage_path_id() {
        let mut blobs = MockBlobStore::new();
        blobs
            .expect_put()
            .times(1)
            .returning(|path, _, _| Ok(format!("memory://{path}")));

        let inserted: Arc<Mutex<Option<NewDocumentRecord>>> = Arc::default();
        let captured = Arc::clone(&inserted);
        let mut repo = MockDocumentRepository::new();
        repo.expect_insert().times(1).returning(move |record| {
            *captured.lock().expect("capture lock") = Some(record.clone());
            Ok(stored(record.id.as_str(), DocumentStatus::Pending))
        });

        let service = service(repo, blobs);
        let actor = professional("pro-1");
        service
            .upload(
                &actor,
                upload_for("login-1"),
                Bytes::from_static(b"pdf"),
                silent_progress(),
            )
            .await
            .expect("upload succeeds");

        let record = inserted.lock().expect("capture lock").clone().expect("record captured");
        let segments: Vec<&str> = record.storage_path.split('/').collect();
        assert_eq!(segments.get(3).copied(), Some(record.id.as_str()));
        assert_eq!(record.file_size, 3);
    }

    #[tokio::test]
    async fn failed_record_write_compensates_the_blob() {
        let mut blobs = MockBlobStore::new();
        blobs
            .expect_put()
            .times(1)
            .returning(|path, _, _| Ok(format!("memory://{path}")));
        blobs.expect_delete().times(1).returning(|_| Ok(()));

        let mut repo = MockDocumentRepository::new();
        repo.expect_insert()
            .times(1)
            .return_once(|_| Err(DocumentRepositoryError::query("write refused")));

        let service = service(repo, blobs);
        let err = service
            .upload(
                &professional("pro-1"),
                upload_for("login-1"),
                Bytes::from_static(b"pdf"),
                silent_progress(),
            )
            .await
            .expect_err("record write failed");
        assert_eq!(err.code(), crate::domain::ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn unassigned_professional_may_not_upload() {
        let repo = MockDocumentRepository::new();
        let blobs = MockBlobStore::new();
        let err = service(repo, blobs)
            .upload(
                &professional("pro-9"),
                upload_for("login-1"),
                Bytes::from_static(b"pdf"),
                silent_progress(),
            )
            .await
            .expect_err("outside the assignment set");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn terminal_status_refuses_further_transitions() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(stored("d-1", DocumentStatus::Approved))));
        repo.expect_merge_status().times(0);

        let err = service(repo, MockBlobStore::new())
            .set_status(
                &admin(),
                &RecordId::new("d-1").expect("valid id"),
                DocumentStatus::Rejected,
                None,
            )
            .await
            .expect_err("approved is terminal");
        assert_eq!(err.code(), crate::domain::ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn pending_count_is_zero_for_non_professionals() {
        let repo = MockDocumentRepository::new();
        let count = service(repo, MockBlobStore::new())
            .pending_count(&admin())
            .await
            .expect("count succeeds");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn pending_count_filters_in_memory() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_list_scoped()
            .withf(|scope: &AccessScope, _limit: &usize| {
                matches!(scope, AccessScope::AssignedProfessional(id) if id.as_str() == "pro-1")
            })
            .times(1)
            .return_once(|_, _| {
                Ok(vec![
                    stored("d-1", DocumentStatus::Pending),
                    stored("d-2", DocumentStatus::Approved),
                    stored("d-3", DocumentStatus::Pending),
                ])
            });

        let count = service(repo, MockBlobStore::new())
            .pending_count(&professional("pro-1"))
            .await
            .expect("count succeeds");
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn scoped_recent_sorts_in_memory() {
        let old = stored("d-old", DocumentStatus::Pending);
        let mut new = stored("d-new", DocumentStatus::Pending);
        new.created_at = old.created_at + chrono::Duration::minutes(5);
        let handout = vec![old, new];

        let mut repo = MockDocumentRepository::new();
        repo.expect_list_recent_ordered().times(0);
        repo.expect_list_scoped()
            .times(1)
            .return_once(move |_, _| Ok(handout));

        let recent = service(repo, MockBlobStore::new())
            .recent(&professional("pro-1"), 1)
            .await
            .expect("recent succeeds");
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.first().map(|r| r.id.as_str()), Some("d-new"));
    }

    #[tokio::test]
    async fn delete_tolerates_a_missing_blob() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(stored("d-1", DocumentStatus::Approved))));
        repo.expect_delete().times(1).return_once(|_| Ok(()));

        let mut blobs = MockBlobStore::new();
        blobs
            .expect_delete()
            .times(1)
            .return_once(|_| Err(BlobStoreError::transfer("object gone")));

        service(repo, blobs)
            .delete(&admin(), &RecordId::new("d-1").expect("valid id"))
            .await
            .expect("delete succeeds despite blob failure");
    }
}
