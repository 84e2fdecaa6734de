//! Document endpoints: listing, upload, review and removal.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ProgressObserver;
use crate::domain::{DocumentFile, DocumentStatus, DocumentUpload, DomainError};
use crate::server::state::PortalState;

use super::clients::record_id_from_path;
use super::error::{ApiError, ApiResult};
use super::extract::CurrentActor;

/// Default number of rows for dashboard listings.
const DEFAULT_RECENT_LIMIT: usize = 5;

/// Upload metadata carried in the query string; the body is the raw file.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
    /// Firm-defined category label.
    pub category: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type of the payload.
    pub file_type: String,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// Dashboard listing limit.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentParams {
    /// Maximum rows to return; defaults to 5.
    pub limit: Option<usize>,
}

/// Documents of one client visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/clients/{id}/documents",
    responses((status = 200, description = "Documents in scope", body = [DocumentFile])),
    tags = ["documents"],
    operation_id = "listClientDocuments"
)]
#[get("/{id}/documents")]
pub async fn list_for_client(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<DocumentFile>>> {
    let client_id = record_id_from_path(&path)?;
    let documents = state
        .documents
        .list_for_client(&actor.0, &client_id)
        .await?;
    Ok(web::Json(documents))
}

/// Upload a document for a client account.
///
/// The handler loads the client context and stamps the permission fields
/// onto the new record; the raw request body is the file content.
#[utoipa::path(
    post,
    path = "/api/clients/{id}/documents",
    params(UploadParams),
    request_body(content = Vec<u8>, description = "Raw file content", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Document stored", body = DocumentFile),
        (status = 403, description = "Caller not linked to the account", body = ApiError),
        (status = 404, description = "Unknown or out-of-scope client", body = ApiError)
    ),
    tags = ["documents"],
    operation_id = "uploadDocument"
)]
#[post("/{id}/documents")]
pub async fn upload(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let client_id = record_id_from_path(&path)?;
    // The client context load doubles as the scope check; its linkage is
    // copied verbatim onto the new record.
    let client = state.clients.get(&actor.0, &client_id).await?;
    let params = params.into_inner();
    if params.file_name.trim().is_empty() || params.file_name.contains('/') {
        return Err(DomainError::invalid_request("bad file name").into());
    }

    let progress: ProgressObserver = Arc::new(|pct| debug!(pct, "upload progress"));
    let created = state
        .documents
        .upload(
            &actor.0,
            DocumentUpload {
                client_id: client.id.clone(),
                category: params.category,
                note: params.note,
                file_name: params.file_name,
                file_type: params.file_type,
                linkage: client.linkage(),
            },
            body,
            progress,
        )
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Most recent documents visible to the caller.
#[utoipa::path(
    get,
    path = "/api/documents/recent",
    params(RecentParams),
    responses((status = 200, description = "Recent documents", body = [DocumentFile])),
    tags = ["documents"],
    operation_id = "recentDocuments"
)]
#[get("/recent")]
pub async fn recent(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    params: web::Query<RecentParams>,
) -> ApiResult<web::Json<Vec<DocumentFile>>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let documents = state.documents.recent(&actor.0, limit).await?;
    Ok(web::Json(documents))
}

/// Number of pending documents awaiting the calling professional.
#[utoipa::path(
    get,
    path = "/api/documents/pending-count",
    responses((status = 200, description = "Pending count", body = usize)),
    tags = ["documents"],
    operation_id = "pendingDocumentCount"
)]
#[get("/pending-count")]
pub async fn pending_count(
    state: web::Data<PortalState>,
    actor: CurrentActor,
) -> ApiResult<web::Json<usize>> {
    let count = state.documents.pending_count(&actor.0).await?;
    Ok(web::Json(count))
}

/// Review payload for a pending document.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    /// Target status; only `approved` and `rejected` are reachable.
    pub status: DocumentStatus,
    /// Optional replacement note.
    pub note: Option<String>,
}

/// Approve or reject a pending document.
#[utoipa::path(
    patch,
    path = "/api/documents/{id}/status",
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Updated document", body = DocumentFile),
        (status = 409, description = "Status is terminal", body = ApiError)
    ),
    tags = ["documents"],
    operation_id = "reviewDocument"
)]
#[patch("/{id}/status")]
pub async fn review(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<DocumentFile>> {
    let id = record_id_from_path(&path)?;
    let payload = payload.into_inner();
    let updated = state
        .documents
        .set_status(&actor.0, &id, payload.status, payload.note)
        .await?;
    Ok(web::Json(updated))
}

/// Remove a document record and its backing blob.
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    responses((status = 204, description = "Document removed")),
    tags = ["documents"],
    operation_id = "deleteDocument"
)]
#[delete("/{id}")]
pub async fn delete(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = record_id_from_path(&path)?;
    state.documents.delete(&actor.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
