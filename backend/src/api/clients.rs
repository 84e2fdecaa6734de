//! Client account endpoints.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    ClientAccount, ClientAccountPatch, DomainError, IdentityId, NewClientAccount, RecordId,
};
use crate::server::state::PortalState;

use super::error::{ApiError, ApiResult};
use super::extract::CurrentActor;

pub(crate) fn record_id_from_path(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::new(raw)
        .map_err(|err| DomainError::invalid_request(format!("bad record id: {err}")).into())
}

/// List the client accounts visible to the caller.
#[utoipa::path(
    get,
    path = "/api/clients",
    responses((status = 200, description = "Accounts in scope", body = [ClientAccount])),
    tags = ["clients"],
    operation_id = "listClients"
)]
#[get("")]
pub async fn list_clients(
    state: web::Data<PortalState>,
    actor: CurrentActor,
) -> ApiResult<web::Json<Vec<ClientAccount>>> {
    let accounts = state.clients.list(&actor.0).await?;
    Ok(web::Json(accounts))
}

/// The account linked to the calling portal user.
#[utoipa::path(
    get,
    path = "/api/clients/me",
    responses(
        (status = 200, description = "Linked account, or null when none is linked", body = ClientAccount),
        (status = 403, description = "Caller is not a portal user", body = ApiError)
    ),
    tags = ["clients"],
    operation_id = "ownClientAccount"
)]
#[get("/me")]
pub async fn own_account(
    state: web::Data<PortalState>,
    actor: CurrentActor,
) -> ApiResult<web::Json<Option<ClientAccount>>> {
    let account = state.clients.own_account(&actor.0).await?;
    Ok(web::Json(account))
}

/// Fetch one client account.
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    responses(
        (status = 200, description = "The account", body = ClientAccount),
        (status = 404, description = "Unknown or out of scope", body = ApiError)
    ),
    tags = ["clients"],
    operation_id = "getClient"
)]
#[get("/{id}")]
pub async fn get_client(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClientAccount>> {
    let id = record_id_from_path(&path)?;
    let account = state.clients.get(&actor.0, &id).await?;
    Ok(web::Json(account))
}

/// Open a new client account.
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = NewClientAccount,
    responses(
        (status = 201, description = "Account opened", body = ClientAccount),
        (status = 409, description = "Portal user already linked", body = ApiError)
    ),
    tags = ["clients"],
    operation_id = "createClient"
)]
#[post("")]
pub async fn create_client(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    payload: web::Json<NewClientAccount>,
) -> ApiResult<HttpResponse> {
    let created = state.clients.create(&actor.0, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Merge a partial update into a client account.
#[utoipa::path(
    patch,
    path = "/api/clients/{id}",
    request_body = ClientAccountPatch,
    responses(
        (status = 200, description = "Updated account", body = ClientAccount),
        (status = 409, description = "Portal user already linked", body = ApiError)
    ),
    tags = ["clients"],
    operation_id = "updateClient"
)]
#[patch("/{id}")]
pub async fn update_client(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
    patch: web::Json<ClientAccountPatch>,
) -> ApiResult<web::Json<ClientAccount>> {
    let id = record_id_from_path(&path)?;
    let updated = state
        .clients
        .update(&actor.0, &id, patch.into_inner())
        .await?;
    Ok(web::Json(updated))
}

/// Assignment replacement payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    /// The full replacement set of professional identity ids.
    pub professional_ids: Vec<String>,
}

/// Replace the professionals assigned to a client account.
#[utoipa::path(
    put,
    path = "/api/clients/{id}/professionals",
    request_body = AssignmentRequest,
    responses((status = 200, description = "Updated account", body = ClientAccount)),
    tags = ["clients"],
    operation_id = "assignProfessionals"
)]
#[put("/{id}/professionals")]
pub async fn assign_professionals(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<AssignmentRequest>,
) -> ApiResult<web::Json<ClientAccount>> {
    let id = record_id_from_path(&path)?;
    let professional_ids = payload
        .into_inner()
        .professional_ids
        .into_iter()
        .map(|raw| {
            IdentityId::new(raw)
                .map_err(|err| DomainError::invalid_request(format!("bad professional id: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let updated = state
        .clients
        .assign_professionals(&actor.0, &id, professional_ids)
        .await?;
    Ok(web::Json(updated))
}

/// Remove a client account.
///
/// Documents and todos belonging to the account are left in place.
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    responses((status = 204, description = "Account removed")),
    tags = ["clients"],
    operation_id = "deleteClient"
)]
#[delete("/{id}")]
pub async fn delete_client(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = record_id_from_path(&path)?;
    state.clients.delete(&actor.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
