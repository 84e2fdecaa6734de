//! Admin endpoints for user profiles and invites.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    DomainError, EmailAddress, IdentityId, Invite, NewInvite, Role, UserProfile, UserProfilePatch,
};
use crate::server::state::PortalState;

use super::error::{ApiError, ApiResult};
use super::extract::CurrentActor;

fn identity_from_path(raw: &str) -> Result<IdentityId, ApiError> {
    IdentityId::new(raw)
        .map_err(|err| DomainError::invalid_request(format!("bad user id: {err}")).into())
}

fn email_from_path(raw: &str) -> Result<EmailAddress, ApiError> {
    EmailAddress::parse(raw)
        .map_err(|err| DomainError::invalid_request(format!("bad email: {err}")).into())
}

/// List all user profiles.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Profiles", body = [UserProfile]),
        (status = 403, description = "Not an administrator", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("")]
pub async fn list_users(
    state: web::Data<PortalState>,
    actor: CurrentActor,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let profiles = state.users.list_profiles(&actor.0).await?;
    Ok(web::Json(profiles))
}

/// Update a user profile (display name, active flag).
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    request_body = UserProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 404, description = "Unknown profile", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/{id}")]
pub async fn update_user(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
    patch: web::Json<UserProfilePatch>,
) -> ApiResult<web::Json<UserProfile>> {
    let id = identity_from_path(&path)?;
    let updated = state
        .users
        .update_profile(&actor.0, &id, patch.into_inner())
        .await?;
    Ok(web::Json(updated))
}

/// Delete a user profile.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    responses((status = 204, description = "Profile removed")),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = identity_from_path(&path)?;
    state.users.delete_profile(&actor.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Invite creation payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    /// Address the invite is issued to.
    pub email: String,
    /// Display name for the future profile.
    pub name: String,
    /// Role the future profile receives.
    pub role: Role,
}

/// List pending invites.
#[utoipa::path(
    get,
    path = "/api/invites",
    responses((status = 200, description = "Invites", body = [Invite])),
    tags = ["invites"],
    operation_id = "listInvites"
)]
#[get("")]
pub async fn list_invites(
    state: web::Data<PortalState>,
    actor: CurrentActor,
) -> ApiResult<web::Json<Vec<Invite>>> {
    let invites = state.users.list_invites(&actor.0).await?;
    Ok(web::Json(invites))
}

/// Issue an invite.
#[utoipa::path(
    post,
    path = "/api/invites",
    request_body = InviteRequest,
    responses(
        (status = 201, description = "Invite issued", body = Invite),
        (status = 409, description = "Email already registered", body = ApiError)
    ),
    tags = ["invites"],
    operation_id = "createInvite"
)]
#[post("")]
pub async fn create_invite(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    payload: web::Json<InviteRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let email = EmailAddress::parse(&payload.email)
        .map_err(|err| DomainError::invalid_request(format!("bad email: {err}")))?;
    let invite = state
        .users
        .create_invite(
            &actor.0,
            NewInvite {
                email,
                name: payload.name,
                role: payload.role,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(invite))
}

/// Revoke a pending invite.
#[utoipa::path(
    delete,
    path = "/api/invites/{email}",
    responses((status = 204, description = "Invite removed")),
    tags = ["invites"],
    operation_id = "deleteInvite"
)]
#[delete("/{email}")]
pub async fn delete_invite(
    state: web::Data<PortalState>,
    actor: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let email = email_from_path(&path)?;
    state.users.delete_invite(&actor.0, &email).await?;
    Ok(HttpResponse::NoContent().finish())
}
