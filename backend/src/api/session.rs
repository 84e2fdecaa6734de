//! Session endpoints: login, logout, current state and invite redemption.

use actix_session::Session;
use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{AuthenticatedIdentity, IdentityProviderError};
use crate::domain::{AuthState, DomainError, EmailAddress, LoginCredentials, UserProfile};
use crate::middleware::{SESSION_EMAIL_KEY, SESSION_IDENTITY_KEY};
use crate::server::state::PortalState;

use super::error::{ApiError, ApiResult};
use super::extract::AuthContext;

/// Login payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address registered with the identity provider.
    #[schema(example = "ada@firm.example")]
    pub email: String,
    /// Account password.
    pub password: String,
}

/// The session's resolved state, as the UI consumes it.
#[derive(Debug, serde::Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionView {
    /// No valid session.
    #[serde(rename = "unauthenticated")]
    Unauthenticated,
    /// Session without a redeemed invite.
    #[serde(rename = "needsSetup")]
    NeedsSetup {
        /// Email the session authenticated with.
        email: EmailAddress,
    },
    /// Session with a resolved profile.
    #[serde(rename = "authorized")]
    Authorized {
        /// The caller's profile.
        profile: UserProfile,
    },
}

impl From<AuthState> for SessionView {
    fn from(state: AuthState) -> Self {
        match state {
            AuthState::Unauthenticated => Self::Unauthenticated,
            AuthState::NeedsSetup { email, .. } => Self::NeedsSetup { email },
            AuthState::Authorized(profile) => Self::Authorized { profile },
        }
    }
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionView),
        (status = 400, description = "Malformed credentials", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError)
    ),
    tags = ["session"],
    operation_id = "login"
)]
#[post("")]
pub async fn login(
    state: web::Data<PortalState>,
    session: Session,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| ApiError::from(DomainError::invalid_request(err.to_string())))?;

    let identity = state
        .identity
        .authenticate(&credentials)
        .await
        .map_err(|err| match err {
            IdentityProviderError::InvalidCredentials => {
                DomainError::unauthorized("invalid credentials")
            }
            IdentityProviderError::Unavailable { message } => DomainError::unavailable(message),
        })?;

    session.renew();
    session
        .insert(SESSION_IDENTITY_KEY, identity.id.as_str())
        .map_err(|err| ApiError::internal(format!("session write failed: {err}")))?;
    session
        .insert(SESSION_EMAIL_KEY, identity.email.as_str())
        .map_err(|err| ApiError::internal(format!("session write failed: {err}")))?;

    let resolved = state
        .resolver
        .resolve_state(&identity.id, &identity.email)
        .await?;
    info!(identity = %identity.id, "signed in");
    Ok(HttpResponse::Ok().json(SessionView::from(resolved)))
}

/// Current session state.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Resolved state", body = SessionView)),
    tags = ["session"],
    operation_id = "currentSession"
)]
#[get("")]
pub async fn current(context: AuthContext) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionView::from(context.0)))
}

/// Sign out and clear the session.
#[utoipa::path(
    delete,
    path = "/api/session",
    responses((status = 204, description = "Signed out")),
    tags = ["session"],
    operation_id = "logout"
)]
#[delete("")]
pub async fn logout(
    state: web::Data<PortalState>,
    session: Session,
    context: AuthContext,
) -> ApiResult<HttpResponse> {
    match &context.0 {
        AuthState::Authorized(profile) => state.resolver.forget(&profile.id),
        AuthState::NeedsSetup { identity, .. } => state.resolver.forget(identity),
        AuthState::Unauthenticated => {}
    }
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Redeem the pending invite for the signed-in identity.
///
/// Returns the resolved profile; idempotent when the profile already exists.
#[utoipa::path(
    post,
    path = "/api/session/setup",
    responses(
        (status = 200, description = "Profile resolved", body = SessionView),
        (status = 401, description = "No session", body = ApiError),
        (status = 404, description = "No invite for this email", body = ApiError)
    ),
    tags = ["session"],
    operation_id = "redeemInvite"
)]
#[post("/setup")]
pub async fn setup(
    state: web::Data<PortalState>,
    context: AuthContext,
) -> ApiResult<HttpResponse> {
    let identity = match context.0 {
        AuthState::Unauthenticated => {
            return Err(DomainError::unauthorized("sign in to finish setup").into());
        }
        AuthState::NeedsSetup { identity, email } => AuthenticatedIdentity {
            id: identity,
            email,
        },
        AuthState::Authorized(profile) => {
            // Fast path: nothing to redeem.
            return Ok(HttpResponse::Ok().json(SessionView::Authorized { profile }));
        }
    };

    let profile = state.users.redeem_invite(&identity).await?;
    state.resolver.forget(&identity.id);
    Ok(HttpResponse::Ok().json(SessionView::Authorized { profile }))
}
