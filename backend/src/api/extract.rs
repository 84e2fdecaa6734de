//! Request extractors for the resolved auth state and the acting caller.
//!
//! The guard middleware stores the resolved [`AuthState`] in request
//! extensions; these extractors read it back, falling back to a fresh
//! resolution for routes that are not wrapped by the guard.

use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::session::AuthResolver;
use crate::domain::{Actor, AuthState, DomainError};
use crate::middleware::guard::resolve_session_state;

use super::error::ApiError;

/// The resolved three-state authentication context for this request.
#[derive(Debug, Clone)]
pub struct AuthContext(pub AuthState);

impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if let Some(state) = req.extensions().get::<AuthState>() {
                return Ok(AuthContext(state.clone()));
            }
            let session = req.get_session();
            let state =
                resolve_session_state(&session, req.app_data::<web::Data<dyn AuthResolver>>())
                    .await?;
            Ok(AuthContext(state))
        })
    }
}

/// The acting caller: an authenticated session with a resolved profile.
///
/// Fails with `unauthorized` when there is no session and `forbidden` when
/// the session's identity has not redeemed its invite yet.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl FromRequest for CurrentActor {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let context = AuthContext::from_request(req, payload);
        Box::pin(async move {
            match context.await?.0 {
                AuthState::Authorized(profile) => {
                    Ok(CurrentActor(Actor::new(profile.id, profile.role)))
                }
                AuthState::NeedsSetup { .. } => Err(ApiError::from(DomainError::forbidden(
                    "profile setup is required before using the portal",
                ))),
                AuthState::Unauthenticated => Err(ApiError::from(DomainError::unauthorized(
                    "sign in to use the portal",
                ))),
            }
        })
    }
}
