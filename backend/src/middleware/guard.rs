//! Role-gated navigation guard.
//!
//! Wraps a route scope with the portal's three-state gate: no session
//! redirects to `/login`, a session without a profile record redirects to
//! `/setup`, and a resolved profile outside the scope's allowed roles
//! redirects to the default landing route. The gate is re-evaluated on every
//! request; the only caching involved is the profile cache's own staleness
//! window.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse, ResponseError, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::api::error::ApiError;
use crate::domain::session::AuthResolver;
use crate::domain::{AuthState, EmailAddress, GateDecision, IdentityId, Role, evaluate_gate};

/// Session key holding the authenticated identity id.
pub const SESSION_IDENTITY_KEY: &str = "identity_id";
/// Session key holding the authenticated email address.
pub const SESSION_EMAIL_KEY: &str = "email";

/// Resolve the auth state for a session against the shared
/// [`AuthResolver`].
///
/// A missing or corrupt session resolves to
/// [`AuthState::Unauthenticated`]; resolver failures surface as domain
/// errors so callers answer with the usual envelope.
pub async fn resolve_session_state(
    session: &actix_session::Session,
    resolver: Option<&web::Data<dyn AuthResolver>>,
) -> Result<AuthState, ApiError> {
    let identity = session
        .get::<String>(SESSION_IDENTITY_KEY)
        .unwrap_or_default();
    let email = session.get::<String>(SESSION_EMAIL_KEY).unwrap_or_default();

    let (Some(identity), Some(email)) = (identity, email) else {
        return Ok(AuthState::Unauthenticated);
    };
    let (Ok(identity), Ok(email)) = (IdentityId::new(identity), EmailAddress::parse(email))
    else {
        // A session we wrote never contains these; treat tampering as signed
        // out.
        session.purge();
        return Ok(AuthState::Unauthenticated);
    };

    let Some(resolver) = resolver else {
        return Err(ApiError::internal("auth resolver is not configured"));
    };
    resolver
        .resolve_state(&identity, &email)
        .await
        .map_err(ApiError::from)
}

/// Resolve the auth state for an incoming service request.
pub async fn resolve_request_state(req: &ServiceRequest) -> Result<AuthState, ApiError> {
    let session = req.get_session();
    resolve_session_state(&session, req.app_data::<web::Data<dyn AuthResolver>>()).await
}

/// Route guard transform configured with the roles a scope admits.
#[derive(Clone)]
pub struct RouteGuard {
    allowed: Rc<Vec<Role>>,
}

impl RouteGuard {
    /// Admit only the given roles.
    #[must_use]
    pub fn allow(roles: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed: Rc::new(roles.into()),
        }
    }

    /// Admit any session with a resolved profile.
    #[must_use]
    pub fn any_authenticated() -> Self {
        Self {
            allowed: Rc::new(Vec::new()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware {
            service: Rc::new(service),
            allowed: Rc::clone(&self.allowed),
        }))
    }
}

/// Service wrapper produced by [`RouteGuard`].
pub struct RouteGuardMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<Role>>,
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = Rc::clone(&self.allowed);
        Box::pin(async move {
            let state = match resolve_request_state(&req).await {
                Ok(state) => state,
                Err(err) => {
                    let response = err.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            match evaluate_gate(&state, &allowed) {
                GateDecision::Allow => {
                    req.extensions_mut().insert(state);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                decision => {
                    let target = decision
                        .redirect_target()
                        .unwrap_or("/");
                    warn!(path = %req.path(), target, "navigation gated");
                    let response = HttpResponse::SeeOther()
                        .insert_header((header::LOCATION, target))
                        .finish();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
