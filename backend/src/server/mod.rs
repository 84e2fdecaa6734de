//! Server assembly: session middleware, route wiring and startup seeding.

pub mod config;
pub mod state;

#[cfg(feature = "example-data")]
pub mod seed;

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::SameSite;
use actix_web::web;

use crate::api::{clients, documents, health, session, todos, users};
use crate::domain::session::AuthResolver;
use crate::domain::{Capability, roles_holding};
use crate::middleware::RouteGuard;

use config::SessionSettings;
use state::PortalState;

/// Build the cookie-session middleware from validated settings.
#[must_use]
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Wire every route scope onto an app.
///
/// Admin-only scopes are wrapped with the role gate; the remaining portal
/// scopes admit any session with a resolved profile and rely on capability
/// checks inside the services. The session scope is left ungated so the
/// login and setup flows can run.
#[must_use]
pub fn configure_portal(
    state: web::Data<PortalState>,
    health_state: web::Data<health::HealthState>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let resolver: web::Data<dyn AuthResolver> =
            web::Data::from(Arc::clone(&state.resolver));
        cfg.app_data(state.clone())
            .app_data(resolver)
            .app_data(health_state)
            .service(
                web::scope("/healthz")
                    .service(health::live)
                    .service(health::ready),
            )
            .service(
                web::scope("/api/session")
                    .service(session::login)
                    .service(session::current)
                    .service(session::logout)
                    .service(session::setup),
            )
            .service(
                web::scope("/api/users")
                    .wrap(RouteGuard::allow(roles_holding(Capability::ManageUsers)))
                    .service(users::list_users)
                    .service(users::update_user)
                    .service(users::delete_user),
            )
            .service(
                web::scope("/api/invites")
                    .wrap(RouteGuard::allow(roles_holding(Capability::ManageInvites)))
                    .service(users::list_invites)
                    .service(users::create_invite)
                    .service(users::delete_invite),
            )
            .service(
                web::scope("/api/clients")
                    .wrap(RouteGuard::any_authenticated())
                    .service(clients::own_account)
                    .service(clients::list_clients)
                    .service(clients::create_client)
                    .service(documents::list_for_client)
                    .service(documents::upload)
                    .service(todos::list_for_client)
                    .service(todos::create)
                    .service(clients::get_client)
                    .service(clients::update_client)
                    .service(clients::assign_professionals)
                    .service(clients::delete_client),
            )
            .service(
                web::scope("/api/documents")
                    .wrap(RouteGuard::any_authenticated())
                    .service(documents::recent)
                    .service(documents::pending_count)
                    .service(documents::review)
                    .service(documents::delete),
            )
            .service(
                web::scope("/api/todos")
                    .wrap(RouteGuard::any_authenticated())
                    .service(todos::recent_open)
                    .service(todos::resolve),
            );
    }
}
