//! Shared fixtures for the HTTP integration suites.
// Each suite compiles its own copy; not every suite uses every fixture.
#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::json;

use backend::Trace;
use backend::api::health::HealthState;
use backend::domain::{
    ClientAccount, EmailAddress, IdentityId, RecordId, Role, UserProfile,
};
use backend::outbound::MemoryPlatform;
use backend::server::config::SessionSettings;
use backend::server::state::PortalState;
use backend::server::{configure_portal, session_middleware};

/// Seeded logins shared across the suites.
pub struct TestLogin {
    pub email: &'static str,
    pub password: &'static str,
}

pub const ADMIN: TestLogin = TestLogin {
    email: "admin@firm.example",
    password: "admin-pass",
};
pub const PRO_ONE: TestLogin = TestLogin {
    email: "greta@firm.example",
    password: "pro-one-pass",
};
pub const PRO_TWO: TestLogin = TestLogin {
    email: "henrik@firm.example",
    password: "pro-two-pass",
};
pub const PORTAL_USER: TestLogin = TestLogin {
    email: "owner@acme.example",
    password: "portal-pass",
};

/// Identity ids behind the seeded logins.
pub const ADMIN_UID: &str = "uid-admin";
pub const PRO_ONE_UID: &str = "uid-pro-1";
pub const PRO_TWO_UID: &str = "uid-pro-2";
pub const PORTAL_UID: &str = "uid-portal";

/// Seeded client account ids.
pub const CLIENT_ACME: &str = "client-acme";
pub const CLIENT_BOREAL: &str = "client-boreal";

fn identity(raw: &str) -> IdentityId {
    IdentityId::new(raw).expect("valid id")
}

fn email(raw: &str) -> EmailAddress {
    EmailAddress::parse(raw).expect("valid address")
}

fn seed_login(platform: &MemoryPlatform, uid: &str, login: &TestLogin, name: &str, role: Role) {
    platform.seed_profile(UserProfile {
        id: identity(uid),
        email: email(login.email),
        name: name.into(),
        role,
        active: true,
        created_at: chrono::Utc::now(),
    });
    platform.register_identity(login.email, login.password, identity(uid));
}

/// A platform with two professionals, one linked portal user and two client
/// accounts.
pub fn seeded_platform() -> Arc<MemoryPlatform> {
    let platform = Arc::new(MemoryPlatform::new(Arc::new(DefaultClock)));
    seed_login(&platform, ADMIN_UID, &ADMIN, "Astrid Admin", Role::Admin);
    seed_login(&platform, PRO_ONE_UID, &PRO_ONE, "Greta Ledger", Role::Professional);
    seed_login(&platform, PRO_TWO_UID, &PRO_TWO, "Henrik Ledger", Role::Professional);
    seed_login(&platform, PORTAL_UID, &PORTAL_USER, "Acme Owner", Role::Client);

    let now = chrono::Utc::now();
    platform.seed_client(ClientAccount {
        id: RecordId::new(CLIENT_ACME).expect("valid id"),
        linked_user_id: Some(identity(PORTAL_UID)),
        name: "Acme Ltd".into(),
        email: Some(email("billing@acme.example")),
        assigned_professional_ids: vec![identity(PRO_ONE_UID)],
        active: true,
        created_at: now,
        updated_at: now,
    });
    platform.seed_client(ClientAccount {
        id: RecordId::new(CLIENT_BOREAL).expect("valid id"),
        linked_user_id: None,
        name: "Boreal AB".into(),
        email: None,
        assigned_professional_ids: vec![identity(PRO_TWO_UID)],
        active: true,
        created_at: now,
        updated_at: now,
    });
    platform
}

/// Build the full portal app over the given platform.
pub async fn init_portal(
    platform: Arc<MemoryPlatform>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let state = web::Data::new(PortalState::self_contained(
        platform,
        Arc::new(DefaultClock),
    ));
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let settings = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
    };
    test::init_service(
        App::new()
            .wrap(Trace)
            .wrap(session_middleware(&settings))
            .configure(configure_portal(state, health)),
    )
    .await
}

/// Sign in and return the session cookie to replay on later requests.
pub async fn login<S, B>(app: &S, login: &TestLogin) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/session")
        .set_json(json!({ "email": login.email, "password": login.password }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(
        res.status().is_success(),
        "login failed with {}",
        res.status()
    );
    res.headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("session="))
        .and_then(|value| value.split(';').next())
        .expect("session cookie issued")
        .to_owned()
}
