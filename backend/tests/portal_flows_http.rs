//! Behavioural tests for client, document and todo flows over the full app.

mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use backend::domain::{ClientAccount, DocumentFile, Todo};

use support::{
    ADMIN, CLIENT_ACME, PORTAL_UID, PORTAL_USER, PRO_ONE, PRO_TWO, init_portal, login,
    seeded_platform,
};

#[actix_web::test]
async fn listing_is_scoped_by_role() {
    let app = init_portal(seeded_platform()).await;

    let admin_cookie = login(&app, &ADMIN).await;
    let req = test::TestRequest::get()
        .uri("/api/clients")
        .insert_header((header::COOKIE, admin_cookie))
        .to_request();
    let all: Vec<ClientAccount> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 2);

    let pro_cookie = login(&app, &PRO_ONE).await;
    let req = test::TestRequest::get()
        .uri("/api/clients")
        .insert_header((header::COOKIE, pro_cookie))
        .to_request();
    let assigned: Vec<ClientAccount> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned.first().map(|c| c.id.as_str()), Some(CLIENT_ACME));

    let portal_cookie = login(&app, &PORTAL_USER).await;
    let req = test::TestRequest::get()
        .uri("/api/clients/me")
        .insert_header((header::COOKIE, portal_cookie))
        .to_request();
    let own: Option<ClientAccount> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own.map(|c| c.id.as_str().to_owned()), Some(CLIENT_ACME.to_owned()));
}

#[actix_web::test]
async fn duplicate_linked_user_conflicts_and_writes_nothing() {
    let platform = seeded_platform();
    let app = init_portal(std::sync::Arc::clone(&platform)).await;
    let cookie = login(&app, &ADMIN).await;

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .insert_header((header::COOKIE, cookie.clone()))
        .set_json(json!({
            "linkedUserId": PORTAL_UID,
            "name": "Copycat Ltd",
            "email": null
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/clients")
        .insert_header((header::COOKIE, cookie))
        .to_request();
    let all: Vec<ClientAccount> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 2, "no record was written");
}

#[actix_web::test]
async fn deactivating_twice_is_idempotent_and_audited_twice() {
    let platform = seeded_platform();
    let app = init_portal(std::sync::Arc::clone(&platform)).await;
    let cookie = login(&app, &ADMIN).await;

    for _ in 0..2 {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/clients/{CLIENT_ACME}"))
            .insert_header((header::COOKIE, cookie.clone()))
            .set_json(json!({ "active": false }))
            .to_request();
        let updated: ClientAccount = test::call_and_read_body_json(&app, req).await;
        assert!(!updated.active);
    }

    let updates = platform
        .audit_entries()
        .iter()
        .filter(|stamped| stamped.entry.action == "client_updated")
        .count();
    assert_eq!(updates, 2);
}

#[actix_web::test]
async fn upload_review_and_scope_interact_correctly() {
    let platform = seeded_platform();
    let app = init_portal(std::sync::Arc::clone(&platform)).await;

    // The portal user uploads a document for their own account.
    let portal_cookie = login(&app, &PORTAL_USER).await;
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/clients/{CLIENT_ACME}/documents?category=tax&fileName=ledger.pdf&fileType=application%2Fpdf"
        ))
        .insert_header((header::COOKIE, portal_cookie.clone()))
        .set_payload(vec![7_u8; 1024])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: DocumentFile = test::read_body_json(res).await;
    assert_eq!(created.status, backend::domain::DocumentStatus::Pending);
    let segment = created.storage_path.split('/').nth(3).map(str::to_owned);
    assert_eq!(segment.as_deref(), Some(created.id.as_str()));

    // The assigned professional sees it and a pending count of one.
    let pro_cookie = login(&app, &PRO_ONE).await;
    let req = test::TestRequest::get()
        .uri("/api/documents/pending-count")
        .insert_header((header::COOKIE, pro_cookie.clone()))
        .to_request();
    let count: usize = test::call_and_read_body_json(&app, req).await;
    assert_eq!(count, 1);

    // The other professional is not assigned and sees nothing.
    let other_cookie = login(&app, &PRO_TWO).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/clients/{CLIENT_ACME}/documents"))
        .insert_header((header::COOKIE, other_cookie))
        .to_request();
    let foreign: Vec<DocumentFile> = test::call_and_read_body_json(&app, req).await;
    assert!(foreign.is_empty());

    // Approve, then observe that the terminal status refuses a second move.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/documents/{}/status", created.id))
        .insert_header((header::COOKIE, pro_cookie.clone()))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let reviewed: DocumentFile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reviewed.status, backend::domain::DocumentStatus::Approved);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/documents/{}/status", created.id))
        .insert_header((header::COOKIE, pro_cookie))
        .set_json(json!({ "status": "rejected" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn portal_upload_is_visible_to_the_uploader() {
    let app = init_portal(seeded_platform()).await;
    let cookie = login(&app, &PORTAL_USER).await;

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/clients/{CLIENT_ACME}/documents?category=receipts&fileName=march.pdf&fileType=application%2Fpdf&note=march%20receipts"
        ))
        .insert_header((header::COOKIE, cookie.clone()))
        .set_payload(vec![1_u8; 64])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/clients/{CLIENT_ACME}/documents"))
        .insert_header((header::COOKIE, cookie))
        .to_request();
    let documents: Vec<DocumentFile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents.first().map(|d| d.note.as_str()), Some("march receipts"));
}

#[actix_web::test]
async fn todo_round_trip_from_creation_to_resolution() {
    let app = init_portal(seeded_platform()).await;

    // The assigned professional raises a task for the portal user.
    let pro_cookie = login(&app, &PRO_ONE).await;
    let req = test::TestRequest::post()
        .uri(&format!("/api/clients/{CLIENT_ACME}/todos"))
        .insert_header((header::COOKIE, pro_cookie.clone()))
        .set_json(json!({
            "title": "Send bank statements",
            "description": "January through March",
            "audience": "client"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Todo = test::read_body_json(res).await;
    assert_eq!(created.status, backend::domain::TodoStatus::Open);
    assert!(created.resolved_at.is_none());

    // It shows up in the portal user's open list.
    let portal_cookie = login(&app, &PORTAL_USER).await;
    let req = test::TestRequest::get()
        .uri("/api/todos/recent-open")
        .insert_header((header::COOKIE, portal_cookie.clone()))
        .to_request();
    let open: Vec<Todo> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(open.len(), 1);

    // The professional is not in the client audience.
    let req = test::TestRequest::post()
        .uri(&format!("/api/todos/{}/resolve", created.id))
        .insert_header((header::COOKIE, pro_cookie))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The portal user resolves it; the resolution is stamped.
    let req = test::TestRequest::post()
        .uri(&format!("/api/todos/{}/resolve", created.id))
        .insert_header((header::COOKIE, portal_cookie.clone()))
        .to_request();
    let resolved: Todo = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resolved.status, backend::domain::TodoStatus::Resolved);
    assert!(resolved.resolved_at.is_some());

    // Resolving again conflicts.
    let req = test::TestRequest::post()
        .uri(&format!("/api/todos/{}/resolve", created.id))
        .insert_header((header::COOKIE, portal_cookie))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn assignment_replacement_moves_visibility() {
    let platform = seeded_platform();
    let app = init_portal(std::sync::Arc::clone(&platform)).await;
    let admin_cookie = login(&app, &ADMIN).await;

    // Hand Acme to the second professional wholesale.
    let req = test::TestRequest::put()
        .uri(&format!("/api/clients/{CLIENT_ACME}/professionals"))
        .insert_header((header::COOKIE, admin_cookie))
        .set_json(json!({ "professionalIds": [support::PRO_TWO_UID] }))
        .to_request();
    let updated: ClientAccount = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.assigned_professional_ids.len(), 1);

    let pro_one_cookie = login(&app, &PRO_ONE).await;
    let req = test::TestRequest::get()
        .uri("/api/clients")
        .insert_header((header::COOKIE, pro_one_cookie))
        .to_request();
    let mine: Vec<ClientAccount> = test::call_and_read_body_json(&app, req).await;
    assert!(mine.is_empty(), "assignment was replaced, not merged");
}

#[actix_web::test]
async fn recent_documents_are_newest_first_for_admins() {
    let platform = seeded_platform();
    let app = init_portal(std::sync::Arc::clone(&platform)).await;
    let portal_cookie = login(&app, &PORTAL_USER).await;

    for name in ["one.pdf", "two.pdf", "three.pdf"] {
        let req = test::TestRequest::post()
            .uri(&format!(
                "/api/clients/{CLIENT_ACME}/documents?category=tax&fileName={name}&fileType=application%2Fpdf"
            ))
            .insert_header((header::COOKIE, portal_cookie.clone()))
            .set_payload(vec![0_u8; 16])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let admin_cookie = login(&app, &ADMIN).await;
    let req = test::TestRequest::get()
        .uri("/api/documents/recent?limit=2")
        .insert_header((header::COOKIE, admin_cookie))
        .to_request();
    let recent: Vec<DocumentFile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(recent.len(), 2);
    assert!(recent[0].created_at >= recent[1].created_at);
}

#[actix_web::test]
async fn audit_trail_records_the_mutation_chain() {
    let platform = seeded_platform();
    let app = init_portal(std::sync::Arc::clone(&platform)).await;
    let cookie = login(&app, &ADMIN).await;

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .insert_header((header::COOKIE, cookie.clone()))
        .set_json(json!({ "linkedUserId": null, "name": "Fresh Ltd", "email": null }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().expect("created id").to_owned();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/clients/{id}"))
        .insert_header((header::COOKIE, cookie))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let actions: Vec<String> = platform
        .audit_entries()
        .iter()
        .map(|stamped| stamped.entry.action.clone())
        .collect();
    assert!(actions.contains(&"client_created".to_owned()));
    assert!(actions.contains(&"client_deleted".to_owned()));
}
