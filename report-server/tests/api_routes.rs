//! HTTP surface tests through the full router

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{assignment, setup};
use report_server::api::build_app;

async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    actor: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, role)) = actor {
        builder = builder
            .header("x-actor-name", name)
            .header("x-actor-role", role);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const STAFF: Option<(&str, &str)> = Some(("Taro", "staff"));
const CHIEF: Option<(&str, &str)> = Some(("Suzuki", "chief"));
const SALES: Option<(&str, &str)> = Some(("Sato", "sales"));

#[tokio::test]
async fn create_returns_201_then_200() {
    let server = setup(vec![], false).await;
    let app = build_app().with_state(server.state.clone());
    let body = json!({ "report_date": "2025-11-01", "site_name": "Site A" });

    let (status, first) = call(&app, "POST", "/api/reports", STAFF, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "draft");

    let (status, second) = call(&app, "POST", "/api/reports", CHIEF, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn missing_role_header_is_rejected() {
    let server = setup(vec![], false).await;
    let app = build_app().with_state(server.state.clone());
    let body = json!({ "report_date": "2025-11-01", "site_name": "Site A" });

    let (status, value) = call(&app, "POST", "/api/reports", None, Some(body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["code"], 2002);
}

#[tokio::test]
async fn deleted_report_reads_as_not_found() {
    let server = setup(vec![], false).await;
    let app = build_app().with_state(server.state.clone());
    let body = json!({ "report_date": "2025-11-01", "site_name": "Site A" });
    let (_, report) = call(&app, "POST", "/api/reports", STAFF, Some(body)).await;
    let uri = format!("/api/reports/{}", report["id"]);

    let (status, _) = call(&app, "DELETE", &uri, STAFF, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, "DELETE", &uri, CHIEF, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, value) = call(&app, "GET", &uri, STAFF, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["code"], 4001);
    assert_eq!(value["details"]["report_id"], report["id"]);
}

#[tokio::test]
async fn transition_validates_status_literal() {
    let server = setup(vec![], false).await;
    let app = build_app().with_state(server.state.clone());
    let body = json!({ "report_date": "2025-11-01", "site_name": "Site A" });
    let (_, report) = call(&app, "POST", "/api/reports", STAFF, Some(body)).await;
    let uri = format!("/api/reports/{}/status", report["id"]);

    let (status, _) = call(&app, "POST", &uri, STAFF, Some(json!({ "status": "archived" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, outcome) = call(
        &app,
        "POST",
        &uri,
        SALES,
        Some(json!({ "status": "returned_by_sales", "reason": "missing time" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["previous_status"], "draft");
    assert_eq!(outcome["report"]["return_reason"], "missing time");
    assert_eq!(outcome["comments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_respects_role_view_and_assignment() {
    let server = setup(vec![assignment("2025-11-01", "SiteA", "Sato")], false).await;
    let app = build_app().with_state(server.state.clone());

    for site in ["Site A", "Site B"] {
        let body = json!({ "report_date": "2025-11-01", "site_name": site });
        let (_, report) = call(&app, "POST", "/api/reports", STAFF, Some(body)).await;
        let uri = format!("/api/reports/{}/status", report["id"]);
        call(&app, "POST", &uri, CHIEF, Some(json!({ "status": "chief_submitted_to_sales" }))).await;
    }
    let body = json!({ "report_date": "2025-11-01", "site_name": "Site C" });
    call(&app, "POST", "/api/reports", STAFF, Some(body)).await;

    let (_, all) = call(&app, "GET", "/api/reports", STAFF, None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, visible) = call(&app, "GET", "/api/reports", SALES, None).await;
    assert_eq!(visible.as_array().unwrap().len(), 2);

    let (status, mine) = call(&app, "GET", "/api/reports?assigned_staff=Sato", SALES, None).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["site_name"], "Site A");
}

#[tokio::test]
async fn sheet_sync_clears_cache() {
    let server = setup(vec![assignment("2025-11-01", "Site A", "Sato")], false).await;
    let app = build_app().with_state(server.state.clone());
    let mut conn = server.state.registry.connect();

    let (status, value) = call(
        &app,
        "GET",
        "/api/assignments/resolve?date=2025-11-01&site_name=Site%20A",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "assigned");
    assert_eq!(value["staff_name"], "Sato");

    let (status, _) = call(
        &app,
        "POST",
        "/api/sheets/roster-2025-11/synced",
        None,
        Some(json!({ "row_count": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        conn.rx.recv().await.unwrap(),
        shared::message::RealtimeEvent::SheetSynced {
            sheet_id: "roster-2025-11".into(),
            row_count: 42,
        }
    );
}

#[tokio::test]
async fn staff_entry_routes() {
    let server = setup(vec![], false).await;
    let app = build_app().with_state(server.state.clone());
    let body = json!({ "report_date": "2025-11-01", "site_name": "Site A" });
    let (_, report) = call(&app, "POST", "/api/reports", STAFF, Some(body)).await;
    let id = &report["id"];

    let (status, entry) = call(
        &app,
        "PUT",
        &format!("/api/reports/{id}/staff/Taro"),
        STAFF,
        Some(json!({ "report_content": "Painted walls", "laundry_allowance": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["laundry_allowance"], true);

    let (_, detail) = call(&app, "GET", &format!("/api/reports/{id}"), STAFF, None).await;
    assert_eq!(detail["staff_entries"].as_array().unwrap().len(), 1);
    assert_eq!(detail["photo_count"], 0);

    let uri = format!("/api/reports/{id}/staff-entries/{}", entry["id"]);
    let (status, _) = call(&app, "DELETE", &uri, CHIEF, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, value) = call(&app, "DELETE", &uri, CHIEF, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["code"], 4003);
}
