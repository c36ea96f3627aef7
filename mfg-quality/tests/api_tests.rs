//! Integration tests for mfg-quality HTTP endpoints
//!
//! Tests cover:
//! - Health endpoint and permission grants
//! - Issue create/status/associations round trip
//! - Validation failures rendered with field paths
//! - Gauge calibration through the nested route
//! - Attachment listing and option lists

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mfg_common::api::{COMPANY_HEADER, PERMISSIONS_HEADER, USER_HEADER};
use mfg_common::storage::DocumentStore;
use mfg_quality::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

const ALL_GRANTS: &str = "quality_view,quality_create,quality_update,quality_delete";

async fn setup_app() -> (axum::Router, TempDir) {
    let pool = mfg_common::db::init_memory_database().await.unwrap();
    let root = TempDir::new().unwrap();
    let state = AppState::new(pool, DocumentStore::new(root.path()));
    (build_router(state), root)
}

fn request(method: &str, uri: &str, grants: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(COMPANY_HEADER, "acme")
        .header(USER_HEADER, "u1")
        .header(PERMISSIONS_HEADER, grants);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_issue(app: &axum::Router) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/issues",
            ALL_GRANTS,
            Some(json!({
                "name": "Cracked housing",
                "openDate": "2026-10-19",
                "priority": "High",
                "items": ["item-1"],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["readableId"], "NCR-00001");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint_needs_no_context() {
    let (app, _root) = setup_app().await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_requires_view_grant() {
    let (app, _root) = setup_app().await;
    let (status, body) = send(&app, request("GET", "/api/issues", "purchasing_view", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_issue_validation_paths() {
    let (app, _root) = setup_app().await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/issues",
            ALL_GRANTS,
            Some(json!({ "name": "Burr", "openDate": "2026-10-19", "dueDate": "2026-10-01" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["path"], "dueDate");
}

#[tokio::test]
async fn test_issue_round_trip() {
    let (app, _root) = setup_app().await;
    let id = create_issue(&app).await;

    let (status, issue) = send(&app, request("GET", &format!("/api/issues/{}", id), ALL_GRANTS, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issue["status"], "Registered");
    assert_eq!(issue["priority"], "High");
    assert_eq!(issue["openDate"], "2026-10-19");

    let (status, issue) = send(
        &app,
        request(
            "POST",
            &format!("/api/issues/{}/status", id),
            ALL_GRANTS,
            Some(json!({ "status": "In Progress" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issue["status"], "In Progress");

    let (_, page) = send(&app, request("GET", "/api/issues?status=In%20Progress", ALL_GRANTS, None)).await;
    assert_eq!(page["count"], 1);
    let (_, page) = send(&app, request("GET", "/api/issues?status=Closed", ALL_GRANTS, None)).await;
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn test_associations_by_kind() {
    let (app, _root) = setup_app().await;
    let id = create_issue(&app).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/issues/{}/associations/jobOperations", id),
            ALL_GRANTS,
            Some(json!({ "targetId": "op-1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // linking the same operation twice
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/issues/{}/associations/jobOperations", id),
            ALL_GRANTS,
            Some(json!({ "targetId": "op-1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/issues/{}/associations/widgets", id),
            ALL_GRANTS,
            Some(json!({ "targetId": "w-1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, all) = send(
        &app,
        request("GET", &format!("/api/issues/{}/associations", id), ALL_GRANTS, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["items"][0]["targetId"], "item-1");
    assert_eq!(all["jobOperations"][0]["targetId"], "op-1");
    assert_eq!(all["trackedEntities"], json!([]));
}

#[tokio::test]
async fn test_gauge_calibration_route() {
    let (app, _root) = setup_app().await;
    let (status, gauge) = send(
        &app,
        request(
            "POST",
            "/api/gauges",
            ALL_GRANTS,
            Some(json!({ "gaugeId": "G-001", "calibrationIntervalInMonths": 12 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = gauge["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/api/gauges/{}/calibrations", id),
            ALL_GRANTS,
            Some(json!({ "dateCalibrated": "2026-10-19", "inspectionStatus": "Pass" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, gauge) = send(&app, request("GET", &format!("/api/gauges/{}", id), ALL_GRANTS, None)).await;
    assert_eq!(gauge["gaugeCalibrationStatus"], "In-Calibration");
    assert_eq!(gauge["nextCalibrationDate"], "2027-10-19");

    let (_, history) = send(
        &app,
        request("GET", &format!("/api/gauges/{}/calibrations", id), ALL_GRANTS, None),
    )
    .await;
    assert_eq!(history["count"], 1);

    let (status, body) = send(
        &app,
        request("POST", "/api/gauges", ALL_GRANTS, Some(json!({ "gaugeId": "G-001" }))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["path"], "gaugeId");
}

#[tokio::test]
async fn test_issue_files() {
    let (app, root) = setup_app().await;
    let id = create_issue(&app).await;
    let uri = format!("/api/issues/{}/files", id);

    let (status, files) = send(&app, request("GET", &uri, ALL_GRANTS, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(files, json!([]));

    let folder = root.path().join("acme").join("issues").join(&id);
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(folder.join("photo.jpg"), b"jpeg").unwrap();

    let (_, files) = send(&app, request("GET", &uri, ALL_GRANTS, None)).await;
    assert_eq!(files[0]["name"], "photo.jpg");
}

#[tokio::test]
async fn test_step_type_options() {
    let (app, _root) = setup_app().await;
    let (status, options) = send(
        &app,
        request("GET", "/api/options/quality-document-step-types", "", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(options.as_array().unwrap().len(), 8);
    assert_eq!(options[0]["value"], "Value");
}
