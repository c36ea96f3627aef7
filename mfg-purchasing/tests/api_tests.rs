//! Integration tests for mfg-purchasing HTTP endpoints
//!
//! Tests cover:
//! - Health endpoint (no request context required)
//! - Missing identity headers and permission grants
//! - Validation failures rendered with field paths
//! - Updates checked against the stored delivery
//! - Purchase order create/read/list round trip
//! - Step failures reported with the status of their cause
//! - Attachment listing and option lists

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mfg_common::api::{COMPANY_HEADER, PERMISSIONS_HEADER, USER_HEADER};
use mfg_common::storage::DocumentStore;
use mfg_purchasing::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

const ALL_GRANTS: &str = "purchasing_view,purchasing_create,purchasing_update,purchasing_delete";

/// Test helper: router over an in-memory database and an empty attachment root
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

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
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

async fn create_supplier(app: &axum::Router) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/suppliers",
            ALL_GRANTS,
            Some(json!({ "name": "Acme Steel", "paymentTermId": "net30" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health and request context
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_needs_no_context() {
    let (app, _root) = setup_app().await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "mfg-purchasing");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_missing_company_header_is_bad_request() {
    let (app, _root) = setup_app().await;
    let req = Request::builder()
        .uri("/api/suppliers")
        .header(USER_HEADER, "u1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_missing_grant_is_forbidden() {
    let (app, _root) = setup_app().await;
    let (status, body) = send(
        &app,
        request("POST", "/api/suppliers", "purchasing_view", Some(json!({ "name": "X" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_drop_shipment_errors_carry_paths() {
    let (app, _root) = setup_app().await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/purchase-orders",
            ALL_GRANTS,
            Some(json!({
                "supplierId": "s1",
                "dropShipment": true,
                "locationId": "l1",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let paths: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"dropShipment"));
    assert!(paths.contains(&"locationId"));
}

#[tokio::test]
async fn test_patch_checked_against_stored_delivery() {
    let (app, _root) = setup_app().await;
    let supplier_id = create_supplier(&app).await;
    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/purchase-orders",
            ALL_GRANTS,
            Some(json!({
                "supplierId": supplier_id,
                "dropShipment": true,
                "customerId": "c1",
                "customerLocationId": "cl1",
                "receiptRequestedDate": "2026-11-10",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/purchase-orders/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &uri,
            ALL_GRANTS,
            Some(json!({ "locationId": "l9", "receiptPromisedDate": "2026-11-01" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let paths: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["locationId", "receiptPromisedDate"]);

    let (_, detail) = send(&app, request("GET", &uri, ALL_GRANTS, None)).await;
    assert_eq!(detail["delivery"]["locationId"], Value::Null);
    assert_eq!(detail["delivery"]["receiptPromisedDate"], Value::Null);
    assert_eq!(detail["delivery"]["dropShipment"], true);

    let (status, _) = send(
        &app,
        request("PATCH", &uri, ALL_GRANTS, Some(json!({ "receiptPromisedDate": "2026-11-12" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_email_release_requires_contact() {
    let (app, _root) = setup_app().await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/purchase-orders/any/release",
            ALL_GRANTS,
            Some(json!({ "notification": "Email" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["path"], "supplierContact");
}

// =============================================================================
// Purchase orders
// =============================================================================

#[tokio::test]
async fn test_purchase_order_round_trip() {
    let (app, _root) = setup_app().await;
    let supplier_id = create_supplier(&app).await;

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/purchase-orders",
            ALL_GRANTS,
            Some(json!({ "supplierId": supplier_id, "supplierReference": "RFQ-7" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["readableId"], "PO-00001");
    let id = created["id"].as_str().unwrap();

    let (status, detail) = send(
        &app,
        request("GET", &format!("/api/purchase-orders/{}", id), ALL_GRANTS, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "Draft");
    assert_eq!(detail["exchangeRate"], 1.0);
    assert_eq!(detail["payment"]["paymentTermId"], "net30");

    let (status, page) = send(
        &app,
        request("GET", "/api/purchase-orders?search=rfq&status=Draft", ALL_GRANTS, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["rows"][0]["purchaseOrderId"], "PO-00001");
}

#[tokio::test]
async fn test_failed_step_keeps_cause_status() {
    let pool = mfg_common::db::init_memory_database().await.unwrap();
    let root = TempDir::new().unwrap();
    let app = build_router(AppState::new(pool.clone(), DocumentStore::new(root.path())));
    let supplier_id = create_supplier(&app).await;

    sqlx::query(
        "INSERT INTO purchase_order (id, company_id, purchase_order_id, supplier_id, created_by) VALUES ('imported', 'acme', 'PO-00001', ?, 'u1')",
    )
    .bind(&supplier_id)
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/purchase-orders",
            ALL_GRANTS,
            Some(json!({ "supplierId": supplier_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("insert purchase order failed"));

    let interactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM supplier_interaction")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(interactions, 0);

    let (status, body) = send(
        &app,
        request("POST", "/api/purchase-orders", ALL_GRANTS, Some(json!({ "supplierId": "missing" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_purchase_order_is_not_found() {
    let (app, _root) = setup_app().await;
    let (status, body) = send(
        &app,
        request("GET", "/api/purchase-orders/nope", ALL_GRANTS, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_status_change_rejects_unknown_label() {
    let (app, _root) = setup_app().await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/purchase-orders/any/status",
            ALL_GRANTS,
            Some(json!({ "status": "Shipped" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["path"], "status");
}

// =============================================================================
// Attachments and options
// =============================================================================

#[tokio::test]
async fn test_files_list_empty_then_populated() {
    let (app, root) = setup_app().await;
    let supplier_id = create_supplier(&app).await;
    let (_, created) = send(
        &app,
        request(
            "POST",
            "/api/purchase-orders",
            ALL_GRANTS,
            Some(json!({ "supplierId": supplier_id })),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/purchase-orders/{}/files", id);

    let (status, files) = send(&app, request("GET", &uri, ALL_GRANTS, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(files, json!([]));

    let folder = root.path().join("acme").join("purchase-orders").join(&id);
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(folder.join("quote.pdf"), b"%PDF").unwrap();

    let (_, files) = send(&app, request("GET", &uri, ALL_GRANTS, None)).await;
    assert_eq!(files[0]["name"], "quote.pdf");
    assert_eq!(files[0]["size"], 4);
}

#[tokio::test]
async fn test_status_options_in_declaration_order() {
    let (app, _root) = setup_app().await;
    let (status, options) = send(
        &app,
        request("GET", "/api/options/purchase-order-statuses", "", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(options[0]["value"], "Draft");
    assert_eq!(options[2]["label"], "To Review");
    assert_eq!(options.as_array().unwrap().len(), 9);
}
