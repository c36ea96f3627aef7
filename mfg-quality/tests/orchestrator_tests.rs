//! Integration tests for the quality services
//!
//! Tests cover:
//! - Issue creation with critical item links and best-effort side links
//! - Issue status stamps and the reopen grant
//! - Association listing across all link tables
//! - Gauge calibration date monotonicity and restore on failure
//! - Quality document step ordering and cascade

use chrono::NaiveDate;
use mfg_common::db::init_memory_database;
use mfg_common::query::ListParams;
use mfg_common::{CompanyId, Error, Permissions, RequestContext, Upsert, UserId};
use mfg_quality::db::gauges as gauge_db;
use mfg_quality::db::issues::{self as issue_db, IssueFilters};
use mfg_quality::models::{
    GaugeCalibrationStatus, InspectionStatus, IssueAssociationKind, IssueStatus,
    QualityDocumentStatus, QualityDocumentStepType,
};
use mfg_quality::services::{
    self, quality_documents, GaugeCreate, GaugeUpdate, QualityDocumentCreate, QualityDocumentStepCreate,
};
use mfg_quality::validators::{
    CalibrationRecordForm, GaugeForm, IssueForm, IssuePatch, QualityDocumentForm,
    QualityDocumentStepForm,
};
use sqlx::SqlitePool;

const ALL_GRANTS: &str = "quality_view,quality_create,quality_update,quality_delete";

fn acme() -> CompanyId {
    CompanyId::new("acme")
}

fn inspector() -> UserId {
    UserId::new("u1")
}

fn ctx(grants: &str) -> RequestContext {
    RequestContext::new("acme", "u1").with_permissions(Permissions::parse(grants))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

async fn setup() -> SqlitePool {
    init_memory_database().await.unwrap()
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn fail_inserts_into(pool: &SqlitePool, table: &str) {
    sqlx::query(&format!(
        "CREATE TRIGGER fail_{table} BEFORE INSERT ON {table} BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;"
    ))
    .execute(pool)
    .await
    .unwrap();
}

fn issue_form() -> IssueForm {
    let mut form = IssueForm::new("Cracked housing", d(2026, 10, 19));
    form.items = vec!["item-1".to_string(), "item-2".to_string()];
    form.customer_id = Some("cust-1".to_string());
    form.supplier_id = Some("supp-1".to_string());
    form.assignee = Some("u2".to_string());
    form
}

async fn create_gauge(pool: &SqlitePool, last: Option<NaiveDate>) -> String {
    let mut form = GaugeForm::new("G-001");
    form.calibration_interval_in_months = 6;
    form.last_calibration_date = last;
    services::upsert_gauge(
        pool,
        &acme(),
        Upsert::Create(GaugeCreate {
            created_by: inspector(),
            form,
        }),
    )
    .await
    .unwrap()
    .id
}

// =============================================================================
// Issues
// =============================================================================

#[tokio::test]
async fn test_create_issue_writes_header_and_links() {
    let pool = setup().await;
    let created = services::create_issue(&pool, &acme(), &inspector(), issue_form())
        .await
        .unwrap();

    assert_eq!(created.readable_id, "NCR-00001");
    let issue = services::get_issue(&pool, &acme(), &created.id).await.unwrap();
    assert_eq!(issue.status, IssueStatus::Registered);
    assert_eq!(count(&pool, "issue_item").await, 2);
    assert_eq!(count(&pool, "issue_customer").await, 1);
    assert_eq!(count(&pool, "issue_supplier").await, 1);
}

#[tokio::test]
async fn test_repeated_items_link_once() {
    let pool = setup().await;
    let mut form = IssueForm::new("Cracked housing", d(2026, 10, 19));
    form.items = vec!["item-1".to_string(), "item-1".to_string(), "item-2".to_string()];

    let created = services::create_issue(&pool, &acme(), &inspector(), form).await.unwrap();
    assert_eq!(count(&pool, "issue").await, 1);
    assert_eq!(count(&pool, "issue_item").await, 2);

    let associations = services::list_issue_associations(&pool, &ctx(ALL_GRANTS), &created.id)
        .await
        .unwrap();
    let mut linked: Vec<&str> = associations.items.iter().map(|a| a.target_id.as_str()).collect();
    linked.sort();
    assert_eq!(linked, vec!["item-1", "item-2"]);
}

#[tokio::test]
async fn test_item_link_failure_removes_issue() {
    let pool = setup().await;
    fail_inserts_into(&pool, "issue_item").await;

    let err = services::create_issue(&pool, &acme(), &inspector(), issue_form())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Orchestration { step: "insert issue items", .. }));
    assert_eq!(count(&pool, "issue").await, 0);
}

#[tokio::test]
async fn test_side_link_failure_is_ignored() {
    let pool = setup().await;
    fail_inserts_into(&pool, "issue_customer").await;

    let created = services::create_issue(&pool, &acme(), &inspector(), issue_form())
        .await
        .unwrap();
    assert_eq!(count(&pool, "issue").await, 1);
    assert_eq!(count(&pool, "issue_item").await, 2);
    assert_eq!(count(&pool, "issue_customer").await, 0);
    assert_eq!(count(&pool, "issue_supplier").await, 1);

    let associations = services::list_issue_associations(&pool, &ctx(ALL_GRANTS), &created.id)
        .await
        .unwrap();
    assert_eq!(associations.items.len(), 2);
    assert!(associations.customers.is_empty());
    assert_eq!(associations.suppliers[0].target_id, "supp-1");
}

#[tokio::test]
async fn test_update_checks_due_date_against_stored_open_date() {
    let pool = setup().await;
    let created = services::create_issue(&pool, &acme(), &inspector(), issue_form())
        .await
        .unwrap();

    let patch = IssuePatch {
        due_date: Some(Some(d(2026, 10, 1))),
        ..Default::default()
    };
    let err = services::update_issue(&pool, &acme(), &created.id, patch, &inspector())
        .await
        .unwrap_err();
    match err {
        Error::Validation(errors) => assert_eq!(errors.paths(), vec!["dueDate"]),
        other => panic!("expected validation error, got {:?}", other),
    }

    let patch = IssuePatch {
        name: Some("Cracked housing, lot 7".to_string()),
        due_date: Some(Some(d(2026, 11, 1))),
        ..Default::default()
    };
    services::update_issue(&pool, &acme(), &created.id, patch, &inspector())
        .await
        .unwrap();
    let issue = services::get_issue(&pool, &acme(), &created.id).await.unwrap();
    assert_eq!(issue.name, "Cracked housing, lot 7");
    assert_eq!(issue.due_date, Some(d(2026, 11, 1)));
    assert_eq!(issue.updated_by.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_closing_stamps_date_and_reopening_needs_delete() {
    let pool = setup().await;
    let created = services::create_issue(&pool, &acme(), &inspector(), issue_form())
        .await
        .unwrap();
    let editor = ctx("quality_view,quality_update");

    let closed = services::update_issue_status(&pool, &editor, &created.id, IssueStatus::Closed)
        .await
        .unwrap();
    assert_eq!(closed.close_date, Some(editor.today()));
    assert_eq!(closed.assignee, None);

    let err = services::update_issue_status(&pool, &editor, &created.id, IssueStatus::InProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    let reopened =
        services::update_issue_status(&pool, &ctx(ALL_GRANTS), &created.id, IssueStatus::InProgress)
            .await
            .unwrap();
    assert_eq!(reopened.status, IssueStatus::InProgress);
    assert_eq!(reopened.close_date, None);
}

#[tokio::test]
async fn test_association_add_and_delete_route_by_kind() {
    let pool = setup().await;
    let created = services::create_issue(&pool, &acme(), &inspector(), IssueForm::new("Burr", d(2026, 10, 19)))
        .await
        .unwrap();
    let admin = ctx(ALL_GRANTS);

    let link = services::add_issue_association(
        &pool,
        &admin,
        IssueAssociationKind::ReceiptLines,
        &created.id,
        "rl-9",
    )
    .await
    .unwrap();
    assert_eq!(count(&pool, "issue_receipt_line").await, 1);

    // wrong kind never touches the receipt line table
    let err = services::delete_issue_association(&pool, &admin, IssueAssociationKind::Items, &link)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    services::delete_issue_association(&pool, &admin, IssueAssociationKind::ReceiptLines, &link)
        .await
        .unwrap();
    assert_eq!(count(&pool, "issue_receipt_line").await, 0);
}

#[tokio::test]
async fn test_delete_issue_cascades_links() {
    let pool = setup().await;
    let created = services::create_issue(&pool, &acme(), &inspector(), issue_form())
        .await
        .unwrap();

    services::delete_issue(&pool, &ctx(ALL_GRANTS), &created.id).await.unwrap();
    assert_eq!(count(&pool, "issue").await, 0);
    assert_eq!(count(&pool, "issue_item").await, 0);
    assert_eq!(count(&pool, "issue_supplier").await, 0);
}

#[tokio::test]
async fn test_issue_list_is_tenant_scoped() {
    let pool = setup().await;
    services::create_issue(&pool, &acme(), &inspector(), issue_form()).await.unwrap();
    services::create_issue(&pool, &CompanyId::new("globex"), &inspector(), issue_form())
        .await
        .unwrap();

    let page = issue_db::list_issues(&pool, &acme(), &ListParams::default(), &IssueFilters::default())
        .await
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.rows[0].company_id, "acme");
    // each tenant numbers its own issues
    assert_eq!(page.rows[0].issue_id, "NCR-00001");
}

// =============================================================================
// Gauges
// =============================================================================

#[tokio::test]
async fn test_gauge_next_calibration_from_last_date() {
    let pool = setup().await;
    let id = create_gauge(&pool, Some(d(2026, 4, 30))).await;

    let gauge = services::gauges::get_gauge(&pool, &acme(), &id).await.unwrap();
    assert_eq!(gauge.next_calibration_date, Some(d(2026, 10, 30)));
    assert_eq!(gauge.gauge_calibration_status, GaugeCalibrationStatus::Pending);
}

#[tokio::test]
async fn test_later_calibration_restamps_gauge() {
    let pool = setup().await;
    let id = create_gauge(&pool, Some(d(2026, 4, 30))).await;

    let form = CalibrationRecordForm::new(&id, d(2026, 10, 19), InspectionStatus::Fail);
    services::record_gauge_calibration(&pool, &ctx(ALL_GRANTS), form).await.unwrap();

    let gauge = services::gauges::get_gauge(&pool, &acme(), &id).await.unwrap();
    assert_eq!(gauge.gauge_calibration_status, GaugeCalibrationStatus::OutOfCalibration);
    assert_eq!(gauge.last_calibration_date, Some(d(2026, 10, 19)));
    assert_eq!(gauge.next_calibration_date, Some(d(2027, 4, 19)));
}

#[tokio::test]
async fn test_earlier_calibration_is_history_only() {
    let pool = setup().await;
    let id = create_gauge(&pool, Some(d(2026, 4, 30))).await;

    let form = CalibrationRecordForm::new(&id, d(2025, 12, 1), InspectionStatus::Pass);
    services::record_gauge_calibration(&pool, &ctx(ALL_GRANTS), form).await.unwrap();

    let gauge = services::gauges::get_gauge(&pool, &acme(), &id).await.unwrap();
    assert_eq!(gauge.gauge_calibration_status, GaugeCalibrationStatus::Pending);
    assert_eq!(gauge.last_calibration_date, Some(d(2026, 4, 30)));
    assert_eq!(count(&pool, "gauge_calibration_record").await, 1);

    let history = gauge_db::list_calibration_records(&pool, &acme(), Some(id.as_str()), &ListParams::default())
        .await
        .unwrap();
    assert_eq!(history.rows[0].date_calibrated, d(2025, 12, 1));
}

#[tokio::test]
async fn test_gauge_edit_keeps_calibration_dates() {
    let pool = setup().await;
    let id = create_gauge(&pool, Some(d(2026, 4, 30))).await;
    let form = CalibrationRecordForm::new(&id, d(2026, 10, 19), InspectionStatus::Pass);
    services::record_gauge_calibration(&pool, &ctx(ALL_GRANTS), form).await.unwrap();

    let update = |last: Option<NaiveDate>| {
        let mut form = GaugeForm::new("G-001");
        form.description = Some("Bore micrometer".to_string());
        form.calibration_interval_in_months = 6;
        form.last_calibration_date = last;
        Upsert::Update(GaugeUpdate {
            id: id.clone(),
            updated_by: inspector(),
            form,
        })
    };

    services::upsert_gauge(&pool, &acme(), update(None)).await.unwrap();
    services::upsert_gauge(&pool, &acme(), update(Some(d(2026, 4, 30)))).await.unwrap();

    let gauge = services::gauges::get_gauge(&pool, &acme(), &id).await.unwrap();
    assert_eq!(gauge.description.as_deref(), Some("Bore micrometer"));
    assert_eq!(gauge.last_calibration_date, Some(d(2026, 10, 19)));
    assert_eq!(gauge.next_calibration_date, Some(d(2027, 4, 19)));
    assert_eq!(gauge.gauge_calibration_status, GaugeCalibrationStatus::InCalibration);
}

#[tokio::test]
async fn test_failed_record_restores_gauge() {
    let pool = setup().await;
    let id = create_gauge(&pool, None).await;
    fail_inserts_into(&pool, "gauge_calibration_record").await;

    let form = CalibrationRecordForm::new(&id, d(2026, 10, 19), InspectionStatus::Pass);
    let err = services::record_gauge_calibration(&pool, &ctx(ALL_GRANTS), form)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Orchestration { step: "insert calibration record", .. }));

    let gauge = services::gauges::get_gauge(&pool, &acme(), &id).await.unwrap();
    assert_eq!(gauge.gauge_calibration_status, GaugeCalibrationStatus::Pending);
    assert_eq!(gauge.last_calibration_date, None);
    assert_eq!(gauge.next_calibration_date, None);
}

#[tokio::test]
async fn test_calibration_needs_create_grant() {
    let pool = setup().await;
    let id = create_gauge(&pool, None).await;

    let form = CalibrationRecordForm::new(&id, d(2026, 10, 19), InspectionStatus::Pass);
    let err = services::record_gauge_calibration(&pool, &ctx("quality_view"), form)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));
    assert_eq!(count(&pool, "gauge_calibration_record").await, 0);
}

// =============================================================================
// Quality documents
// =============================================================================

#[tokio::test]
async fn test_steps_sorted_and_cascade_with_document() {
    let pool = setup().await;
    let document_id = services::upsert_quality_document(
        &pool,
        &acme(),
        Upsert::Create(QualityDocumentCreate {
            created_by: inspector(),
            form: QualityDocumentForm {
                name: "Incoming inspection".to_string(),
                version: 1,
                status: QualityDocumentStatus::Active,
                content: None,
                assignee: None,
            },
        }),
    )
    .await
    .unwrap();

    for (name, order) in [("Check finish", 2), ("Measure bore", 1)] {
        let mut form = QualityDocumentStepForm::new(&document_id, name, QualityDocumentStepType::Checkbox);
        form.sort_order = order;
        services::upsert_quality_document_step(
            &pool,
            &acme(),
            Upsert::Create(QualityDocumentStepCreate {
                created_by: inspector(),
                form,
            }),
        )
        .await
        .unwrap();
    }

    let steps = quality_documents::list_quality_document_steps(&pool, &acme(), &document_id)
        .await
        .unwrap();
    let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Measure bore", "Check finish"]);

    quality_documents::delete_quality_document(&pool, &ctx(ALL_GRANTS), &document_id)
        .await
        .unwrap();
    assert_eq!(count(&pool, "quality_document_step").await, 0);
}

#[tokio::test]
async fn test_step_for_unknown_document() {
    let pool = setup().await;
    let form = QualityDocumentStepForm::new("missing", "Measure bore", QualityDocumentStepType::Value);
    let err = services::upsert_quality_document_step(
        &pool,
        &acme(),
        Upsert::Create(QualityDocumentStepCreate {
            created_by: inspector(),
            form,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
