//! Maintenance dispatch queries

use mfg_common::query::{ListParams, ListQuery, Page, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{MaintenanceDispatch, MaintenanceDispatchStatus};
use crate::validators::MaintenanceDispatchForm;

const DISPATCH_SORT: &[&str] = &[
    "maintenance_dispatch_id",
    "status",
    "priority",
    "planned_start_time",
    "created_at",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDispatchFilters {
    pub status: Option<MaintenanceDispatchStatus>,
    pub work_center_id: Option<String>,
    pub assignee: Option<String>,
}

pub async fn insert_dispatch(
    pool: &SqlitePool,
    company_id: &CompanyId,
    readable_id: &str,
    status: MaintenanceDispatchStatus,
    form: &MaintenanceDispatchForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO maintenance_dispatch (
            id, company_id, maintenance_dispatch_id, work_center_id, status, priority, source,
            description, assignee, planned_start_time, planned_end_time, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(readable_id)
    .bind(&form.work_center_id)
    .bind(status)
    .bind(form.priority)
    .bind(form.source)
    .bind(&form.description)
    .bind(&form.assignee)
    .bind(form.planned_start_time)
    .bind(form.planned_end_time)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn get_dispatch(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
) -> Result<Option<MaintenanceDispatch>> {
    let dispatch = sqlx::query_as("SELECT * FROM maintenance_dispatch WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(dispatch)
}

pub async fn list_dispatches(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &MaintenanceDispatchFilters,
) -> Result<Page<MaintenanceDispatch>> {
    ListQuery::new("maintenance_dispatch", company_id)
        .search(&["maintenance_dispatch_id"], params.search.as_deref())
        .eq("status", filters.status.map(|s| s.to_string()))
        .eq("work_center_id", filters.work_center_id.as_ref())
        .eq("assignee", filters.assignee.as_ref())
        .sort(DISPATCH_SORT, "created_at", SortOrder::Desc)
        .fetch_page(pool, params)
        .await
}
