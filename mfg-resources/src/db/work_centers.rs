//! Work center queries

use mfg_common::query::{ListParams, ListQuery, Page, PartialUpdate, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::WorkCenter;
use crate::validators::WorkCenterForm;

const WORK_CENTER_SORT: &[&str] = &["name", "labor_rate", "machine_rate", "created_at"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenterFilters {
    pub location_id: Option<String>,
    pub active: Option<bool>,
}

pub async fn insert_work_center(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &WorkCenterForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO work_center (
            id, company_id, name, description, location_id,
            labor_rate, machine_rate, overhead_rate, active, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.name)
    .bind(&form.description)
    .bind(&form.location_id)
    .bind(form.labor_rate)
    .bind(form.machine_rate)
    .bind(form.overhead_rate)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn update_work_center(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    form: WorkCenterForm,
    actor: &UserId,
) -> Result<u64> {
    let mut update = PartialUpdate::new("work_center");
    update
        .set("name", Some(form.name))
        .set("description", Some(form.description))
        .set("location_id", Some(form.location_id))
        .set("labor_rate", Some(form.labor_rate))
        .set("machine_rate", Some(form.machine_rate))
        .set("overhead_rate", Some(form.overhead_rate));
    update.execute(pool, company_id, id, actor).await
}

pub async fn set_active(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    active: bool,
    actor: &UserId,
) -> Result<u64> {
    let mut update = PartialUpdate::new("work_center");
    update.set("active", Some(active));
    update.execute(pool, company_id, id, actor).await
}

pub async fn get_work_center(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<WorkCenter>> {
    let work_center = sqlx::query_as("SELECT * FROM work_center WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(work_center)
}

pub async fn list_work_centers(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &WorkCenterFilters,
) -> Result<Page<WorkCenter>> {
    ListQuery::new("work_center", company_id)
        .search(&["name", "description"], params.search.as_deref())
        .eq("location_id", filters.location_id.as_ref())
        .eq("active", filters.active)
        .sort(WORK_CENTER_SORT, "name", SortOrder::Asc)
        .fetch_page(pool, params)
        .await
}
