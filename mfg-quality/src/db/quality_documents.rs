//! Quality document and step queries

use mfg_common::query::{ListParams, ListQuery, Page, PartialUpdate, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::{QualityDocument, QualityDocumentStatus, QualityDocumentStep};
use crate::validators::{QualityDocumentForm, QualityDocumentStepForm};

const DOCUMENT_SORT: &[&str] = &["name", "version", "status", "created_at"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityDocumentFilters {
    pub status: Option<QualityDocumentStatus>,
}

pub async fn insert_quality_document(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &QualityDocumentForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO quality_document (
            id, company_id, name, version, status, content, assignee, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.name)
    .bind(form.version)
    .bind(form.status)
    .bind(&form.content)
    .bind(&form.assignee)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn update_quality_document(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    form: QualityDocumentForm,
    actor: &UserId,
) -> Result<u64> {
    let mut update = PartialUpdate::new("quality_document");
    update
        .set("name", Some(form.name))
        .set("version", Some(form.version))
        .set("status", Some(form.status))
        .set("content", Some(form.content))
        .set("assignee", Some(form.assignee));
    update.execute(pool, company_id, id, actor).await
}

pub async fn get_quality_document(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
) -> Result<Option<QualityDocument>> {
    let document = sqlx::query_as("SELECT * FROM quality_document WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(document)
}

pub async fn list_quality_documents(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &QualityDocumentFilters,
) -> Result<Page<QualityDocument>> {
    ListQuery::new("quality_document", company_id)
        .search(&["name"], params.search.as_deref())
        .eq("status", filters.status.map(|s| s.to_string()))
        .sort(DOCUMENT_SORT, "name", SortOrder::Asc)
        .fetch_page(pool, params)
        .await
}

pub async fn delete_quality_document(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM quality_document WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn list_values(form: &QualityDocumentStepForm) -> Option<Json<Vec<String>>> {
    if form.list_values.is_empty() {
        None
    } else {
        Some(Json(form.list_values.clone()))
    }
}

pub async fn insert_step(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &QualityDocumentStepForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO quality_document_step (
            id, company_id, quality_document_id, name, description, type, sort_order,
            unit_of_measure_code, min_value, max_value, list_values, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.quality_document_id)
    .bind(&form.name)
    .bind(&form.description)
    .bind(form.step_type)
    .bind(form.sort_order)
    .bind(&form.unit_of_measure_code)
    .bind(form.min_value)
    .bind(form.max_value)
    .bind(list_values(form))
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn update_step(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    form: QualityDocumentStepForm,
    actor: &UserId,
) -> Result<u64> {
    let values = list_values(&form);
    let mut update = PartialUpdate::new("quality_document_step");
    update
        .set("name", Some(form.name))
        .set("description", Some(form.description))
        .set("type", Some(form.step_type))
        .set("sort_order", Some(form.sort_order))
        .set("unit_of_measure_code", Some(form.unit_of_measure_code))
        .set("min_value", Some(form.min_value))
        .set("max_value", Some(form.max_value))
        .set("list_values", Some(values));
    update.execute(pool, company_id, id, actor).await
}

pub async fn delete_step(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM quality_document_step WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_steps(
    pool: &SqlitePool,
    company_id: &CompanyId,
    quality_document_id: &str,
) -> Result<Vec<QualityDocumentStep>> {
    let steps = sqlx::query_as(
        r#"
        SELECT id, quality_document_id, name, description, type, sort_order,
               unit_of_measure_code, min_value, max_value, list_values,
               created_by, created_at, updated_by, updated_at
        FROM quality_document_step
        WHERE quality_document_id = ? AND company_id = ?
        ORDER BY sort_order ASC, created_at ASC
        "#,
    )
    .bind(quality_document_id)
    .bind(company_id.as_str())
    .fetch_all(pool)
    .await?;
    Ok(steps)
}
