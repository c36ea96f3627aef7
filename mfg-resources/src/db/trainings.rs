//! Training, assignment and completion queries

use chrono::NaiveDate;
use mfg_common::query::{ListParams, ListQuery, Page, PartialUpdate, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{AssignmentRow, Training, TrainingCompletion, TrainingStatus, TrainingType};
use crate::validators::{TrainingCompletionForm, TrainingForm};

const TRAINING_SORT: &[&str] = &["name", "frequency", "status", "created_at"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingFilters {
    pub status: Option<TrainingStatus>,
    #[serde(rename = "type")]
    pub training_type: Option<TrainingType>,
}

pub async fn insert_training(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &TrainingForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO training (id, company_id, name, description, frequency, type, status, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.name)
    .bind(&form.description)
    .bind(form.frequency)
    .bind(form.training_type)
    .bind(form.status)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn update_training(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    form: TrainingForm,
    actor: &UserId,
) -> Result<u64> {
    let mut update = PartialUpdate::new("training");
    update
        .set("name", Some(form.name))
        .set("description", Some(form.description))
        .set("frequency", Some(form.frequency))
        .set("type", Some(form.training_type))
        .set("status", Some(form.status));
    update.execute(pool, company_id, id, actor).await
}

pub async fn get_training(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<Training>> {
    let training = sqlx::query_as("SELECT * FROM training WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(training)
}

pub async fn list_trainings(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &TrainingFilters,
) -> Result<Page<Training>> {
    ListQuery::new("training", company_id)
        .search(&["name", "description"], params.search.as_deref())
        .eq("status", filters.status.map(|s| s.to_string()))
        .eq("type", filters.training_type.map(|t| t.to_string()))
        .sort(TRAINING_SORT, "name", SortOrder::Asc)
        .fetch_page(pool, params)
        .await
}

/// Returns false when the employee was already assigned
pub async fn insert_assignment(
    pool: &SqlitePool,
    company_id: &CompanyId,
    training_id: &str,
    employee_id: &str,
    assigned_on: NaiveDate,
    actor: &UserId,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO training_assignment (id, company_id, training_id, employee_id, assigned_on, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (training_id, employee_id) DO NOTHING
        "#,
    )
    .bind(mfg_common::uuid_utils::generate())
    .bind(company_id.as_str())
    .bind(training_id)
    .bind(employee_id)
    .bind(assigned_on)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_completion(
    pool: &SqlitePool,
    company_id: &CompanyId,
    training_id: &str,
    period: &str,
    form: &TrainingCompletionForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO training_completion (
            id, company_id, training_id, employee_id, completed_on, period, notes, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(training_id)
    .bind(&form.employee_id)
    .bind(form.completed_on)
    .bind(period)
    .bind(&form.notes)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

/// Assignments of active trainings, optionally for one training
pub async fn list_active_assignments(
    pool: &SqlitePool,
    company_id: &CompanyId,
    training_id: Option<&str>,
) -> Result<Vec<AssignmentRow>> {
    let rows = sqlx::query_as(
        r#"
        SELECT a.training_id, t.name AS training_name, t.frequency, t.type AS training_type,
               a.employee_id, e.first_name || ' ' || e.last_name AS employee_name, a.assigned_on
        FROM training_assignment a
        JOIN training t ON t.id = a.training_id
        JOIN employee e ON e.id = a.employee_id
        WHERE a.company_id = ?
          AND t.status = ?
          AND e.active = 1
          AND (? IS NULL OR a.training_id = ?)
        ORDER BY t.name ASC, e.last_name ASC, e.first_name ASC
        "#,
    )
    .bind(company_id.as_str())
    .bind(TrainingStatus::Active)
    .bind(training_id)
    .bind(training_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_completions(
    pool: &SqlitePool,
    company_id: &CompanyId,
    training_id: Option<&str>,
) -> Result<Vec<TrainingCompletion>> {
    let completions = sqlx::query_as(
        r#"
        SELECT id, training_id, employee_id, completed_on, period, notes, created_by, created_at
        FROM training_completion
        WHERE company_id = ? AND (? IS NULL OR training_id = ?)
        ORDER BY completed_on DESC
        "#,
    )
    .bind(company_id.as_str())
    .bind(training_id)
    .bind(training_id)
    .fetch_all(pool)
    .await?;
    Ok(completions)
}
