//! Issue header queries

use chrono::NaiveDate;
use mfg_common::query::{ListParams, ListQuery, Page, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{Issue, IssuePriority, IssueStatus};
use crate::validators::IssueForm;

const ISSUE_SORT: &[&str] = &[
    "issue_id",
    "name",
    "status",
    "priority",
    "open_date",
    "due_date",
    "created_at",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFilters {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub assignee: Option<String>,
}

/// Insert the header with status `Registered`, returning the row id
pub async fn insert_issue(
    pool: &SqlitePool,
    company_id: &CompanyId,
    issue_id: &str,
    form: &IssueForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO issue (
            id, company_id, issue_id, name, description, status, priority,
            location_id, assignee, open_date, due_date, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(issue_id)
    .bind(&form.name)
    .bind(&form.description)
    .bind(IssueStatus::Registered)
    .bind(form.priority)
    .bind(&form.location_id)
    .bind(&form.assignee)
    .bind(form.open_date)
    .bind(form.due_date)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn get_issue(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<Issue>> {
    let issue = sqlx::query_as("SELECT * FROM issue WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(issue)
}

pub async fn list_issues(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &IssueFilters,
) -> Result<Page<Issue>> {
    ListQuery::new("issue", company_id)
        .search(&["issue_id", "name"], params.search.as_deref())
        .eq("status", filters.status.map(|s| s.to_string()))
        .eq("priority", filters.priority.map(|p| p.to_string()))
        .eq("assignee", filters.assignee.as_ref())
        .sort(ISSUE_SORT, "open_date", SortOrder::Desc)
        .fetch_page(pool, params)
        .await
}

/// Close stamp: `close_date` set and `assignee` cleared
pub async fn close_issue(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    close_date: NaiveDate,
    actor: &UserId,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE issue
        SET status = ?, close_date = ?, assignee = NULL, updated_by = ?, updated_at = ?
        WHERE id = ? AND company_id = ?
        "#,
    )
    .bind(IssueStatus::Closed)
    .bind(close_date)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .bind(id)
    .bind(company_id.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Deleting the header cascades to every association table
pub async fn delete_issue(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM issue WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
