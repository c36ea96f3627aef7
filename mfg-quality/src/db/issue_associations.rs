//! Issue association tables
//!
//! All nine tables share one shape; [`IssueAssociationKind::table`] picks the
//! table and the column naming the linked entity.

use mfg_common::{CompanyId, Result, UserId};
use sqlx::SqlitePool;

use crate::models::{IssueAssociation, IssueAssociationKind};

pub async fn insert_association(
    pool: &SqlitePool,
    company_id: &CompanyId,
    kind: IssueAssociationKind,
    issue_id: &str,
    target_id: &str,
    actor: &UserId,
) -> Result<String> {
    let (table, column) = kind.table();
    let id = mfg_common::uuid_utils::generate();
    let statement = format!(
        "INSERT INTO {} (id, company_id, issue_id, {}, created_by, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        table, column
    );
    sqlx::query(&statement)
        .bind(&id)
        .bind(company_id.as_str())
        .bind(issue_id)
        .bind(target_id)
        .bind(actor.as_str())
        .bind(mfg_common::time::now())
        .execute(pool)
        .await?;
    Ok(id)
}

pub async fn delete_association(
    pool: &SqlitePool,
    company_id: &CompanyId,
    kind: IssueAssociationKind,
    id: &str,
) -> Result<u64> {
    let (table, _) = kind.table();
    let statement = format!("DELETE FROM {} WHERE id = ? AND company_id = ?", table);
    let result = sqlx::query(&statement)
        .bind(id)
        .bind(company_id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_associations(
    pool: &SqlitePool,
    company_id: &CompanyId,
    kind: IssueAssociationKind,
    issue_id: &str,
) -> Result<Vec<IssueAssociation>> {
    let (table, column) = kind.table();
    let statement = format!(
        r#"
        SELECT id, issue_id, {} AS target_id, created_by, created_at
        FROM {}
        WHERE issue_id = ? AND company_id = ?
        ORDER BY created_at ASC
        "#,
        column, table
    );
    let rows = sqlx::query_as(&statement)
        .bind(issue_id)
        .bind(company_id.as_str())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
