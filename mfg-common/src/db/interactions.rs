//! Supplier interactions
//!
//! Every purchasing document links to a `supplier_interaction` row that
//! groups quotes, orders and invoices exchanged with one supplier.

use sqlx::SqlitePool;

use crate::context::{CompanyId, UserId};
use crate::Result;

/// Insert an interaction for `supplier_id`, returning its id
pub async fn insert_supplier_interaction(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
    actor: &UserId,
) -> Result<String> {
    let id = crate::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO supplier_interaction (id, company_id, supplier_id, created_by, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(supplier_id)
    .bind(actor.as_str())
    .bind(crate::time::now())
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn delete_supplier_interaction(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM supplier_interaction WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
