//! Purchase order line queries

use mfg_common::{CompanyId, Result, UserId};
use sqlx::SqlitePool;

use crate::models::PurchaseOrderLine;
use crate::validators::PurchaseOrderLineForm;

pub async fn insert_purchase_order_line(
    pool: &SqlitePool,
    company_id: &CompanyId,
    purchase_order_id: &str,
    line: &PurchaseOrderLineForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO purchase_order_line (
            id, company_id, purchase_order_id, purchase_order_line_type, item_id,
            description, purchase_quantity, unit_price, location_id, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(purchase_order_id)
    .bind(line.purchase_order_line_type)
    .bind(&line.item_id)
    .bind(&line.description)
    .bind(line.purchase_quantity)
    .bind(line.unit_price)
    .bind(&line.location_id)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Replace every editable column of a line
pub async fn update_purchase_order_line(
    pool: &SqlitePool,
    company_id: &CompanyId,
    purchase_order_id: &str,
    line_id: &str,
    line: &PurchaseOrderLineForm,
    actor: &UserId,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE purchase_order_line SET
            purchase_order_line_type = ?, item_id = ?, description = ?,
            purchase_quantity = ?, unit_price = ?, location_id = ?,
            updated_by = ?, updated_at = ?
        WHERE id = ? AND purchase_order_id = ? AND company_id = ?
        "#,
    )
    .bind(line.purchase_order_line_type)
    .bind(&line.item_id)
    .bind(&line.description)
    .bind(line.purchase_quantity)
    .bind(line.unit_price)
    .bind(&line.location_id)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .bind(line_id)
    .bind(purchase_order_id)
    .bind(company_id.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_purchase_order_line(
    pool: &SqlitePool,
    company_id: &CompanyId,
    purchase_order_id: &str,
    line_id: &str,
) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM purchase_order_line WHERE id = ? AND purchase_order_id = ? AND company_id = ?",
    )
    .bind(line_id)
    .bind(purchase_order_id)
    .bind(company_id.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Lines in entry order
pub async fn list_purchase_order_lines(
    pool: &SqlitePool,
    company_id: &CompanyId,
    purchase_order_id: &str,
) -> Result<Vec<PurchaseOrderLine>> {
    let lines = sqlx::query_as(
        r#"
        SELECT id, purchase_order_id, purchase_order_line_type, item_id, description,
               purchase_quantity, unit_price, location_id, created_by, created_at,
               updated_by, updated_at
        FROM purchase_order_line
        WHERE purchase_order_id = ? AND company_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(purchase_order_id)
    .bind(company_id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(lines)
}
