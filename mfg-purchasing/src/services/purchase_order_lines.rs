//! Purchase order lines
//!
//! Lines can only change while the order itself is still editable.

use mfg_common::{Action, Error, RequestContext, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::{purchase_order_lines as lines, purchase_orders};
use crate::models::{PurchaseOrder, PurchaseOrderLine};
use crate::validators::PurchaseOrderLineForm;

async fn editable_order(pool: &SqlitePool, ctx: &RequestContext, purchase_order_id: &str) -> Result<PurchaseOrder> {
    let order = purchase_orders::get_purchase_order(pool, &ctx.company_id, purchase_order_id)
        .await?
        .ok_or_else(|| Error::not_found("purchase order", purchase_order_id))?;

    if !order.status.is_editable() {
        return Err(Error::Forbidden(format!(
            "Purchase order {} is {} and its lines cannot be changed",
            order.purchase_order_id, order.status
        )));
    }
    Ok(order)
}

pub async fn create_purchase_order_line(
    pool: &SqlitePool,
    ctx: &RequestContext,
    purchase_order_id: &str,
    line: PurchaseOrderLineForm,
) -> Result<String> {
    ctx.require("purchasing", Action::Create)?;
    let order = editable_order(pool, ctx, purchase_order_id).await?;

    let id = lines::insert_purchase_order_line(pool, &ctx.company_id, purchase_order_id, &line, &ctx.user_id).await?;
    info!("Added {} line {} to {}", line.purchase_order_line_type, id, order.purchase_order_id);
    Ok(id)
}

pub async fn update_purchase_order_line(
    pool: &SqlitePool,
    ctx: &RequestContext,
    purchase_order_id: &str,
    line_id: &str,
    line: PurchaseOrderLineForm,
) -> Result<()> {
    ctx.require("purchasing", Action::Update)?;
    editable_order(pool, ctx, purchase_order_id).await?;

    let updated = lines::update_purchase_order_line(
        pool,
        &ctx.company_id,
        purchase_order_id,
        line_id,
        &line,
        &ctx.user_id,
    )
    .await?;
    if updated == 0 {
        return Err(Error::not_found("purchase order line", line_id));
    }
    Ok(())
}

pub async fn delete_purchase_order_line(
    pool: &SqlitePool,
    ctx: &RequestContext,
    purchase_order_id: &str,
    line_id: &str,
) -> Result<()> {
    ctx.require("purchasing", Action::Delete)?;
    editable_order(pool, ctx, purchase_order_id).await?;

    if lines::delete_purchase_order_line(pool, &ctx.company_id, purchase_order_id, line_id).await? == 0 {
        return Err(Error::not_found("purchase order line", line_id));
    }
    Ok(())
}

pub async fn list_purchase_order_lines(
    pool: &SqlitePool,
    ctx: &RequestContext,
    purchase_order_id: &str,
) -> Result<Vec<PurchaseOrderLine>> {
    purchase_orders::get_purchase_order(pool, &ctx.company_id, purchase_order_id)
        .await?
        .ok_or_else(|| Error::not_found("purchase order", purchase_order_id))?;

    lines::list_purchase_order_lines(pool, &ctx.company_id, purchase_order_id).await
}
