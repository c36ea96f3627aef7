//! Purchase order status transitions, release and deletion

use chrono::{DateTime, Utc};
use mfg_common::query::PartialUpdate;
use mfg_common::{Action, Error, RequestContext, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::purchase_orders;
use crate::models::{PurchaseOrder, PurchaseOrderStatus, ReleaseNotification};
use crate::validators::ReleaseForm;

const MODULE: &str = "purchasing";

/// Effect of a status change on `closed_at`/`closed_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedStamp {
    Set,
    Clear,
    Keep,
}

pub fn closed_stamp(current: PurchaseOrderStatus, next: PurchaseOrderStatus) -> ClosedStamp {
    match (current == PurchaseOrderStatus::Closed, next == PurchaseOrderStatus::Closed) {
        (false, true) => ClosedStamp::Set,
        (true, false) => ClosedStamp::Clear,
        _ => ClosedStamp::Keep,
    }
}

async fn load(pool: &SqlitePool, ctx: &RequestContext, id: &str) -> Result<PurchaseOrder> {
    purchase_orders::get_purchase_order(pool, &ctx.company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("purchase order", id))
}

/// Move an order to `status`
///
/// Requires `purchasing_update`; reopening a closed order also requires
/// `purchasing_delete`.
pub async fn update_purchase_order_status(
    pool: &SqlitePool,
    ctx: &RequestContext,
    id: &str,
    status: PurchaseOrderStatus,
) -> Result<PurchaseOrder> {
    ctx.require(MODULE, Action::Update)?;
    let current = load(pool, ctx, id).await?;

    let stamp = closed_stamp(current.status, status);
    if stamp == ClosedStamp::Clear {
        ctx.require(MODULE, Action::Delete)?;
    }

    let mut update = PartialUpdate::new("purchase_order");
    update.set("status", Some(status));
    match stamp {
        ClosedStamp::Set => {
            update
                .set("closed_at", Some(mfg_common::time::now()))
                .set("closed_by", Some(ctx.user_id.as_str().to_string()));
        }
        ClosedStamp::Clear => {
            update
                .set("closed_at", Some(None::<DateTime<Utc>>))
                .set("closed_by", Some(None::<String>));
        }
        ClosedStamp::Keep => {}
    }
    update.execute(pool, &ctx.company_id, id, &ctx.user_id).await?;

    info!(
        "Purchase order {} status {} -> {}",
        current.purchase_order_id, current.status, status
    );
    load(pool, ctx, id).await
}

/// Send an order to the supplier
///
/// Only draft, planned or in-review orders can be released. Notification
/// delivery happens elsewhere; the validated request is logged.
pub async fn release_purchase_order(
    pool: &SqlitePool,
    ctx: &RequestContext,
    id: &str,
    release: ReleaseForm,
) -> Result<PurchaseOrder> {
    ctx.require(MODULE, Action::Update)?;
    let current = load(pool, ctx, id).await?;

    if !current.status.is_releasable() {
        return Err(Error::Forbidden(format!(
            "Purchase order {} is {} and cannot be released",
            current.purchase_order_id, current.status
        )));
    }

    let mut update = PartialUpdate::new("purchase_order");
    update.set("status", Some(PurchaseOrderStatus::ToReceiveAndInvoice));
    if current.order_date.is_none() {
        update.set("order_date", Some(ctx.today()));
    }
    update.execute(pool, &ctx.company_id, id, &ctx.user_id).await?;

    match release.notification {
        ReleaseNotification::Email => info!(
            "Released purchase order {}; email notification to {} (cc {})",
            current.purchase_order_id,
            release.supplier_contact.as_deref().unwrap_or_default(),
            release.cc.join(", ")
        ),
        ReleaseNotification::None => {
            info!("Released purchase order {}", current.purchase_order_id)
        }
    }

    load(pool, ctx, id).await
}

/// Delete an order that was never released
pub async fn delete_purchase_order(pool: &SqlitePool, ctx: &RequestContext, id: &str) -> Result<()> {
    ctx.require(MODULE, Action::Delete)?;
    let current = load(pool, ctx, id).await?;

    if !current.status.is_deletable() {
        return Err(Error::Forbidden(format!(
            "Purchase order {} is {} and cannot be deleted",
            current.purchase_order_id, current.status
        )));
    }

    purchase_orders::delete_purchase_order(pool, &ctx.company_id, id).await?;
    info!("Deleted purchase order {} ({})", current.purchase_order_id, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use PurchaseOrderStatus::*;

    #[test]
    fn test_closed_stamp() {
        assert_eq!(closed_stamp(ToInvoice, Closed), ClosedStamp::Set);
        assert_eq!(closed_stamp(Closed, Completed), ClosedStamp::Clear);
        assert_eq!(closed_stamp(Closed, Closed), ClosedStamp::Keep);
        assert_eq!(closed_stamp(Draft, Planned), ClosedStamp::Keep);
    }
}
