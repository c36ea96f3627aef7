//! Supplier creation with default-terms satellites

use mfg_common::db::RollbackLog;
use mfg_common::{CompanyId, Error, Result, UserId};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::suppliers;
use crate::validators::{SupplierForm, SupplierPatch, SupplierPaymentForm, SupplierShippingForm};

/// Insert the supplier and its payment and shipping defaults
///
/// A failed satellite insert deletes the supplier again.
pub async fn create_supplier(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: SupplierForm,
    actor: &UserId,
) -> Result<String> {
    let id = suppliers::insert_supplier(pool, company_id, &form, actor)
        .await
        .map_err(|e| Error::orchestration("insert supplier", e))?;

    let mut written = RollbackLog::new(company_id);
    written.record("supplier", &id);

    if let Err(e) = suppliers::upsert_supplier_payment(pool, company_id, &id, &form.payment, actor).await {
        return Err(written.abort(pool, "insert supplier payment", e).await);
    }
    if let Err(e) = suppliers::upsert_supplier_shipping(pool, company_id, &id, &form.shipping, actor).await {
        return Err(written.abort(pool, "insert supplier shipping", e).await);
    }

    info!("Created supplier {} ({})", form.name, id);
    Ok(id)
}

pub async fn update_supplier(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    patch: SupplierPatch,
    actor: &UserId,
) -> Result<()> {
    if suppliers::update_supplier(pool, company_id, id, patch, actor).await? == 0 {
        return Err(Error::not_found("supplier", id));
    }
    Ok(())
}

async fn require_supplier(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<()> {
    suppliers::get_supplier(pool, company_id, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| Error::not_found("supplier", id))
}

pub async fn upsert_supplier_payment(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
    form: SupplierPaymentForm,
    actor: &UserId,
) -> Result<()> {
    require_supplier(pool, company_id, supplier_id).await?;
    suppliers::upsert_supplier_payment(pool, company_id, supplier_id, &form, actor).await
}

pub async fn upsert_supplier_shipping(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
    form: SupplierShippingForm,
    actor: &UserId,
) -> Result<()> {
    require_supplier(pool, company_id, supplier_id).await?;
    suppliers::upsert_supplier_shipping(pool, company_id, supplier_id, &form, actor).await
}
