//! Supplier queries

use mfg_common::query::{ListParams, ListQuery, Page, PartialUpdate, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use sqlx::SqlitePool;

use crate::models::{Supplier, SupplierPayment, SupplierShipping};
use crate::validators::{SupplierForm, SupplierPatch, SupplierPaymentForm, SupplierShippingForm};

const SUPPLIER_SORT: &[&str] = &["name", "created_at", "currency_code"];

pub async fn insert_supplier(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &SupplierForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO supplier (id, company_id, name, currency_code, tax_id, website, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.name)
    .bind(&form.currency_code)
    .bind(&form.tax_id)
    .bind(&form.website)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn update_supplier(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    patch: SupplierPatch,
    actor: &UserId,
) -> Result<u64> {
    let mut update = PartialUpdate::new("supplier");
    update
        .set("name", patch.name)
        .set("currency_code", patch.currency_code)
        .set("tax_id", patch.tax_id)
        .set("website", patch.website);
    update.execute(pool, company_id, id, actor).await
}

pub async fn get_supplier(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<Supplier>> {
    let supplier = sqlx::query_as("SELECT * FROM supplier WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(supplier)
}

pub async fn list_suppliers(pool: &SqlitePool, company_id: &CompanyId, params: &ListParams) -> Result<Page<Supplier>> {
    ListQuery::new("supplier", company_id)
        .search(&["name"], params.search.as_deref())
        .sort(SUPPLIER_SORT, "name", SortOrder::Asc)
        .fetch_page(pool, params)
        .await
}

pub async fn get_supplier_payment(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
) -> Result<Option<SupplierPayment>> {
    let payment = sqlx::query_as(
        "SELECT supplier_id, payment_term_id, invoice_supplier_id FROM supplier_payment WHERE supplier_id = ? AND company_id = ?",
    )
    .bind(supplier_id)
    .bind(company_id.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(payment)
}

pub async fn get_supplier_shipping(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
) -> Result<Option<SupplierShipping>> {
    let shipping = sqlx::query_as(
        "SELECT supplier_id, shipping_method_id, shipping_term_id FROM supplier_shipping WHERE supplier_id = ? AND company_id = ?",
    )
    .bind(supplier_id)
    .bind(company_id.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(shipping)
}

/// Insert or replace the supplier's default payment terms
pub async fn upsert_supplier_payment(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
    form: &SupplierPaymentForm,
    actor: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO supplier_payment (supplier_id, company_id, payment_term_id, invoice_supplier_id, updated_by, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (supplier_id) DO UPDATE SET
            payment_term_id = excluded.payment_term_id,
            invoice_supplier_id = excluded.invoice_supplier_id,
            updated_by = excluded.updated_by,
            updated_at = excluded.updated_at
        WHERE supplier_payment.company_id = excluded.company_id
        "#,
    )
    .bind(supplier_id)
    .bind(company_id.as_str())
    .bind(&form.payment_term_id)
    .bind(&form.invoice_supplier_id)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert or replace the supplier's default shipping terms
pub async fn upsert_supplier_shipping(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
    form: &SupplierShippingForm,
    actor: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO supplier_shipping (supplier_id, company_id, shipping_method_id, shipping_term_id, updated_by, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (supplier_id) DO UPDATE SET
            shipping_method_id = excluded.shipping_method_id,
            shipping_term_id = excluded.shipping_term_id,
            updated_by = excluded.updated_by,
            updated_at = excluded.updated_at
        WHERE supplier_shipping.company_id = excluded.company_id
        "#,
    )
    .bind(supplier_id)
    .bind(company_id.as_str())
    .bind(&form.shipping_method_id)
    .bind(&form.shipping_term_id)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(())
}
