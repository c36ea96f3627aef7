//! Purchase order header and satellite queries

use chrono::{DateTime, NaiveDate, Utc};
use mfg_common::query::{ListParams, ListQuery, Page, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{
    PurchaseOrder, PurchaseOrderDelivery, PurchaseOrderPayment, PurchaseOrderStatus,
    PurchaseOrderType,
};
use crate::validators::{DeliveryForm, PaymentForm};

const PURCHASE_ORDER_SORT: &[&str] = &[
    "purchase_order_id",
    "status",
    "order_date",
    "supplier_reference",
    "created_at",
];

/// Header values resolved by the creation orchestrator
#[derive(Debug, Clone)]
pub struct NewPurchaseOrder<'a> {
    pub id: &'a str,
    pub purchase_order_id: &'a str,
    pub purchase_order_type: PurchaseOrderType,
    pub status: PurchaseOrderStatus,
    pub supplier_id: &'a str,
    pub supplier_interaction_id: &'a str,
    pub supplier_contact_id: Option<&'a str>,
    pub supplier_location_id: Option<&'a str>,
    pub supplier_reference: Option<&'a str>,
    pub order_date: Option<NaiveDate>,
    pub currency_code: Option<&'a str>,
    pub exchange_rate: f64,
    pub exchange_rate_updated_at: DateTime<Utc>,
    pub notes: Option<&'a str>,
}

/// Equality filters for the list view
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderFilters {
    pub status: Option<PurchaseOrderStatus>,
    pub supplier_id: Option<String>,
}

pub async fn insert_purchase_order(
    pool: &SqlitePool,
    company_id: &CompanyId,
    order: &NewPurchaseOrder<'_>,
    actor: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO purchase_order (
            id, company_id, purchase_order_id, purchase_order_type, status,
            supplier_id, supplier_interaction_id, supplier_contact_id, supplier_location_id,
            supplier_reference, order_date, currency_code, exchange_rate,
            exchange_rate_updated_at, notes, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(order.id)
    .bind(company_id.as_str())
    .bind(order.purchase_order_id)
    .bind(order.purchase_order_type)
    .bind(order.status)
    .bind(order.supplier_id)
    .bind(order.supplier_interaction_id)
    .bind(order.supplier_contact_id)
    .bind(order.supplier_location_id)
    .bind(order.supplier_reference)
    .bind(order.order_date)
    .bind(order.currency_code)
    .bind(order.exchange_rate)
    .bind(order.exchange_rate_updated_at)
    .bind(order.notes)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_purchase_order_delivery(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    delivery: &DeliveryForm,
    actor: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO purchase_order_delivery (
            id, company_id, location_id, shipping_method_id, shipping_term_id,
            receipt_requested_date, receipt_promised_date, drop_shipment,
            customer_id, customer_location_id, updated_by, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(company_id.as_str())
    .bind(&delivery.location_id)
    .bind(&delivery.shipping_method_id)
    .bind(&delivery.shipping_term_id)
    .bind(delivery.receipt_requested_date)
    .bind(delivery.receipt_promised_date)
    .bind(delivery.drop_shipment)
    .bind(&delivery.customer_id)
    .bind(&delivery.customer_location_id)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_purchase_order_payment(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    payment: &PaymentForm,
    actor: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO purchase_order_payment (
            id, company_id, payment_term_id, invoice_supplier_id, updated_by, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(company_id.as_str())
    .bind(&payment.payment_term_id)
    .bind(&payment.invoice_supplier_id)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_purchase_order(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<PurchaseOrder>> {
    let order = sqlx::query_as("SELECT * FROM purchase_order WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn get_purchase_order_delivery(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
) -> Result<Option<PurchaseOrderDelivery>> {
    let delivery = sqlx::query_as(
        r#"
        SELECT id, location_id, shipping_method_id, shipping_term_id, receipt_requested_date,
               receipt_promised_date, drop_shipment, customer_id, customer_location_id
        FROM purchase_order_delivery
        WHERE id = ? AND company_id = ?
        "#,
    )
    .bind(id)
    .bind(company_id.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(delivery)
}

pub async fn get_purchase_order_payment(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
) -> Result<Option<PurchaseOrderPayment>> {
    let payment = sqlx::query_as(
        r#"
        SELECT id, payment_term_id, invoice_supplier_id, payment_complete
        FROM purchase_order_payment
        WHERE id = ? AND company_id = ?
        "#,
    )
    .bind(id)
    .bind(company_id.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(payment)
}

pub async fn list_purchase_orders(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &PurchaseOrderFilters,
) -> Result<Page<PurchaseOrder>> {
    ListQuery::new("purchase_order", company_id)
        .search(&["purchase_order_id", "supplier_reference"], params.search.as_deref())
        .eq("status", filters.status.map(|s| s.to_string()))
        .eq("supplier_id", filters.supplier_id.as_ref())
        .sort(PURCHASE_ORDER_SORT, "created_at", SortOrder::Desc)
        .fetch_page(pool, params)
        .await
}

/// Delete the header and its supplier interaction in one transaction
///
/// Satellites and lines go with the header through `ON DELETE CASCADE`.
pub async fn delete_purchase_order(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let interaction_id: Option<Option<String>> = sqlx::query_scalar(
        "SELECT supplier_interaction_id FROM purchase_order WHERE id = ? AND company_id = ?",
    )
    .bind(id)
    .bind(company_id.as_str())
    .fetch_optional(&mut *tx)
    .await?;

    let result = sqlx::query("DELETE FROM purchase_order WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .execute(&mut *tx)
        .await?;

    if let Some(Some(interaction_id)) = interaction_id {
        sqlx::query("DELETE FROM supplier_interaction WHERE id = ? AND company_id = ?")
            .bind(&interaction_id)
            .bind(company_id.as_str())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(result.rows_affected())
}
