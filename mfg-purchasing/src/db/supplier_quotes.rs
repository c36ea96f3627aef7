//! Supplier quote and quote line queries

use chrono::{DateTime, NaiveDate, Utc};
use mfg_common::query::{ListParams, ListQuery, Page, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{SupplierQuote, SupplierQuoteLine, SupplierQuoteStatus};
use crate::validators::SupplierQuoteLineForm;

const SUPPLIER_QUOTE_SORT: &[&str] = &[
    "supplier_quote_id",
    "status",
    "quoted_date",
    "expiration_date",
    "created_at",
];

#[derive(Debug, Clone)]
pub struct NewSupplierQuote<'a> {
    pub id: &'a str,
    pub supplier_quote_id: &'a str,
    pub supplier_id: &'a str,
    pub supplier_interaction_id: &'a str,
    pub supplier_reference: Option<&'a str>,
    pub status: SupplierQuoteStatus,
    pub quoted_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub currency_code: Option<&'a str>,
    pub exchange_rate: f64,
    pub exchange_rate_updated_at: DateTime<Utc>,
    pub notes: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierQuoteFilters {
    pub status: Option<SupplierQuoteStatus>,
    pub supplier_id: Option<String>,
}

pub async fn insert_supplier_quote(
    pool: &SqlitePool,
    company_id: &CompanyId,
    quote: &NewSupplierQuote<'_>,
    actor: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO supplier_quote (
            id, company_id, supplier_quote_id, supplier_id, supplier_interaction_id,
            supplier_reference, status, quoted_date, expiration_date, currency_code,
            exchange_rate, exchange_rate_updated_at, notes, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(quote.id)
    .bind(company_id.as_str())
    .bind(quote.supplier_quote_id)
    .bind(quote.supplier_id)
    .bind(quote.supplier_interaction_id)
    .bind(quote.supplier_reference)
    .bind(quote.status)
    .bind(quote.quoted_date)
    .bind(quote.expiration_date)
    .bind(quote.currency_code)
    .bind(quote.exchange_rate)
    .bind(quote.exchange_rate_updated_at)
    .bind(quote.notes)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_supplier_quote(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<SupplierQuote>> {
    let quote = sqlx::query_as("SELECT * FROM supplier_quote WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(quote)
}

pub async fn list_supplier_quotes(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &SupplierQuoteFilters,
) -> Result<Page<SupplierQuote>> {
    ListQuery::new("supplier_quote", company_id)
        .search(&["supplier_quote_id", "supplier_reference"], params.search.as_deref())
        .eq("status", filters.status.map(|s| s.to_string()))
        .eq("supplier_id", filters.supplier_id.as_ref())
        .sort(SUPPLIER_QUOTE_SORT, "created_at", SortOrder::Desc)
        .fetch_page(pool, params)
        .await
}

pub async fn insert_supplier_quote_line(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_quote_id: &str,
    line: &SupplierQuoteLineForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO supplier_quote_line (
            id, company_id, supplier_quote_id, item_id, description, quantity,
            unit_price, lead_time, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(supplier_quote_id)
    .bind(&line.item_id)
    .bind(&line.description)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.lead_time)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn update_supplier_quote_line(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_quote_id: &str,
    line_id: &str,
    line: &SupplierQuoteLineForm,
    actor: &UserId,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE supplier_quote_line SET
            item_id = ?, description = ?, quantity = ?, unit_price = ?, lead_time = ?,
            updated_by = ?, updated_at = ?
        WHERE id = ? AND supplier_quote_id = ? AND company_id = ?
        "#,
    )
    .bind(&line.item_id)
    .bind(&line.description)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.lead_time)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .bind(line_id)
    .bind(supplier_quote_id)
    .bind(company_id.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_supplier_quote_line(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_quote_id: &str,
    line_id: &str,
) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM supplier_quote_line WHERE id = ? AND supplier_quote_id = ? AND company_id = ?",
    )
    .bind(line_id)
    .bind(supplier_quote_id)
    .bind(company_id.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list_supplier_quote_lines(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_quote_id: &str,
) -> Result<Vec<SupplierQuoteLine>> {
    let lines = sqlx::query_as(
        r#"
        SELECT id, supplier_quote_id, item_id, description, quantity, unit_price,
               lead_time, created_by, created_at
        FROM supplier_quote_line
        WHERE supplier_quote_id = ? AND company_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(supplier_quote_id)
    .bind(company_id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(lines)
}
