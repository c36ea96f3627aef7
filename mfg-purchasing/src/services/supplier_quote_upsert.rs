//! Supplier quote create-or-update orchestration and quote lines
//!
//! A quote whose expiration date has passed is always stored as `Expired`,
//! whatever status the submission asked for.

use chrono::NaiveDate;
use mfg_common::db::{insert_supplier_interaction, next_sequence, resolve_exchange_rate, RollbackLog, SequenceKind};
use mfg_common::query::PartialUpdate;
use mfg_common::{Action, CompanyId, DocumentRef, Error, RequestContext, Result, Upsert, UserId};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::{supplier_quotes, suppliers};
use crate::models::{SupplierQuote, SupplierQuoteLine, SupplierQuoteStatus};
use crate::validators::{SupplierQuoteForm, SupplierQuoteLineForm, SupplierQuotePatch};

#[derive(Debug, Clone)]
pub struct SupplierQuoteCreate {
    pub created_by: UserId,
    pub form: SupplierQuoteForm,
}

#[derive(Debug, Clone)]
pub struct SupplierQuoteUpdate {
    pub id: String,
    pub updated_by: UserId,
    pub patch: SupplierQuotePatch,
}

/// Status to store given the expiration date and the caller's local date
pub fn effective_quote_status(
    expiration_date: Option<NaiveDate>,
    requested: Option<SupplierQuoteStatus>,
    today: NaiveDate,
) -> Option<SupplierQuoteStatus> {
    match expiration_date {
        Some(expires) if expires < today => Some(SupplierQuoteStatus::Expired),
        _ => requested,
    }
}

/// `today` is the caller's local date
pub async fn upsert_supplier_quote(
    pool: &SqlitePool,
    company_id: &CompanyId,
    today: NaiveDate,
    request: Upsert<SupplierQuoteCreate, SupplierQuoteUpdate>,
) -> Result<DocumentRef> {
    match request {
        Upsert::Create(create) => create_supplier_quote(pool, company_id, today, create).await,
        Upsert::Update(update) => update_supplier_quote(pool, company_id, today, update).await,
    }
}

async fn create_supplier_quote(
    pool: &SqlitePool,
    company_id: &CompanyId,
    today: NaiveDate,
    request: SupplierQuoteCreate,
) -> Result<DocumentRef> {
    let SupplierQuoteCreate { created_by, mut form } = request;

    let supplier = suppliers::get_supplier(pool, company_id, &form.supplier_id)
        .await?
        .ok_or_else(|| Error::not_found("supplier", &form.supplier_id))?;
    if form.currency_code.is_none() {
        form.currency_code = supplier.currency_code;
    }

    let rate = resolve_exchange_rate(pool, company_id, form.currency_code.as_deref())
        .await
        .map_err(|e| Error::orchestration("resolve exchange rate", e))?;

    let readable_id = next_sequence(pool, company_id, SequenceKind::SupplierQuote)
        .await
        .map_err(|e| Error::orchestration("allocate supplier quote id", e))?;

    let mut written = RollbackLog::new(company_id);

    let interaction_id = insert_supplier_interaction(pool, company_id, &form.supplier_id, &created_by)
        .await
        .map_err(|e| Error::orchestration("insert supplier interaction", e))?;
    written.record("supplier_interaction", &interaction_id);

    let status = effective_quote_status(form.expiration_date, form.status, today)
        .unwrap_or(SupplierQuoteStatus::Active);

    let id = mfg_common::uuid_utils::generate();
    let quote = supplier_quotes::NewSupplierQuote {
        id: &id,
        supplier_quote_id: &readable_id,
        supplier_id: &form.supplier_id,
        supplier_interaction_id: &interaction_id,
        supplier_reference: form.supplier_reference.as_deref(),
        status,
        quoted_date: form.quoted_date,
        expiration_date: form.expiration_date,
        currency_code: form.currency_code.as_deref(),
        exchange_rate: rate.rate,
        exchange_rate_updated_at: rate.updated_at,
        notes: form.notes.as_deref(),
    };
    if let Err(e) = supplier_quotes::insert_supplier_quote(pool, company_id, &quote, &created_by).await {
        return Err(written.abort(pool, "insert supplier quote", e).await);
    }

    info!(
        "Created supplier quote {} ({}) for supplier {} in company {}",
        readable_id, id, form.supplier_id, company_id
    );
    Ok(DocumentRef { id, readable_id })
}

async fn update_supplier_quote(
    pool: &SqlitePool,
    company_id: &CompanyId,
    today: NaiveDate,
    request: SupplierQuoteUpdate,
) -> Result<DocumentRef> {
    let SupplierQuoteUpdate { id, updated_by, patch } = request;

    let current = supplier_quotes::get_supplier_quote(pool, company_id, &id)
        .await?
        .ok_or_else(|| Error::not_found("supplier quote", &id))?;

    let expiration_date = patch.expiration_date.unwrap_or(current.expiration_date);
    let status = effective_quote_status(expiration_date, patch.status, today);

    let mut update = PartialUpdate::new("supplier_quote");
    update
        .set("supplier_id", patch.supplier_id)
        .set("supplier_reference", patch.supplier_reference)
        .set("status", status)
        .set("quoted_date", patch.quoted_date)
        .set("expiration_date", patch.expiration_date)
        .set("notes", patch.notes);

    if let Some(currency_code) = patch.currency_code {
        if currency_code != current.currency_code {
            let rate = resolve_exchange_rate(pool, company_id, currency_code.as_deref()).await?;
            update
                .set("exchange_rate", Some(rate.rate))
                .set("exchange_rate_updated_at", Some(rate.updated_at));
        }
        update.set("currency_code", Some(currency_code));
    }

    if update.execute(pool, company_id, &id, &updated_by).await? == 0 {
        return Err(Error::not_found("supplier quote", &id));
    }

    if status == Some(SupplierQuoteStatus::Expired) && current.status != SupplierQuoteStatus::Expired {
        info!("Supplier quote {} marked Expired", current.supplier_quote_id);
    }
    Ok(DocumentRef {
        id,
        readable_id: current.supplier_quote_id,
    })
}

async fn existing_quote(pool: &SqlitePool, ctx: &RequestContext, supplier_quote_id: &str) -> Result<SupplierQuote> {
    supplier_quotes::get_supplier_quote(pool, &ctx.company_id, supplier_quote_id)
        .await?
        .ok_or_else(|| Error::not_found("supplier quote", supplier_quote_id))
}

pub async fn create_supplier_quote_line(
    pool: &SqlitePool,
    ctx: &RequestContext,
    supplier_quote_id: &str,
    line: SupplierQuoteLineForm,
) -> Result<String> {
    ctx.require("purchasing", Action::Create)?;
    existing_quote(pool, ctx, supplier_quote_id).await?;
    supplier_quotes::insert_supplier_quote_line(pool, &ctx.company_id, supplier_quote_id, &line, &ctx.user_id).await
}

pub async fn update_supplier_quote_line(
    pool: &SqlitePool,
    ctx: &RequestContext,
    supplier_quote_id: &str,
    line_id: &str,
    line: SupplierQuoteLineForm,
) -> Result<()> {
    ctx.require("purchasing", Action::Update)?;
    let updated = supplier_quotes::update_supplier_quote_line(
        pool,
        &ctx.company_id,
        supplier_quote_id,
        line_id,
        &line,
        &ctx.user_id,
    )
    .await?;
    if updated == 0 {
        return Err(Error::not_found("supplier quote line", line_id));
    }
    Ok(())
}

pub async fn delete_supplier_quote_line(
    pool: &SqlitePool,
    ctx: &RequestContext,
    supplier_quote_id: &str,
    line_id: &str,
) -> Result<()> {
    ctx.require("purchasing", Action::Delete)?;
    if supplier_quotes::delete_supplier_quote_line(pool, &ctx.company_id, supplier_quote_id, line_id).await? == 0 {
        return Err(Error::not_found("supplier quote line", line_id));
    }
    Ok(())
}

pub async fn list_supplier_quote_lines(
    pool: &SqlitePool,
    ctx: &RequestContext,
    supplier_quote_id: &str,
) -> Result<Vec<SupplierQuoteLine>> {
    existing_quote(pool, ctx, supplier_quote_id).await?;
    supplier_quotes::list_supplier_quote_lines(pool, &ctx.company_id, supplier_quote_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_past_expiration_forces_expired() {
        let today = date(2026, 10, 19);
        assert_eq!(
            effective_quote_status(Some(date(2026, 10, 18)), Some(SupplierQuoteStatus::Active), today),
            Some(SupplierQuoteStatus::Expired)
        );
        assert_eq!(
            effective_quote_status(Some(date(2026, 10, 18)), None, today),
            Some(SupplierQuoteStatus::Expired)
        );
    }

    #[test]
    fn test_expiring_today_keeps_requested_status() {
        let today = date(2026, 10, 19);
        assert_eq!(
            effective_quote_status(Some(today), Some(SupplierQuoteStatus::Ordered), today),
            Some(SupplierQuoteStatus::Ordered)
        );
        assert_eq!(effective_quote_status(None, None, today), None);
    }
}
