//! Purchase order create-or-update orchestration
//!
//! Creation runs, in order:
//! 1. parallel reads of the supplier, its payment and shipping defaults and
//!    the actor's default location (first failure aborts)
//! 2. exchange rate resolution (1 when unknown)
//! 3. readable id allocation
//! 4. supplier interaction insert
//! 5. header insert
//! 6. delivery satellite insert
//! 7. payment satellite insert
//!
//! A failure after step 4 deletes what was written (the header delete
//! cascades to satellites) and reports the failing step.

use mfg_common::db::{
    get_default_location, insert_supplier_interaction, next_sequence, resolve_exchange_rate,
    RollbackLog, SequenceKind,
};
use mfg_common::query::PartialUpdate;
use mfg_common::{CompanyId, DocumentRef, Error, Result, Upsert, UserId};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::{purchase_orders, suppliers};
use crate::models::{
    PurchaseOrderDetail, PurchaseOrderStatus, Supplier, SupplierPayment, SupplierShipping,
};
use crate::validators::{validate_delivery_update, PurchaseOrderForm, PurchaseOrderPatch};

/// New purchase order submitted by `created_by`
#[derive(Debug, Clone)]
pub struct PurchaseOrderCreate {
    pub created_by: UserId,
    pub form: PurchaseOrderForm,
}

/// Changes to purchase order `id` submitted by `updated_by`
#[derive(Debug, Clone)]
pub struct PurchaseOrderUpdate {
    pub id: String,
    pub updated_by: UserId,
    pub patch: PurchaseOrderPatch,
}

pub async fn upsert_purchase_order(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: Upsert<PurchaseOrderCreate, PurchaseOrderUpdate>,
) -> Result<DocumentRef> {
    match request {
        Upsert::Create(create) => create_purchase_order(pool, company_id, create).await,
        Upsert::Update(update) => update_purchase_order(pool, company_id, update).await,
    }
}

#[derive(Debug)]
struct SupplierDefaults {
    supplier: Supplier,
    payment: Option<SupplierPayment>,
    shipping: Option<SupplierShipping>,
    default_location: Option<String>,
}

async fn read_defaults(
    pool: &SqlitePool,
    company_id: &CompanyId,
    supplier_id: &str,
    actor: &UserId,
) -> Result<SupplierDefaults> {
    let (supplier, payment, shipping, default_location) = tokio::try_join!(
        suppliers::get_supplier(pool, company_id, supplier_id),
        suppliers::get_supplier_payment(pool, company_id, supplier_id),
        suppliers::get_supplier_shipping(pool, company_id, supplier_id),
        get_default_location(pool, company_id, actor),
    )?;

    let supplier = supplier.ok_or_else(|| Error::not_found("supplier", supplier_id))?;

    Ok(SupplierDefaults {
        supplier,
        payment,
        shipping,
        default_location,
    })
}

/// Fill fields the submission left empty from the supplier's defaults
fn apply_defaults(form: &mut PurchaseOrderForm, defaults: &SupplierDefaults) {
    let delivery = &mut form.delivery;
    if !delivery.drop_shipment && delivery.location_id.is_none() {
        delivery.location_id = defaults.default_location.clone();
    }
    if let Some(shipping) = &defaults.shipping {
        if delivery.shipping_method_id.is_none() {
            delivery.shipping_method_id = shipping.shipping_method_id.clone();
        }
        if delivery.shipping_term_id.is_none() {
            delivery.shipping_term_id = shipping.shipping_term_id.clone();
        }
    }

    let payment = &mut form.payment;
    if let Some(terms) = &defaults.payment {
        if payment.payment_term_id.is_none() {
            payment.payment_term_id = terms.payment_term_id.clone();
        }
        if payment.invoice_supplier_id.is_none() {
            payment.invoice_supplier_id = terms.invoice_supplier_id.clone();
        }
    }
    if payment.invoice_supplier_id.is_none() {
        payment.invoice_supplier_id = Some(form.supplier_id.clone());
    }

    if form.currency_code.is_none() {
        form.currency_code = defaults.supplier.currency_code.clone();
    }
}

async fn create_purchase_order(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: PurchaseOrderCreate,
) -> Result<DocumentRef> {
    let PurchaseOrderCreate { created_by, mut form } = request;

    let defaults = read_defaults(pool, company_id, &form.supplier_id, &created_by).await?;
    apply_defaults(&mut form, &defaults);

    let rate = resolve_exchange_rate(pool, company_id, form.currency_code.as_deref())
        .await
        .map_err(|e| Error::orchestration("resolve exchange rate", e))?;

    let readable_id = next_sequence(pool, company_id, SequenceKind::PurchaseOrder)
        .await
        .map_err(|e| Error::orchestration("allocate purchase order id", e))?;

    let mut written = RollbackLog::new(company_id);

    let interaction_id = insert_supplier_interaction(pool, company_id, &form.supplier_id, &created_by)
        .await
        .map_err(|e| Error::orchestration("insert supplier interaction", e))?;
    written.record("supplier_interaction", &interaction_id);

    let id = mfg_common::uuid_utils::generate();
    let header = purchase_orders::NewPurchaseOrder {
        id: &id,
        purchase_order_id: &readable_id,
        purchase_order_type: form.purchase_order_type,
        status: form.status.unwrap_or(PurchaseOrderStatus::Draft),
        supplier_id: &form.supplier_id,
        supplier_interaction_id: &interaction_id,
        supplier_contact_id: form.supplier_contact_id.as_deref(),
        supplier_location_id: form.supplier_location_id.as_deref(),
        supplier_reference: form.supplier_reference.as_deref(),
        order_date: form.order_date,
        currency_code: form.currency_code.as_deref(),
        exchange_rate: rate.rate,
        exchange_rate_updated_at: rate.updated_at,
        notes: form.notes.as_deref(),
    };
    if let Err(e) = purchase_orders::insert_purchase_order(pool, company_id, &header, &created_by).await {
        return Err(written.abort(pool, "insert purchase order", e).await);
    }
    written.record("purchase_order", &id);

    if let Err(e) =
        purchase_orders::insert_purchase_order_delivery(pool, company_id, &id, &form.delivery, &created_by).await
    {
        return Err(written.abort(pool, "insert purchase order delivery", e).await);
    }

    if let Err(e) =
        purchase_orders::insert_purchase_order_payment(pool, company_id, &id, &form.payment, &created_by).await
    {
        return Err(written.abort(pool, "insert purchase order payment", e).await);
    }

    info!(
        "Created purchase order {} ({}) for supplier {} in company {}",
        readable_id, id, form.supplier_id, company_id
    );
    Ok(DocumentRef {
        id,
        readable_id,
    })
}

/// Apply the present fields; each satellite update fails on its own with no undo
///
/// Delivery changes are checked against the stored delivery before anything
/// is written.
async fn update_purchase_order(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: PurchaseOrderUpdate,
) -> Result<DocumentRef> {
    let PurchaseOrderUpdate { id, updated_by, patch } = request;

    let current = purchase_orders::get_purchase_order(pool, company_id, &id)
        .await?
        .ok_or_else(|| Error::not_found("purchase order", &id))?;

    if !patch.delivery.is_empty() {
        let stored = purchase_orders::get_purchase_order_delivery(pool, company_id, &id)
            .await?
            .unwrap_or_default();
        validate_delivery_update(&stored, &patch.delivery)?;
    }

    let mut header = PartialUpdate::new("purchase_order");
    header
        .set("supplier_id", patch.supplier_id)
        .set("purchase_order_type", patch.purchase_order_type)
        .set("order_date", patch.order_date)
        .set("supplier_contact_id", patch.supplier_contact_id)
        .set("supplier_location_id", patch.supplier_location_id)
        .set("supplier_reference", patch.supplier_reference)
        .set("notes", patch.notes);

    if let Some(currency_code) = patch.currency_code {
        if currency_code != current.currency_code {
            let rate = resolve_exchange_rate(pool, company_id, currency_code.as_deref()).await?;
            debug!(
                "Currency of {} changed to {:?}, rate {}",
                current.purchase_order_id, currency_code, rate.rate
            );
            header
                .set("exchange_rate", Some(rate.rate))
                .set("exchange_rate_updated_at", Some(rate.updated_at));
        }
        header.set("currency_code", Some(currency_code));
    }

    if header.execute(pool, company_id, &id, &updated_by).await? == 0 {
        return Err(Error::not_found("purchase order", &id));
    }

    if !patch.delivery.is_empty() {
        let changes = patch.delivery;
        let location_id = match (changes.drop_shipment, changes.location_id) {
            (Some(true), None) => Some(None),
            (_, location_id) => location_id,
        };
        let mut delivery = PartialUpdate::new("purchase_order_delivery");
        delivery
            .set("location_id", location_id)
            .set("shipping_method_id", changes.shipping_method_id)
            .set("shipping_term_id", changes.shipping_term_id)
            .set("receipt_requested_date", changes.receipt_requested_date)
            .set("receipt_promised_date", changes.receipt_promised_date)
            .set("drop_shipment", changes.drop_shipment)
            .set("customer_id", changes.customer_id)
            .set("customer_location_id", changes.customer_location_id);
        delivery
            .execute(pool, company_id, &id, &updated_by)
            .await
            .map_err(|e| Error::orchestration("update purchase order delivery", e))?;
    }

    if !patch.payment.is_empty() {
        let changes = patch.payment;
        let mut payment = PartialUpdate::new("purchase_order_payment");
        payment
            .set("payment_term_id", changes.payment_term_id)
            .set("invoice_supplier_id", changes.invoice_supplier_id);
        payment
            .execute(pool, company_id, &id, &updated_by)
            .await
            .map_err(|e| Error::orchestration("update purchase order payment", e))?;
    }

    info!("Updated purchase order {} ({})", current.purchase_order_id, id);
    Ok(DocumentRef {
        id,
        readable_id: current.purchase_order_id,
    })
}

/// Header with delivery and payment, read in parallel
pub async fn get_purchase_order(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
) -> Result<Option<PurchaseOrderDetail>> {
    let (header, delivery, payment) = tokio::try_join!(
        purchase_orders::get_purchase_order(pool, company_id, id),
        purchase_orders::get_purchase_order_delivery(pool, company_id, id),
        purchase_orders::get_purchase_order_payment(pool, company_id, id),
    )?;

    Ok(header.map(|header| PurchaseOrderDetail {
        header,
        delivery,
        payment,
    }))
}
