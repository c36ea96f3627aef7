//! Option lists for purchasing forms

use axum::Json;
use mfg_common::api::{catalog_options, SelectOption};

use crate::models::{
    PurchaseOrderLineType, PurchaseOrderStatus, PurchaseOrderType, SupplierQuoteStatus,
};

pub async fn purchase_order_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<PurchaseOrderStatus>()
}

pub async fn purchase_order_types() -> Json<Vec<SelectOption>> {
    catalog_options::<PurchaseOrderType>()
}

pub async fn purchase_order_line_types() -> Json<Vec<SelectOption>> {
    catalog_options::<PurchaseOrderLineType>()
}

pub async fn supplier_quote_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<SupplierQuoteStatus>()
}
