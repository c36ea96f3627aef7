//! Orchestration of multi-step document writes and status transitions

pub mod purchase_order_lines;
pub mod purchase_order_status;
pub mod purchase_order_upsert;
pub mod supplier_quote_upsert;
pub mod suppliers;

pub use purchase_order_status::{
    delete_purchase_order, release_purchase_order, update_purchase_order_status,
};
pub use purchase_order_upsert::{
    get_purchase_order, upsert_purchase_order, PurchaseOrderCreate, PurchaseOrderUpdate,
};
pub use supplier_quote_upsert::{upsert_supplier_quote, SupplierQuoteCreate, SupplierQuoteUpdate};
