//! Form validators
//!
//! Each validator turns a raw [`mfg_common::FormInput`] into a typed form or
//! the full list of field-attributed violations.

pub mod purchase_order;
pub mod supplier;
pub mod supplier_quote;

pub use purchase_order::{
    validate_delivery_update, validate_purchase_order, validate_purchase_order_line,
    validate_purchase_order_patch, validate_release, DeliveryForm, DeliveryPatch, PaymentForm, PaymentPatch, PurchaseOrderForm,
    PurchaseOrderLineForm, PurchaseOrderPatch, ReleaseForm,
};
pub use supplier::{
    validate_supplier, validate_supplier_patch, validate_supplier_payment,
    validate_supplier_shipping, SupplierForm, SupplierPatch, SupplierPaymentForm,
    SupplierShippingForm,
};
pub use supplier_quote::{
    validate_supplier_quote, validate_supplier_quote_line, validate_supplier_quote_patch,
    SupplierQuoteForm, SupplierQuoteLineForm, SupplierQuotePatch,
};
