//! Tenant-scoped query functions
//!
//! Thin wrappers over single SQL statements. Lookups return `Option` and
//! leave the not-found decision to the caller.

pub mod purchase_order_lines;
pub mod purchase_orders;
pub mod supplier_quotes;
pub mod suppliers;
