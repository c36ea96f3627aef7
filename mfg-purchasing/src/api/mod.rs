//! HTTP API handlers for mfg-purchasing
//!
//! Handlers parse the body into a [`mfg_common::FormInput`], run the
//! validator, check the caller's grant and hand off to `services`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::AppState;

pub mod files;
pub mod options;
pub mod purchase_orders;
pub mod supplier_quotes;
pub mod suppliers;

pub(crate) const MODULE: &str = "purchasing";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/suppliers",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/api/suppliers/:id",
            get(suppliers::get_supplier).patch(suppliers::update_supplier),
        )
        .route("/api/suppliers/:id/payment", put(suppliers::put_supplier_payment))
        .route("/api/suppliers/:id/shipping", put(suppliers::put_supplier_shipping))
        .route(
            "/api/purchase-orders",
            get(purchase_orders::list_purchase_orders).post(purchase_orders::create_purchase_order),
        )
        .route(
            "/api/purchase-orders/:id",
            get(purchase_orders::get_purchase_order)
                .patch(purchase_orders::update_purchase_order)
                .delete(purchase_orders::delete_purchase_order),
        )
        .route("/api/purchase-orders/:id/status", post(purchase_orders::update_status))
        .route("/api/purchase-orders/:id/release", post(purchase_orders::release))
        .route(
            "/api/purchase-orders/:id/lines",
            get(purchase_orders::list_lines).post(purchase_orders::create_line),
        )
        .route(
            "/api/purchase-orders/:id/lines/:line_id",
            put(purchase_orders::update_line).delete(purchase_orders::delete_line),
        )
        .route("/api/purchase-orders/:id/files", get(files::list_purchase_order_files))
        .route(
            "/api/supplier-quotes",
            get(supplier_quotes::list_supplier_quotes).post(supplier_quotes::create_supplier_quote),
        )
        .route(
            "/api/supplier-quotes/:id",
            get(supplier_quotes::get_supplier_quote).patch(supplier_quotes::update_supplier_quote),
        )
        .route(
            "/api/supplier-quotes/:id/lines",
            get(supplier_quotes::list_lines).post(supplier_quotes::create_line),
        )
        .route(
            "/api/supplier-quotes/:id/lines/:line_id",
            put(supplier_quotes::update_line).delete(supplier_quotes::delete_line),
        )
        .route("/api/options/purchase-order-statuses", get(options::purchase_order_statuses))
        .route("/api/options/purchase-order-types", get(options::purchase_order_types))
        .route("/api/options/purchase-order-line-types", get(options::purchase_order_line_types))
        .route("/api/options/supplier-quote-statuses", get(options::supplier_quote_statuses))
}
