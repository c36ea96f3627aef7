//! mfg-purchasing library - Purchasing module
//!
//! Suppliers, purchase orders with their delivery/payment satellites and
//! lines, supplier quotes, and the HTTP routes over them.

use axum::Router;
use mfg_common::storage::DocumentStore;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod models;
pub mod services;
pub mod validators;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared database pool
    pub db: SqlitePool,
    /// Attachment folders under the root folder
    pub documents: DocumentStore,
}

impl AppState {
    pub fn new(db: SqlitePool, documents: DocumentStore) -> Self {
        Self { db, documents }
    }
}

/// Build application router
///
/// `/health` needs no request context; every `/api` route does.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes())
        .merge(mfg_common::api::health_routes(
            "mfg-purchasing",
            env!("CARGO_PKG_VERSION"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
