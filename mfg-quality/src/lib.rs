//! mfg-quality library - Quality module
//!
//! Non-conformance issues with their links to affected records, quality
//! documents with inspection steps, and the gauge register with its
//! calibration history.

use axum::Router;
use mfg_common::storage::DocumentStore;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod models;
pub mod services;
pub mod validators;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub documents: DocumentStore,
}

impl AppState {
    pub fn new(db: SqlitePool, documents: DocumentStore) -> Self {
        Self { db, documents }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes())
        .merge(mfg_common::api::health_routes(
            "mfg-quality",
            env!("CARGO_PKG_VERSION"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
