//! HTTP API handlers for mfg-quality

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::AppState;

pub mod files;
pub mod gauges;
pub mod issues;
pub mod options;
pub mod quality_documents;

pub(crate) const MODULE: &str = "quality";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/issues", get(issues::list_issues).post(issues::create_issue))
        .route(
            "/api/issues/:id",
            get(issues::get_issue)
                .patch(issues::update_issue)
                .delete(issues::delete_issue),
        )
        .route("/api/issues/:id/status", post(issues::update_status))
        .route("/api/issues/:id/associations", get(issues::list_associations))
        .route("/api/issues/:id/associations/:kind", post(issues::add_association))
        .route(
            "/api/issues/:id/associations/:kind/:association_id",
            delete(issues::delete_association),
        )
        .route("/api/issues/:id/files", get(files::list_issue_files))
        .route(
            "/api/quality-documents",
            get(quality_documents::list_quality_documents)
                .post(quality_documents::create_quality_document),
        )
        .route(
            "/api/quality-documents/:id",
            get(quality_documents::get_quality_document)
                .put(quality_documents::update_quality_document)
                .delete(quality_documents::delete_quality_document),
        )
        .route(
            "/api/quality-documents/:id/steps",
            get(quality_documents::list_steps).post(quality_documents::create_step),
        )
        .route(
            "/api/quality-documents/:id/steps/:step_id",
            put(quality_documents::update_step).delete(quality_documents::delete_step),
        )
        .route("/api/gauges", get(gauges::list_gauges).post(gauges::create_gauge))
        .route("/api/gauges/:id", get(gauges::get_gauge).put(gauges::update_gauge))
        .route(
            "/api/gauges/:id/calibrations",
            get(gauges::list_calibrations).post(gauges::record_calibration),
        )
        .route("/api/gauge-calibration-records", get(gauges::list_calibration_records))
        .route("/api/options/issue-statuses", get(options::issue_statuses))
        .route("/api/options/issue-priorities", get(options::issue_priorities))
        .route("/api/options/quality-document-statuses", get(options::quality_document_statuses))
        .route("/api/options/quality-document-step-types", get(options::quality_document_step_types))
        .route("/api/options/gauge-statuses", get(options::gauge_statuses))
        .route("/api/options/gauge-calibration-statuses", get(options::gauge_calibration_statuses))
        .route("/api/options/inspection-statuses", get(options::inspection_statuses))
}
