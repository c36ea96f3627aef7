//! Option lists for quality forms

use axum::Json;
use mfg_common::api::{catalog_options, SelectOption};

use crate::models::{
    GaugeCalibrationStatus, GaugeStatus, InspectionStatus, IssuePriority, IssueStatus,
    QualityDocumentStatus, QualityDocumentStepType,
};

pub async fn issue_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<IssueStatus>()
}

pub async fn issue_priorities() -> Json<Vec<SelectOption>> {
    catalog_options::<IssuePriority>()
}

pub async fn quality_document_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<QualityDocumentStatus>()
}

pub async fn quality_document_step_types() -> Json<Vec<SelectOption>> {
    catalog_options::<QualityDocumentStepType>()
}

pub async fn gauge_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<GaugeStatus>()
}

pub async fn gauge_calibration_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<GaugeCalibrationStatus>()
}

pub async fn inspection_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<InspectionStatus>()
}
