//! Option lists for resources forms

use axum::Json;
use mfg_common::api::{catalog_options, SelectOption};

use crate::models::{
    MaintenanceDispatchStatus, MaintenancePriority, MaintenanceSource, TrainingFrequency, TrainingStatus,
    TrainingType,
};

pub async fn maintenance_dispatch_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<MaintenanceDispatchStatus>()
}

pub async fn maintenance_priorities() -> Json<Vec<SelectOption>> {
    catalog_options::<MaintenancePriority>()
}

pub async fn maintenance_sources() -> Json<Vec<SelectOption>> {
    catalog_options::<MaintenanceSource>()
}

pub async fn training_frequencies() -> Json<Vec<SelectOption>> {
    catalog_options::<TrainingFrequency>()
}

pub async fn training_types() -> Json<Vec<SelectOption>> {
    catalog_options::<TrainingType>()
}

pub async fn training_statuses() -> Json<Vec<SelectOption>> {
    catalog_options::<TrainingStatus>()
}
