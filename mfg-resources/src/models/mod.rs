//! Resources enumerations and row types

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

mfg_common::catalog_enum! {
    pub enum MaintenanceDispatchStatus {
        Open => "Open",
        Assigned => "Assigned",
        InProgress => "In Progress",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

impl MaintenanceDispatchStatus {
    /// Completed and cancelled dispatches are only reopened with delete rights
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MaintenanceDispatchStatus::Completed | MaintenanceDispatchStatus::Cancelled
        )
    }
}

mfg_common::catalog_enum! {
    pub enum MaintenancePriority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

mfg_common::catalog_enum! {
    /// Why the dispatch was raised
    pub enum MaintenanceSource {
        Scheduled => "Scheduled",
        Reactive => "Reactive",
        NonConformance => "Non-Conformance",
    }
}

mfg_common::catalog_enum! {
    pub enum TrainingFrequency {
        Once => "Once",
        Quarterly => "Quarterly",
        Annual => "Annual",
    }
}

mfg_common::catalog_enum! {
    pub enum TrainingType {
        Mandatory => "Mandatory",
        Optional => "Optional",
    }
}

mfg_common::catalog_enum! {
    pub enum TrainingStatus {
        Draft => "Draft",
        Active => "Active",
        Archived => "Archived",
    }
}

mfg_common::catalog_enum! {
    pub enum TrainingAssignmentState {
        Completed => "Completed",
        Pending => "Pending",
        Overdue => "Overdue",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub timezone: Option<String>,
    pub address_line_1: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Employee with the location of their job, when one is recorded
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub company_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub active: bool,
    pub location_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenter {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub location_id: String,
    pub labor_rate: f64,
    pub machine_rate: f64,
    pub overhead_rate: f64,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDispatch {
    pub id: String,
    pub company_id: String,
    pub maintenance_dispatch_id: String,
    pub work_center_id: String,
    pub status: MaintenanceDispatchStatus,
    pub priority: MaintenancePriority,
    pub source: MaintenanceSource,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub planned_start_time: Option<NaiveDate>,
    pub planned_end_time: Option<NaiveDate>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    pub frequency: TrainingFrequency,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub training_type: TrainingType,
    pub status: TrainingStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrainingCompletion {
    pub id: String,
    pub training_id: String,
    pub employee_id: String,
    pub completed_on: NaiveDate,
    pub period: String,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// One assignment joined with its training and employee
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AssignmentRow {
    pub training_id: String,
    pub training_name: String,
    pub frequency: TrainingFrequency,
    pub training_type: TrainingType,
    pub employee_id: String,
    pub employee_name: String,
    pub assigned_on: NaiveDate,
}

/// Where one employee stands on one training in the current period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingAssignmentStatus {
    pub training_id: String,
    pub training_name: String,
    #[serde(rename = "type")]
    pub training_type: TrainingType,
    pub frequency: TrainingFrequency,
    pub employee_id: String,
    pub employee_name: String,
    pub assigned_on: NaiveDate,
    pub period: String,
    pub due_date: NaiveDate,
    pub completed_on: Option<NaiveDate>,
    pub state: TrainingAssignmentState,
}
