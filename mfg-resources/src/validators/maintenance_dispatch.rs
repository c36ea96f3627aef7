//! Maintenance dispatch validators

use chrono::NaiveDate;
use mfg_common::{FormInput, FormReader, ValidationErrors};

use crate::models::{MaintenancePriority, MaintenanceSource};

pub(crate) const END_BEFORE_START: &str = "Planned end must be on or after planned start";

#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceDispatchForm {
    pub work_center_id: String,
    pub priority: MaintenancePriority,
    pub source: MaintenanceSource,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub planned_start_time: Option<NaiveDate>,
    pub planned_end_time: Option<NaiveDate>,
}

impl MaintenanceDispatchForm {
    pub fn for_work_center(work_center_id: impl Into<String>) -> Self {
        Self {
            work_center_id: work_center_id.into(),
            priority: MaintenancePriority::Medium,
            source: MaintenanceSource::Reactive,
            description: None,
            assignee: None,
            planned_start_time: None,
            planned_end_time: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceDispatchPatch {
    pub work_center_id: Option<String>,
    pub priority: Option<MaintenancePriority>,
    pub source: Option<MaintenanceSource>,
    pub description: Option<Option<String>>,
    pub assignee: Option<Option<String>>,
    pub planned_start_time: Option<Option<NaiveDate>>,
    pub planned_end_time: Option<Option<NaiveDate>>,
}

pub(crate) fn planned_in_order(start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => end >= start,
        _ => true,
    }
}

pub fn validate_maintenance_dispatch(input: &FormInput) -> Result<MaintenanceDispatchForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = MaintenanceDispatchForm {
        work_center_id: reader.required_str("workCenterId"),
        priority: reader
            .optional_enum("priority")
            .unwrap_or(MaintenancePriority::Medium),
        source: reader.optional_enum("source").unwrap_or(MaintenanceSource::Reactive),
        description: reader.optional_str("description"),
        assignee: reader.optional_str("assignee"),
        planned_start_time: reader.optional_date("plannedStartTime"),
        planned_end_time: reader.optional_date("plannedEndTime"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(
        planned_in_order(form.planned_start_time, form.planned_end_time),
        "plannedEndTime",
        END_BEFORE_START,
    );
    rules.finish()?;

    Ok(form)
}

/// Only submitted keys are read; the planned window is checked again
/// against stored values when the update is applied
pub fn validate_maintenance_dispatch_patch(
    input: &FormInput,
) -> Result<MaintenanceDispatchPatch, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let work_center_id = reader.patch_str("workCenterId");
    reader.check(
        !matches!(work_center_id, Some(None)),
        "workCenterId",
        "Work center ID is required",
    );

    let patch = MaintenanceDispatchPatch {
        work_center_id: work_center_id.flatten(),
        priority: reader.optional_enum("priority"),
        source: reader.optional_enum("source"),
        description: reader.patch_str("description"),
        assignee: reader.patch_str("assignee"),
        planned_start_time: reader.patch_date("plannedStartTime"),
        planned_end_time: reader.patch_date("plannedEndTime"),
    };

    let mut rules = reader.into_rules()?;
    if let (Some(start), Some(end)) = (patch.planned_start_time, patch.planned_end_time) {
        rules.check(planned_in_order(start, end), "plannedEndTime", END_BEFORE_START);
    }
    rules.finish()?;

    Ok(patch)
}
