//! Maintenance dispatch orchestration and status rules
//!
//! Status changes stamp the actual start and end times. Completed and
//! cancelled dispatches are closed; reopening one needs `resources_delete`.

use chrono::{DateTime, NaiveDate, Utc};
use mfg_common::db::{next_sequence, SequenceKind};
use mfg_common::query::PartialUpdate;
use mfg_common::{Action, CompanyId, DocumentRef, Error, RequestContext, Result, UserId, ValidationErrors};
use sqlx::SqlitePool;
use tracing::info;

use super::MODULE;
use crate::db::{maintenance_dispatches, work_centers};
use crate::models::{MaintenanceDispatch, MaintenanceDispatchStatus};
use crate::validators::maintenance_dispatch::{planned_in_order, END_BEFORE_START};
use crate::validators::{MaintenanceDispatchForm, MaintenanceDispatchPatch};

/// Starting status: `Assigned` once someone owns the work
pub fn initial_status(assignee: Option<&str>) -> MaintenanceDispatchStatus {
    match assignee {
        Some(_) => MaintenanceDispatchStatus::Assigned,
        None => MaintenanceDispatchStatus::Open,
    }
}

/// Column changes implied by moving a dispatch to a new status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusStamps {
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub clear_assignee: bool,
}

pub fn status_stamps(
    current: &MaintenanceDispatch,
    next: MaintenanceDispatchStatus,
    now: DateTime<Utc>,
) -> StatusStamps {
    let start_if_unset = match current.actual_start_time {
        Some(_) => None,
        None => Some(now),
    };
    match next {
        MaintenanceDispatchStatus::InProgress => StatusStamps {
            actual_start_time: start_if_unset,
            ..Default::default()
        },
        MaintenanceDispatchStatus::Completed => StatusStamps {
            actual_start_time: start_if_unset,
            actual_end_time: Some(now),
            clear_assignee: false,
        },
        MaintenanceDispatchStatus::Cancelled => StatusStamps {
            clear_assignee: true,
            ..Default::default()
        },
        MaintenanceDispatchStatus::Open | MaintenanceDispatchStatus::Assigned => StatusStamps::default(),
    }
}

pub async fn create_maintenance_dispatch(
    pool: &SqlitePool,
    company_id: &CompanyId,
    created_by: &UserId,
    form: MaintenanceDispatchForm,
) -> Result<DocumentRef> {
    let work_center = work_centers::get_work_center(pool, company_id, &form.work_center_id)
        .await?
        .ok_or_else(|| Error::not_found("work center", &form.work_center_id))?;
    if !work_center.active {
        return Err(ValidationErrors::single("workCenterId", "Work center is inactive").into());
    }

    let readable_id = next_sequence(pool, company_id, SequenceKind::MaintenanceDispatch)
        .await
        .map_err(|e| Error::orchestration("allocate maintenance dispatch id", e))?;

    let status = initial_status(form.assignee.as_deref());
    let id = maintenance_dispatches::insert_dispatch(pool, company_id, &readable_id, status, &form, created_by)
        .await
        .map_err(|e| Error::orchestration("insert maintenance dispatch", e))?;

    info!(
        "Created maintenance dispatch {} ({}) for {} as {}",
        readable_id, id, work_center.name, status
    );
    Ok(DocumentRef { id, readable_id })
}

pub async fn get_maintenance_dispatch(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
) -> Result<MaintenanceDispatch> {
    maintenance_dispatches::get_dispatch(pool, company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("maintenance dispatch", id))
}

/// Apply the submitted fields; the planned window is checked against stored values
pub async fn update_maintenance_dispatch(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    patch: MaintenanceDispatchPatch,
    updated_by: &UserId,
) -> Result<DocumentRef> {
    let current = get_maintenance_dispatch(pool, company_id, id).await?;

    let start: Option<NaiveDate> = patch.planned_start_time.unwrap_or(current.planned_start_time);
    let end: Option<NaiveDate> = patch.planned_end_time.unwrap_or(current.planned_end_time);
    if !planned_in_order(start, end) {
        return Err(ValidationErrors::single("plannedEndTime", END_BEFORE_START).into());
    }

    if let Some(work_center_id) = patch.work_center_id.as_deref() {
        work_centers::get_work_center(pool, company_id, work_center_id)
            .await?
            .ok_or_else(|| Error::not_found("work center", work_center_id))?;
    }

    let mut update = PartialUpdate::new("maintenance_dispatch");
    update
        .set("work_center_id", patch.work_center_id)
        .set("priority", patch.priority)
        .set("source", patch.source)
        .set("description", patch.description)
        .set("assignee", patch.assignee)
        .set("planned_start_time", patch.planned_start_time)
        .set("planned_end_time", patch.planned_end_time);
    if update.execute(pool, company_id, id, updated_by).await? == 0 {
        return Err(Error::not_found("maintenance dispatch", id));
    }

    Ok(DocumentRef {
        id: id.to_string(),
        readable_id: current.maintenance_dispatch_id,
    })
}

pub async fn update_maintenance_dispatch_status(
    pool: &SqlitePool,
    ctx: &RequestContext,
    id: &str,
    status: MaintenanceDispatchStatus,
) -> Result<MaintenanceDispatch> {
    ctx.require(MODULE, Action::Update)?;
    let current = get_maintenance_dispatch(pool, &ctx.company_id, id).await?;

    if current.status.is_terminal() && !status.is_terminal() {
        ctx.require(MODULE, Action::Delete)?;
    }

    let stamps = status_stamps(&current, status, mfg_common::time::now());
    let mut update = PartialUpdate::new("maintenance_dispatch");
    update
        .set("status", Some(status))
        .set("actual_start_time", stamps.actual_start_time)
        .set("actual_end_time", stamps.actual_end_time);
    if stamps.clear_assignee {
        update.set("assignee", Some(None::<String>));
    }
    update.execute(pool, &ctx.company_id, id, &ctx.user_id).await?;

    info!(
        "Maintenance dispatch {} status {} -> {}",
        current.maintenance_dispatch_id, current.status, status
    );
    get_maintenance_dispatch(pool, &ctx.company_id, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenancePriority, MaintenanceSource};

    fn dispatch(actual_start_time: Option<DateTime<Utc>>) -> MaintenanceDispatch {
        MaintenanceDispatch {
            id: "d1".to_string(),
            company_id: "acme".to_string(),
            maintenance_dispatch_id: "MAINT-00001".to_string(),
            work_center_id: "wc1".to_string(),
            status: MaintenanceDispatchStatus::Assigned,
            priority: MaintenancePriority::Medium,
            source: MaintenanceSource::Reactive,
            description: None,
            assignee: Some("u2".to_string()),
            planned_start_time: None,
            planned_end_time: None,
            actual_start_time,
            actual_end_time: None,
            created_by: "u1".to_string(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(initial_status(None), MaintenanceDispatchStatus::Open);
        assert_eq!(initial_status(Some("u2")), MaintenanceDispatchStatus::Assigned);
    }

    #[test]
    fn test_start_stamped_once() {
        let now = Utc::now();
        let stamps = status_stamps(&dispatch(None), MaintenanceDispatchStatus::InProgress, now);
        assert_eq!(stamps.actual_start_time, Some(now));

        let started = now - chrono::Duration::hours(2);
        let stamps = status_stamps(&dispatch(Some(started)), MaintenanceDispatchStatus::InProgress, now);
        assert_eq!(stamps, StatusStamps::default());
    }

    #[test]
    fn test_completion_stamps_end_and_missing_start() {
        let now = Utc::now();
        let stamps = status_stamps(&dispatch(None), MaintenanceDispatchStatus::Completed, now);
        assert_eq!(stamps.actual_start_time, Some(now));
        assert_eq!(stamps.actual_end_time, Some(now));
        assert!(!stamps.clear_assignee);
    }

    #[test]
    fn test_cancel_releases_assignee() {
        let stamps = status_stamps(&dispatch(None), MaintenanceDispatchStatus::Cancelled, Utc::now());
        assert!(stamps.clear_assignee);
        assert_eq!(stamps.actual_end_time, None);
    }
}
