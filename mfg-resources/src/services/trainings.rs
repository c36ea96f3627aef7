//! Training upserts, assignments, completions and the per-employee status aggregate
//!
//! A training repeats by frequency. Each repetition is a period with a label
//! (`Once`, `2026`, `2026-Q4`); a completion counts toward the period it falls
//! in. An assignment is due 30 days after the later of the period start and
//! the assignment date.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use mfg_common::time::{quarter_of, quarter_start};
use mfg_common::{Action, CompanyId, Error, RequestContext, Result, Upsert, UserId};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::MODULE;
use crate::db::{locations, trainings};
use crate::models::{
    AssignmentRow, Training, TrainingAssignmentState, TrainingAssignmentStatus, TrainingCompletion,
    TrainingFrequency,
};
use crate::validators::{TrainingCompletionForm, TrainingForm};

/// Days after the period opens (or the assignment, if later) before it is overdue
pub const DUE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct TrainingCreate {
    pub created_by: UserId,
    pub form: TrainingForm,
}

#[derive(Debug, Clone)]
pub struct TrainingUpdate {
    pub id: String,
    pub updated_by: UserId,
    pub form: TrainingForm,
}

/// The repetition of a training that a date falls in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPeriod {
    pub label: String,
    /// None for one-off trainings, which never roll over
    pub start: Option<NaiveDate>,
}

pub fn training_period(frequency: TrainingFrequency, date: NaiveDate) -> TrainingPeriod {
    match frequency {
        TrainingFrequency::Once => TrainingPeriod {
            label: "Once".to_string(),
            start: None,
        },
        TrainingFrequency::Annual => TrainingPeriod {
            label: date.year().to_string(),
            start: NaiveDate::from_ymd_opt(date.year(), 1, 1),
        },
        TrainingFrequency::Quarterly => TrainingPeriod {
            label: format!("{}-Q{}", date.year(), quarter_of(date)),
            start: Some(quarter_start(date)),
        },
    }
}

pub fn due_date(period: &TrainingPeriod, assigned_on: NaiveDate) -> NaiveDate {
    let opened = match period.start {
        Some(start) if start > assigned_on => start,
        _ => assigned_on,
    };
    opened + Duration::days(DUE_AFTER_DAYS)
}

pub async fn upsert_training(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: Upsert<TrainingCreate, TrainingUpdate>,
) -> Result<String> {
    match request {
        Upsert::Create(TrainingCreate { created_by, form }) => {
            let id = trainings::insert_training(pool, company_id, &form, &created_by).await?;
            info!("Created training {} ({}, {})", form.name, form.frequency, form.status);
            Ok(id)
        }
        Upsert::Update(TrainingUpdate { id, updated_by, form }) => {
            let affected = trainings::update_training(pool, company_id, &id, form, &updated_by).await?;
            if affected == 0 {
                return Err(Error::not_found("training", &id));
            }
            Ok(id)
        }
    }
}

pub async fn get_training(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Training> {
    trainings::get_training(pool, company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("training", id))
}

/// Assign employees to a training, returning how many were newly assigned
///
/// Existing assignments keep their original date. Every employee is checked
/// before any assignment is written.
pub async fn assign_training(
    pool: &SqlitePool,
    ctx: &RequestContext,
    training_id: &str,
    employee_ids: &[String],
) -> Result<usize> {
    ctx.require(MODULE, Action::Create)?;
    let training = get_training(pool, &ctx.company_id, training_id).await?;

    for employee_id in employee_ids {
        locations::get_employee(pool, &ctx.company_id, employee_id)
            .await?
            .ok_or_else(|| Error::not_found("employee", employee_id))?;
    }

    let assigned_on = ctx.today();
    let mut added = 0;
    for employee_id in employee_ids {
        let inserted = trainings::insert_assignment(
            pool,
            &ctx.company_id,
            training_id,
            employee_id,
            assigned_on,
            &ctx.user_id,
        )
        .await
        .map_err(|e| Error::orchestration("insert training assignment", e))?;
        if inserted {
            added += 1;
        } else {
            debug!("Employee {} already assigned to {}", employee_id, training.name);
        }
    }

    info!(
        "Assigned training {} to {} of {} employees",
        training.name,
        added,
        employee_ids.len()
    );
    Ok(added)
}

/// Record a completion against the period its date falls in
pub async fn record_training_completion(
    pool: &SqlitePool,
    ctx: &RequestContext,
    training_id: &str,
    form: TrainingCompletionForm,
) -> Result<TrainingCompletion> {
    ctx.require(MODULE, Action::Create)?;
    let training = get_training(pool, &ctx.company_id, training_id).await?;
    locations::get_employee(pool, &ctx.company_id, &form.employee_id)
        .await?
        .ok_or_else(|| Error::not_found("employee", &form.employee_id))?;

    let period = training_period(training.frequency, form.completed_on);
    let id = trainings::insert_completion(
        pool,
        &ctx.company_id,
        training_id,
        &period.label,
        &form,
        &ctx.user_id,
    )
    .await
    .map_err(|e| Error::orchestration("insert training completion", e))?;

    info!(
        "Employee {} completed {} for period {}",
        form.employee_id, training.name, period.label
    );
    Ok(TrainingCompletion {
        id,
        training_id: training_id.to_string(),
        employee_id: form.employee_id,
        completed_on: form.completed_on,
        period: period.label,
        notes: form.notes,
        created_by: ctx.user_id.as_str().to_string(),
        created_at: mfg_common::time::now(),
    })
}

/// Current-period standing of every active assignment, optionally for one training
pub async fn training_assignment_status(
    pool: &SqlitePool,
    ctx: &RequestContext,
    training_id: Option<&str>,
) -> Result<Vec<TrainingAssignmentStatus>> {
    ctx.require(MODULE, Action::View)?;
    let (assignments, completions) = tokio::try_join!(
        trainings::list_active_assignments(pool, &ctx.company_id, training_id),
        trainings::list_completions(pool, &ctx.company_id, training_id),
    )?;
    Ok(summarize_assignments(assignments, &completions, ctx.today()))
}

/// Pair each assignment with its latest completion in the current period
pub fn summarize_assignments(
    assignments: Vec<AssignmentRow>,
    completions: &[TrainingCompletion],
    today: NaiveDate,
) -> Vec<TrainingAssignmentStatus> {
    let mut latest: HashMap<(&str, &str, &str), NaiveDate> = HashMap::new();
    for completion in completions {
        let key = (
            completion.training_id.as_str(),
            completion.employee_id.as_str(),
            completion.period.as_str(),
        );
        latest
            .entry(key)
            .and_modify(|on| *on = (*on).max(completion.completed_on))
            .or_insert(completion.completed_on);
    }

    assignments
        .into_iter()
        .map(|row| {
            let period = training_period(row.frequency, today);
            let due = due_date(&period, row.assigned_on);
            let completed_on = latest
                .get(&(row.training_id.as_str(), row.employee_id.as_str(), period.label.as_str()))
                .copied();
            let state = match completed_on {
                Some(_) => TrainingAssignmentState::Completed,
                None if today > due => TrainingAssignmentState::Overdue,
                None => TrainingAssignmentState::Pending,
            };
            TrainingAssignmentStatus {
                training_id: row.training_id,
                training_name: row.training_name,
                training_type: row.training_type,
                frequency: row.frequency,
                employee_id: row.employee_id,
                employee_name: row.employee_name,
                assigned_on: row.assigned_on,
                period: period.label,
                due_date: due,
                completed_on,
                state,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainingType;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn assignment(frequency: TrainingFrequency, assigned_on: NaiveDate) -> AssignmentRow {
        AssignmentRow {
            training_id: "t1".to_string(),
            training_name: "Lockout/tagout".to_string(),
            frequency,
            training_type: TrainingType::Mandatory,
            employee_id: "e1".to_string(),
            employee_name: "Ada Lovelace".to_string(),
            assigned_on,
        }
    }

    fn completion(on: NaiveDate, period: &str) -> TrainingCompletion {
        TrainingCompletion {
            id: format!("c-{}", on),
            training_id: "t1".to_string(),
            employee_id: "e1".to_string(),
            completed_on: on,
            period: period.to_string(),
            notes: None,
            created_by: "u1".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_period_labels() {
        let date = d(2026, 10, 19);
        assert_eq!(training_period(TrainingFrequency::Once, date).label, "Once");
        assert_eq!(
            training_period(TrainingFrequency::Annual, date),
            TrainingPeriod {
                label: "2026".to_string(),
                start: Some(d(2026, 1, 1)),
            }
        );
        assert_eq!(
            training_period(TrainingFrequency::Quarterly, date),
            TrainingPeriod {
                label: "2026-Q4".to_string(),
                start: Some(d(2026, 10, 1)),
            }
        );
    }

    #[test]
    fn test_due_date_uses_later_of_start_and_assignment() {
        let quarter = training_period(TrainingFrequency::Quarterly, d(2026, 10, 19));
        assert_eq!(due_date(&quarter, d(2026, 3, 2)), d(2026, 10, 31));
        assert_eq!(due_date(&quarter, d(2026, 10, 15)), d(2026, 11, 14));

        let once = training_period(TrainingFrequency::Once, d(2026, 10, 19));
        assert_eq!(due_date(&once, d(2026, 9, 1)), d(2026, 10, 1));
    }

    #[test]
    fn test_pending_until_due_then_overdue() {
        let rows = || vec![assignment(TrainingFrequency::Annual, d(2026, 10, 1))];
        let pending = summarize_assignments(rows(), &[], d(2026, 10, 31));
        assert_eq!(pending[0].state, TrainingAssignmentState::Pending);
        assert_eq!(pending[0].due_date, d(2026, 10, 31));

        let overdue = summarize_assignments(rows(), &[], d(2026, 11, 1));
        assert_eq!(overdue[0].state, TrainingAssignmentState::Overdue);
    }

    #[test]
    fn test_only_current_period_completions_count() {
        let rows = || vec![assignment(TrainingFrequency::Quarterly, d(2026, 1, 5))];
        let last_quarter = [completion(d(2026, 9, 10), "2026-Q3")];
        let status = summarize_assignments(rows(), &last_quarter, d(2026, 10, 19));
        assert_eq!(status[0].period, "2026-Q4");
        assert_eq!(status[0].state, TrainingAssignmentState::Pending);
        assert_eq!(status[0].completed_on, None);

        let this_quarter = [
            completion(d(2026, 10, 2), "2026-Q4"),
            completion(d(2026, 10, 12), "2026-Q4"),
        ];
        let status = summarize_assignments(rows(), &this_quarter, d(2026, 12, 20));
        assert_eq!(status[0].state, TrainingAssignmentState::Completed);
        assert_eq!(status[0].completed_on, Some(d(2026, 10, 12)));
    }

    #[test]
    fn test_one_off_completion_never_expires() {
        let rows = vec![assignment(TrainingFrequency::Once, d(2024, 2, 1))];
        let done = [completion(d(2024, 2, 20), "Once")];
        let status = summarize_assignments(rows, &done, d(2026, 10, 19));
        assert_eq!(status[0].state, TrainingAssignmentState::Completed);
    }
}
