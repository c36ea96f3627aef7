//! Gauge register and calibration history
//!
//! A gauge's calibration columns always describe its most recent
//! calibration. Recording an older calibration adds history only.

use chrono::NaiveDate;
use mfg_common::{Action, CompanyId, DocumentRef, Error, RequestContext, Result, Upsert, UserId, ValidationErrors};
use sqlx::SqlitePool;
use tracing::{error, info};

use super::issues::MODULE;
use crate::db::gauges::{self, CalibrationDates, CalibrationState};
use crate::models::Gauge;
use crate::validators::gauge::DEFAULT_CALIBRATION_INTERVAL;
use crate::validators::{CalibrationRecordForm, GaugeForm};

#[derive(Debug, Clone)]
pub struct GaugeCreate {
    pub created_by: UserId,
    pub form: GaugeForm,
}

#[derive(Debug, Clone)]
pub struct GaugeUpdate {
    pub id: String,
    pub updated_by: UserId,
    pub form: GaugeForm,
}

/// Due date of the next calibration after one on `calibrated`
pub fn next_calibration_date(calibrated: NaiveDate, interval_in_months: i64) -> NaiveDate {
    let months = u32::try_from(interval_in_months)
        .ok()
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_CALIBRATION_INTERVAL as u32);
    mfg_common::time::add_months(calibrated, months)
}

/// Whether a calibration on `calibrated` supersedes the stored one
pub fn supersedes(last_calibration_date: Option<NaiveDate>, calibrated: NaiveDate) -> bool {
    last_calibration_date.map_or(true, |last| calibrated >= last)
}

/// Calibration dates after an edit of a gauge last calibrated on `stored_last`
///
/// A submitted date earlier than the stored one, or none at all, keeps the
/// stored date. The next due date follows the kept date and the new interval.
pub fn calibration_dates_on_edit(
    stored_last: Option<NaiveDate>,
    submitted_last: Option<NaiveDate>,
    interval_in_months: i64,
) -> CalibrationDates {
    let last = match submitted_last {
        Some(submitted) if supersedes(stored_last, submitted) => Some(submitted),
        _ => stored_last,
    };
    CalibrationDates {
        last,
        next: last.map(|last| next_calibration_date(last, interval_in_months)),
    }
}

fn duplicate_gauge_id(e: Error, gauge_id: &str) -> Error {
    match e {
        Error::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            ValidationErrors::single("gaugeId", format!("Gauge ID {} is already in use", gauge_id)).into()
        }
        other => other,
    }
}

pub async fn upsert_gauge(
    pool: &SqlitePool,
    company_id: &CompanyId,
    request: Upsert<GaugeCreate, GaugeUpdate>,
) -> Result<DocumentRef> {
    match request {
        Upsert::Create(GaugeCreate { created_by, form }) => {
            let next = form
                .last_calibration_date
                .map(|last| next_calibration_date(last, form.calibration_interval_in_months));
            let id = gauges::insert_gauge(pool, company_id, &form, next, &created_by)
                .await
                .map_err(|e| duplicate_gauge_id(e, &form.gauge_id))?;
            info!("Created gauge {} ({}) in company {}", form.gauge_id, id, company_id);
            Ok(DocumentRef {
                id,
                readable_id: form.gauge_id,
            })
        }
        Upsert::Update(GaugeUpdate { id, updated_by, form }) => {
            let stored = get_gauge(pool, company_id, &id).await?;
            let dates = calibration_dates_on_edit(
                stored.last_calibration_date,
                form.last_calibration_date,
                form.calibration_interval_in_months,
            );
            let readable_id = form.gauge_id.clone();
            let updated = gauges::update_gauge(pool, company_id, &id, form, dates, &updated_by)
                .await
                .map_err(|e| duplicate_gauge_id(e, &readable_id))?;
            if updated == 0 {
                return Err(Error::not_found("gauge", &id));
            }
            Ok(DocumentRef { id, readable_id })
        }
    }
}

pub async fn get_gauge(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Gauge> {
    gauges::get_gauge(pool, company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("gauge", id))
}

/// Record a calibration and, when it is the latest, restamp the gauge
///
/// The gauge is updated first; if the record then fails to insert the
/// gauge's previous calibration columns are written back.
pub async fn record_gauge_calibration(
    pool: &SqlitePool,
    ctx: &RequestContext,
    form: CalibrationRecordForm,
) -> Result<String> {
    ctx.require(MODULE, Action::Create)?;
    let gauge = get_gauge(pool, &ctx.company_id, &form.gauge_id).await?;

    let previous = CalibrationState::from(&gauge);
    let restamp = supersedes(gauge.last_calibration_date, form.date_calibrated);
    if restamp {
        let state = CalibrationState {
            status: form.inspection_status.calibration_status(),
            last_calibration_date: Some(form.date_calibrated),
            next_calibration_date: Some(next_calibration_date(
                form.date_calibrated,
                gauge.calibration_interval_in_months,
            )),
        };
        gauges::set_calibration_state(pool, &ctx.company_id, &gauge.id, state, &ctx.user_id)
            .await
            .map_err(|e| Error::orchestration("update gauge calibration", e))?;
    }

    let id = match gauges::insert_calibration_record(pool, &ctx.company_id, &form, &ctx.user_id).await {
        Ok(id) => id,
        Err(e) => {
            if restamp {
                if let Err(restore) =
                    gauges::set_calibration_state(pool, &ctx.company_id, &gauge.id, previous, &ctx.user_id).await
                {
                    error!("Restoring calibration of gauge {} failed: {}", gauge.gauge_id, restore);
                }
            }
            return Err(Error::orchestration("insert calibration record", e));
        }
    };

    info!(
        "Recorded {} calibration of gauge {} on {}{}",
        form.inspection_status,
        gauge.gauge_id,
        form.date_calibrated,
        if restamp { "" } else { " (history only)" }
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_next_calibration_date() {
        assert_eq!(next_calibration_date(d(2026, 1, 31), 1), d(2026, 2, 28));
        assert_eq!(next_calibration_date(d(2026, 10, 19), 12), d(2027, 10, 19));
        assert_eq!(next_calibration_date(d(2026, 10, 19), 0), d(2027, 10, 19));
    }

    #[test]
    fn test_only_later_calibrations_supersede() {
        assert!(supersedes(None, d(2020, 1, 1)));
        assert!(supersedes(Some(d(2026, 10, 19)), d(2026, 10, 19)));
        assert!(!supersedes(Some(d(2026, 10, 19)), d(2026, 10, 18)));
    }

    #[test]
    fn test_edit_never_moves_calibration_back() {
        let stored = Some(d(2026, 4, 30));
        let kept = CalibrationDates {
            last: stored,
            next: Some(d(2026, 10, 30)),
        };
        assert_eq!(calibration_dates_on_edit(stored, None, 6), kept);
        assert_eq!(calibration_dates_on_edit(stored, Some(d(2025, 1, 1)), 6), kept);

        let later = calibration_dates_on_edit(stored, Some(d(2026, 5, 15)), 12);
        assert_eq!(later.last, Some(d(2026, 5, 15)));
        assert_eq!(later.next, Some(d(2027, 5, 15)));

        assert_eq!(calibration_dates_on_edit(stored, None, 12).next, Some(d(2027, 4, 30)));
        assert_eq!(
            calibration_dates_on_edit(None, None, 12),
            CalibrationDates { last: None, next: None }
        );
    }
}
