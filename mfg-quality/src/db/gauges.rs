//! Gauge and calibration record queries

use chrono::NaiveDate;
use mfg_common::query::{ListParams, ListQuery, Page, PartialUpdate, SortOrder};
use mfg_common::{CompanyId, Result, UserId};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{Gauge, GaugeCalibrationRecord, GaugeCalibrationStatus};
use crate::validators::{CalibrationRecordForm, GaugeForm};

const GAUGE_SORT: &[&str] = &[
    "gauge_id",
    "description",
    "gauge_calibration_status",
    "next_calibration_date",
    "created_at",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeFilters {
    pub gauge_calibration_status: Option<GaugeCalibrationStatus>,
}

/// The calibration columns a calibration record may overwrite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    pub status: GaugeCalibrationStatus,
    pub last_calibration_date: Option<NaiveDate>,
    pub next_calibration_date: Option<NaiveDate>,
}

impl From<&Gauge> for CalibrationState {
    fn from(gauge: &Gauge) -> Self {
        Self {
            status: gauge.gauge_calibration_status,
            last_calibration_date: gauge.last_calibration_date,
            next_calibration_date: gauge.next_calibration_date,
        }
    }
}

/// Last and next calibration dates written by a gauge edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationDates {
    pub last: Option<NaiveDate>,
    pub next: Option<NaiveDate>,
}

pub async fn insert_gauge(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &GaugeForm,
    next_calibration_date: Option<NaiveDate>,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO gauge (
            id, company_id, gauge_id, description, serial_number, location_id,
            gauge_status, gauge_calibration_status, calibration_interval_in_months,
            last_calibration_date, next_calibration_date, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.gauge_id)
    .bind(&form.description)
    .bind(&form.serial_number)
    .bind(&form.location_id)
    .bind(form.gauge_status)
    .bind(GaugeCalibrationStatus::Pending)
    .bind(form.calibration_interval_in_months)
    .bind(form.last_calibration_date)
    .bind(next_calibration_date)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn update_gauge(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    form: GaugeForm,
    dates: CalibrationDates,
    actor: &UserId,
) -> Result<u64> {
    let mut update = PartialUpdate::new("gauge");
    update
        .set("gauge_id", Some(form.gauge_id))
        .set("description", Some(form.description))
        .set("serial_number", Some(form.serial_number))
        .set("location_id", Some(form.location_id))
        .set("gauge_status", Some(form.gauge_status))
        .set(
            "calibration_interval_in_months",
            Some(form.calibration_interval_in_months),
        )
        .set("last_calibration_date", Some(dates.last))
        .set("next_calibration_date", Some(dates.next));
    update.execute(pool, company_id, id, actor).await
}

pub async fn set_calibration_state(
    pool: &SqlitePool,
    company_id: &CompanyId,
    id: &str,
    state: CalibrationState,
    actor: &UserId,
) -> Result<u64> {
    let mut update = PartialUpdate::new("gauge");
    update
        .set("gauge_calibration_status", Some(state.status))
        .set("last_calibration_date", Some(state.last_calibration_date))
        .set("next_calibration_date", Some(state.next_calibration_date));
    update.execute(pool, company_id, id, actor).await
}

pub async fn get_gauge(pool: &SqlitePool, company_id: &CompanyId, id: &str) -> Result<Option<Gauge>> {
    let gauge = sqlx::query_as("SELECT * FROM gauge WHERE id = ? AND company_id = ?")
        .bind(id)
        .bind(company_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(gauge)
}

pub async fn list_gauges(
    pool: &SqlitePool,
    company_id: &CompanyId,
    params: &ListParams,
    filters: &GaugeFilters,
) -> Result<Page<Gauge>> {
    ListQuery::new("gauge", company_id)
        .search(&["gauge_id", "description"], params.search.as_deref())
        .eq(
            "gauge_calibration_status",
            filters.gauge_calibration_status.map(|s| s.to_string()),
        )
        .sort(GAUGE_SORT, "gauge_id", SortOrder::Asc)
        .fetch_page(pool, params)
        .await
}

pub async fn insert_calibration_record(
    pool: &SqlitePool,
    company_id: &CompanyId,
    form: &CalibrationRecordForm,
    actor: &UserId,
) -> Result<String> {
    let id = mfg_common::uuid_utils::generate();
    sqlx::query(
        r#"
        INSERT INTO gauge_calibration_record (
            id, company_id, gauge_id, date_calibrated, inspection_status,
            requires_action, requires_adjustment, requires_repair, notes,
            created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(company_id.as_str())
    .bind(&form.gauge_id)
    .bind(form.date_calibrated)
    .bind(form.inspection_status)
    .bind(form.requires_action)
    .bind(form.requires_adjustment)
    .bind(form.requires_repair)
    .bind(&form.notes)
    .bind(actor.as_str())
    .bind(mfg_common::time::now())
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn list_calibration_records(
    pool: &SqlitePool,
    company_id: &CompanyId,
    gauge_id: Option<&str>,
    params: &ListParams,
) -> Result<Page<GaugeCalibrationRecord>> {
    ListQuery::new("gauge_calibration_record", company_id)
        .columns(
            "id, gauge_id, date_calibrated, inspection_status, requires_action, \
             requires_adjustment, requires_repair, notes, created_by, created_at",
        )
        .search(&["notes"], params.search.as_deref())
        .eq("gauge_id", gauge_id)
        .sort(&["date_calibrated", "created_at"], "date_calibrated", SortOrder::Desc)
        .fetch_page(pool, params)
        .await
}
