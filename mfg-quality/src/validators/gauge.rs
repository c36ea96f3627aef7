//! Gauge and calibration record validators

use chrono::NaiveDate;
use mfg_common::{FormInput, FormReader, ValidationErrors};

use crate::models::{GaugeStatus, InspectionStatus};

pub const DEFAULT_CALIBRATION_INTERVAL: i64 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeForm {
    /// Readable gauge number, unique per company
    pub gauge_id: String,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub location_id: Option<String>,
    pub gauge_status: GaugeStatus,
    pub calibration_interval_in_months: i64,
    pub last_calibration_date: Option<NaiveDate>,
}

impl GaugeForm {
    pub fn new(gauge_id: impl Into<String>) -> Self {
        Self {
            gauge_id: gauge_id.into(),
            description: None,
            serial_number: None,
            location_id: None,
            gauge_status: GaugeStatus::Active,
            calibration_interval_in_months: DEFAULT_CALIBRATION_INTERVAL,
            last_calibration_date: None,
        }
    }
}

pub fn validate_gauge(input: &FormInput) -> Result<GaugeForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = GaugeForm {
        gauge_id: reader.required_str("gaugeId"),
        description: reader.optional_str("description"),
        serial_number: reader.optional_str("serialNumber"),
        location_id: reader.optional_str("locationId"),
        gauge_status: reader.optional_enum("gaugeStatus").unwrap_or(GaugeStatus::Active),
        calibration_interval_in_months: reader
            .optional_i64("calibrationIntervalInMonths")
            .unwrap_or(DEFAULT_CALIBRATION_INTERVAL),
        last_calibration_date: reader.optional_date("lastCalibrationDate"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(
        form.calibration_interval_in_months >= 1,
        "calibrationIntervalInMonths",
        "Calibration interval must be at least 1 month",
    );
    rules.finish()?;

    Ok(form)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRecordForm {
    /// Row id of the gauge
    pub gauge_id: String,
    pub date_calibrated: NaiveDate,
    pub inspection_status: InspectionStatus,
    pub requires_action: bool,
    pub requires_adjustment: bool,
    pub requires_repair: bool,
    pub notes: Option<String>,
}

impl CalibrationRecordForm {
    pub fn new(gauge_id: impl Into<String>, date_calibrated: NaiveDate, inspection_status: InspectionStatus) -> Self {
        Self {
            gauge_id: gauge_id.into(),
            date_calibrated,
            inspection_status,
            requires_action: false,
            requires_adjustment: false,
            requires_repair: false,
            notes: None,
        }
    }
}

pub fn validate_calibration_record(input: &FormInput) -> Result<CalibrationRecordForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = CalibrationRecordForm {
        gauge_id: reader.required_str("gaugeId"),
        date_calibrated: reader.required_date("dateCalibrated"),
        inspection_status: reader.required_enum("inspectionStatus"),
        requires_action: reader.bool_flag("requiresAction"),
        requires_adjustment: reader.bool_flag("requiresAdjustment"),
        requires_repair: reader.bool_flag("requiresRepair"),
        notes: reader.optional_str("notes"),
    };
    reader.into_rules()?.finish()?;

    Ok(form)
}
