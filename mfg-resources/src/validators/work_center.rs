//! Work center validator

use mfg_common::{FormInput, FormReader, ValidationErrors};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkCenterForm {
    pub name: String,
    pub description: Option<String>,
    pub location_id: String,
    /// Hourly rates in the company's base currency
    pub labor_rate: f64,
    pub machine_rate: f64,
    pub overhead_rate: f64,
}

impl WorkCenterForm {
    pub fn new(name: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            location_id: location_id.into(),
            labor_rate: 0.0,
            machine_rate: 0.0,
            overhead_rate: 0.0,
        }
    }
}

pub fn validate_work_center(input: &FormInput) -> Result<WorkCenterForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = WorkCenterForm {
        name: reader.required_str("name"),
        description: reader.optional_str("description"),
        location_id: reader.required_str("locationId"),
        labor_rate: reader.optional_f64("laborRate").unwrap_or(0.0),
        machine_rate: reader.optional_f64("machineRate").unwrap_or(0.0),
        overhead_rate: reader.optional_f64("overheadRate").unwrap_or(0.0),
    };

    let mut rules = reader.into_rules()?;
    rules
        .check(form.labor_rate >= 0.0, "laborRate", "Labor rate cannot be negative")
        .check(form.machine_rate >= 0.0, "machineRate", "Machine rate cannot be negative")
        .check(form.overhead_rate >= 0.0, "overheadRate", "Overhead rate cannot be negative");
    rules.finish()?;

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rates_non_negative() {
        let errors = validate_work_center(&FormInput::from_json(json!({
            "name": "Lathe 1",
            "locationId": "l1",
            "laborRate": "-1",
            "overheadRate": -0.5,
        })))
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["laborRate", "overheadRate"]);
    }

    #[test]
    fn test_location_required() {
        let errors = validate_work_center(&FormInput::from_json(json!({ "name": "Lathe 1" }))).unwrap_err();
        assert_eq!(errors.message_for("locationId"), Some("Location ID is required"));
    }
}
