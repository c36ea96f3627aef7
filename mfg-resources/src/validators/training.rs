//! Training, assignment and completion validators

use chrono::NaiveDate;
use mfg_common::{FormInput, FormReader, ValidationErrors};

use crate::models::{TrainingFrequency, TrainingStatus, TrainingType};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingForm {
    pub name: String,
    pub description: Option<String>,
    pub frequency: TrainingFrequency,
    pub training_type: TrainingType,
    pub status: TrainingStatus,
}

impl TrainingForm {
    pub fn new(name: impl Into<String>, frequency: TrainingFrequency) -> Self {
        Self {
            name: name.into(),
            description: None,
            frequency,
            training_type: TrainingType::Mandatory,
            status: TrainingStatus::Active,
        }
    }
}

pub fn validate_training(input: &FormInput) -> Result<TrainingForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = TrainingForm {
        name: reader.required_str("name"),
        description: reader.optional_str("description"),
        frequency: reader.optional_enum("frequency").unwrap_or(TrainingFrequency::Once),
        training_type: reader.optional_enum("type").unwrap_or(TrainingType::Mandatory),
        status: reader.optional_enum("status").unwrap_or(TrainingStatus::Draft),
    };
    reader.into_rules()?.finish()?;
    Ok(form)
}

/// Employees to assign; at least one
pub fn validate_training_assignment(input: &FormInput) -> Result<Vec<String>, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let employee_ids = reader.string_list("employeeIds");
    let mut rules = reader.into_rules()?;
    rules.check(
        !employee_ids.is_empty(),
        "employeeIds",
        "At least one employee is required",
    );
    rules.finish()?;
    Ok(employee_ids)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCompletionForm {
    pub employee_id: String,
    pub completed_on: NaiveDate,
    pub notes: Option<String>,
}

pub fn validate_training_completion(input: &FormInput) -> Result<TrainingCompletionForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = TrainingCompletionForm {
        employee_id: reader.required_str("employeeId"),
        completed_on: reader.required_date("completedOn"),
        notes: reader.optional_str("notes"),
    };
    reader.into_rules()?.finish()?;
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_training_enums() {
        let errors = validate_training(&FormInput::from_json(json!({
            "name": "Forklift safety",
            "frequency": "Monthly",
        })))
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["frequency"]);

        let form = validate_training(&FormInput::from_json(json!({
            "name": "Forklift safety",
            "frequency": "Annual",
            "type": "Optional",
        })))
        .unwrap();
        assert_eq!(form.training_type, TrainingType::Optional);
        assert_eq!(form.status, TrainingStatus::Draft);
    }

    #[test]
    fn test_assignment_needs_employees() {
        let errors = validate_training_assignment(&FormInput::from_json(json!({ "employeeIds": [" "] }))).unwrap_err();
        assert_eq!(errors.paths(), vec!["employeeIds"]);
    }
}
