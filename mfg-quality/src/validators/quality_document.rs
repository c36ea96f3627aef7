//! Quality document and inspection step validators

use mfg_common::{FormInput, FormReader, ValidationErrors};

use crate::models::{QualityDocumentStatus, QualityDocumentStepType};

#[derive(Debug, Clone, PartialEq)]
pub struct QualityDocumentForm {
    pub name: String,
    pub version: i64,
    pub status: QualityDocumentStatus,
    pub content: Option<String>,
    pub assignee: Option<String>,
}

pub fn validate_quality_document(input: &FormInput) -> Result<QualityDocumentForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = QualityDocumentForm {
        name: reader.required_str("name"),
        version: reader.optional_i64("version").unwrap_or(0),
        status: reader
            .optional_enum("status")
            .unwrap_or(QualityDocumentStatus::Draft),
        content: reader.optional_str("content"),
        assignee: reader.optional_str("assignee"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(form.version >= 0, "version", "Version must be at least 0");
    rules.finish()?;

    Ok(form)
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityDocumentStepForm {
    pub quality_document_id: String,
    pub name: String,
    pub description: Option<String>,
    pub step_type: QualityDocumentStepType,
    pub sort_order: i64,
    pub unit_of_measure_code: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub list_values: Vec<String>,
}

impl QualityDocumentStepForm {
    pub fn new(
        quality_document_id: impl Into<String>,
        name: impl Into<String>,
        step_type: QualityDocumentStepType,
    ) -> Self {
        Self {
            quality_document_id: quality_document_id.into(),
            name: name.into(),
            description: None,
            step_type,
            sort_order: 0,
            unit_of_measure_code: None,
            min_value: None,
            max_value: None,
            list_values: Vec::new(),
        }
    }
}

pub fn validate_quality_document_step(input: &FormInput) -> Result<QualityDocumentStepForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = QualityDocumentStepForm {
        quality_document_id: reader.required_str("qualityDocumentId"),
        name: reader.required_str("name"),
        description: reader.optional_str("description"),
        step_type: reader.required_enum("type"),
        sort_order: reader.optional_i64("sortOrder").unwrap_or(0),
        unit_of_measure_code: reader.optional_str("unitOfMeasureCode"),
        min_value: reader.optional_f64("minValue"),
        max_value: reader.optional_f64("maxValue"),
        list_values: reader.string_list("listValues"),
    };

    let mut rules = reader.into_rules()?;
    rules
        .check(
            form.step_type != QualityDocumentStepType::List || !form.list_values.is_empty(),
            "listValues",
            "List options are required",
        )
        .check(
            form.step_type != QualityDocumentStepType::Measurement
                || form.unit_of_measure_code.is_some(),
            "unitOfMeasureCode",
            "Unit of measure is required",
        );
    if let (Some(min), Some(max)) = (form.min_value, form.max_value) {
        rules.check(
            max >= min,
            "maxValue",
            "Maximum value must be greater than or equal to minimum value",
        );
    }
    rules.finish()?;

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(extra: serde_json::Value) -> FormInput {
        let mut base = json!({ "qualityDocumentId": "qd1", "name": "Bore diameter" });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        FormInput::from_json(base)
    }

    #[test]
    fn test_list_step_needs_a_non_blank_value() {
        let errors = validate_quality_document_step(&step(json!({
            "type": "List",
            "listValues": ["", "  "],
        })))
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["listValues"]);

        let form = validate_quality_document_step(&step(json!({
            "type": "List",
            "listValues": ["OK", "Scrap"],
        })))
        .unwrap();
        assert_eq!(form.list_values, vec!["OK", "Scrap"]);
    }

    #[test]
    fn test_measurement_needs_unit_and_ordered_bounds() {
        let errors = validate_quality_document_step(&step(json!({
            "type": "Measurement",
            "minValue": 10,
            "maxValue": 9.5,
        })))
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["unitOfMeasureCode", "maxValue"]);

        let form = validate_quality_document_step(&step(json!({
            "type": "Measurement",
            "unitOfMeasureCode": "mm",
            "minValue": 10,
            "maxValue": 10,
        })))
        .unwrap();
        assert_eq!(form.step_type, QualityDocumentStepType::Measurement);
    }

    #[test]
    fn test_document_version_not_negative() {
        let errors = validate_quality_document(&FormInput::from_json(json!({
            "name": "Incoming inspection",
            "version": -1,
        })))
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["version"]);
    }
}
