//! Non-conformance issue validators

use chrono::NaiveDate;
use mfg_common::{FormInput, FormReader, ValidationErrors};

use crate::models::IssuePriority;

pub(crate) const DUE_BEFORE_OPEN: &str = "Due date must be on or after open date";

#[derive(Debug, Clone, PartialEq)]
pub struct IssueForm {
    pub name: String,
    pub description: Option<String>,
    pub priority: IssuePriority,
    pub location_id: Option<String>,
    pub assignee: Option<String>,
    pub open_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    pub items: Vec<String>,
}

impl IssueForm {
    pub fn new(name: impl Into<String>, open_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            description: None,
            priority: IssuePriority::Medium,
            location_id: None,
            assignee: None,
            open_date,
            due_date: None,
            customer_id: None,
            supplier_id: None,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<IssuePriority>,
    pub location_id: Option<Option<String>>,
    pub assignee: Option<Option<String>>,
    pub open_date: Option<NaiveDate>,
    pub due_date: Option<Option<NaiveDate>>,
}

pub fn validate_issue(input: &FormInput) -> Result<IssueForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = IssueForm {
        name: reader.required_str("name"),
        description: reader.optional_str("description"),
        priority: reader.optional_enum("priority").unwrap_or(IssuePriority::Medium),
        location_id: reader.optional_str("locationId"),
        assignee: reader.optional_str("assignee"),
        open_date: reader.required_date("openDate"),
        due_date: reader.optional_date("dueDate"),
        customer_id: reader.optional_str("customerId"),
        supplier_id: reader.optional_str("supplierId"),
        items: reader.string_list("items"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(
        form.due_date.map_or(true, |due| due >= form.open_date),
        "dueDate",
        DUE_BEFORE_OPEN,
    );
    rules.finish()?;

    Ok(form)
}

/// Only the submitted keys are read; the date order is checked again against
/// stored values when the update is applied
pub fn validate_issue_patch(input: &FormInput) -> Result<IssuePatch, ValidationErrors> {
    let mut reader = FormReader::new(input);

    let name = reader.patch_str("name");
    reader.check(!matches!(name, Some(None)), "name", "Name is required");
    let open_date = reader.patch_date("openDate");
    reader.check(!matches!(open_date, Some(None)), "openDate", "Open date is required");

    let patch = IssuePatch {
        name: name.flatten(),
        description: reader.patch_str("description"),
        priority: reader.optional_enum("priority"),
        location_id: reader.patch_str("locationId"),
        assignee: reader.patch_str("assignee"),
        open_date: open_date.flatten(),
        due_date: reader.patch_date("dueDate"),
    };

    let mut rules = reader.into_rules()?;
    if let (Some(open), Some(Some(due))) = (patch.open_date, patch.due_date) {
        rules.check(due >= open, "dueDate", DUE_BEFORE_OPEN);
    }
    rules.finish()?;

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_due_date_before_open_date() {
        let input = FormInput::from_json(json!({
            "name": "Cracked housing",
            "openDate": "2026-10-19",
            "dueDate": "2026-10-01",
        }));
        let errors = validate_issue(&input).unwrap_err();
        assert_eq!(errors.paths(), vec!["dueDate"]);
        assert_eq!(errors.message_for("dueDate"), Some(DUE_BEFORE_OPEN));
    }

    #[test]
    fn test_required_fields_and_defaults() {
        let errors = validate_issue(&FormInput::from_json(json!({}))).unwrap_err();
        assert_eq!(errors.paths(), vec!["name", "openDate"]);
        assert_eq!(errors.message_for("openDate"), Some("Open date is required"));

        let form = validate_issue(&FormInput::from_json(json!({
            "name": "Burr on edge",
            "openDate": "2026-10-19",
            "items": ["i1", " ", "i2"],
        })))
        .unwrap();
        assert_eq!(form.priority, IssuePriority::Medium);
        assert_eq!(form.items, vec!["i1", "i2"]);
    }

    #[test]
    fn test_patch_reads_only_present_keys() {
        let patch = validate_issue_patch(&FormInput::from_json(json!({
            "assignee": "",
            "priority": "High",
        })))
        .unwrap();
        assert_eq!(patch.assignee, Some(None));
        assert_eq!(patch.priority, Some(IssuePriority::High));
        assert_eq!(patch.name, None);
        assert_eq!(patch.due_date, None);
    }
}
