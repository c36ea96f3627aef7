//! Form validation with field-path attributed failures
//!
//! A raw form arrives as a string-keyed JSON object. [`FormReader`] pulls typed
//! values out of it, recording every violation against the field path instead
//! of stopping at the first one. Cross-field rules run through [`Rules`] only
//! once every per-field check has passed, so a rule never reasons about a
//! value that failed to parse.
//!
//! Required accessors return a placeholder (empty string, first enum variant,
//! zero, 1970-01-01) when the field is missing. The placeholder can never
//! escape: [`FormReader::into_rules`] fails whenever a required field was
//! missing.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::catalog::CatalogEnum;

/// One violated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Every violation found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single violation
    pub fn single(path: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(path, message);
        errors
    }

    pub fn push(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Paths of all violations, in the order found
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }

    /// First message recorded against `path`
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.as_str())
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw form submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormInput(Map<String, Value>);

impl FormInput {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Build from any JSON value; non-objects yield an empty form
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Key was submitted at all (blank values count as submitted)
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    fn raw(&self, key: &str) -> Raw<'_> {
        match self.0.get(key) {
            None => Raw::Absent,
            Some(Value::Null) => Raw::Blank,
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Raw::Blank
                } else {
                    Raw::Text(Cow::Borrowed(trimmed))
                }
            }
            Some(Value::Number(n)) => Raw::Text(Cow::Owned(n.to_string())),
            Some(Value::Bool(b)) => Raw::Text(Cow::Owned(b.to_string())),
            Some(Value::Array(items)) => Raw::List(items),
            Some(Value::Object(_)) => Raw::Other,
        }
    }
}

enum Raw<'a> {
    Absent,
    Blank,
    Text(Cow<'a, str>),
    List(&'a Vec<Value>),
    Other,
}

/// Typed accessor over a [`FormInput`] that accumulates violations
pub struct FormReader<'a> {
    input: &'a FormInput,
    errors: ValidationErrors,
}

impl<'a> FormReader<'a> {
    pub fn new(input: &'a FormInput) -> Self {
        Self {
            input,
            errors: ValidationErrors::new(),
        }
    }

    /// Record a per-field violation when `ok` is false
    pub fn check(&mut self, ok: bool, path: &str, message: &str) {
        if !ok {
            self.errors.push(path, message);
        }
    }

    fn text(&mut self, key: &str) -> Option<Option<String>> {
        match self.input.raw(key) {
            Raw::Absent => None,
            Raw::Blank => Some(None),
            Raw::Text(s) => Some(Some(s.into_owned())),
            Raw::List(_) | Raw::Other => {
                self.errors.push(key, format!("{} must be a single value", label(key)));
                Some(None)
            }
        }
    }

    pub fn required_str(&mut self, key: &str) -> String {
        match self.text(key).flatten() {
            Some(value) => value,
            None => {
                self.require_missing(key);
                String::new()
            }
        }
    }

    pub fn optional_str(&mut self, key: &str) -> Option<String> {
        self.text(key).flatten()
    }

    /// `None` when absent, `Some(None)` when submitted blank (clear the field)
    pub fn patch_str(&mut self, key: &str) -> Option<Option<String>> {
        self.text(key)
    }

    pub fn required_enum<T: CatalogEnum>(&mut self, key: &str) -> T {
        match self.optional_enum(key) {
            Some(value) => value,
            None => {
                self.require_missing(key);
                T::ALL[0]
            }
        }
    }

    pub fn optional_enum<T: CatalogEnum>(&mut self, key: &str) -> Option<T> {
        let raw = self.text(key).flatten()?;
        match T::parse_label(&raw) {
            Some(value) => Some(value),
            None => {
                self.errors.push(
                    key,
                    format!("{} must be one of: {}", label(key), T::labels().join(", ")),
                );
                None
            }
        }
    }

    pub fn required_date(&mut self, key: &str) -> NaiveDate {
        match self.optional_date(key) {
            Some(date) => date,
            None => {
                self.require_missing(key);
                NaiveDate::default()
            }
        }
    }

    pub fn optional_date(&mut self, key: &str) -> Option<NaiveDate> {
        self.patch_date(key).flatten()
    }

    pub fn patch_date(&mut self, key: &str) -> Option<Option<NaiveDate>> {
        let raw = self.text(key)?;
        let Some(raw) = raw else {
            return Some(None);
        };
        match parse_date(&raw) {
            Some(date) => Some(Some(date)),
            None => {
                self.errors
                    .push(key, format!("{} must be a date (YYYY-MM-DD)", label(key)));
                Some(None)
            }
        }
    }

    pub fn required_f64(&mut self, key: &str) -> f64 {
        match self.optional_f64(key) {
            Some(value) => value,
            None => {
                self.require_missing(key);
                0.0
            }
        }
    }

    pub fn optional_f64(&mut self, key: &str) -> Option<f64> {
        self.patch_f64(key).flatten()
    }

    pub fn patch_f64(&mut self, key: &str) -> Option<Option<f64>> {
        let raw = self.text(key)?;
        let Some(raw) = raw else {
            return Some(None);
        };
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(Some(value)),
            _ => {
                self.errors.push(key, format!("{} must be a number", label(key)));
                Some(None)
            }
        }
    }

    pub fn optional_i64(&mut self, key: &str) -> Option<i64> {
        let raw = self.text(key).flatten()?;
        match raw.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors
                    .push(key, format!("{} must be a whole number", label(key)));
                None
            }
        }
    }

    /// Checkbox-style flag; absent or blank means false
    pub fn bool_flag(&mut self, key: &str) -> bool {
        self.patch_bool(key).unwrap_or(false)
    }

    pub fn patch_bool(&mut self, key: &str) -> Option<bool> {
        let raw = self.text(key)?;
        let Some(raw) = raw else {
            return Some(false);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "on" | "1" | "yes" => Some(true),
            "false" | "off" | "0" | "no" => Some(false),
            _ => {
                self.errors
                    .push(key, format!("{} must be true or false", label(key)));
                None
            }
        }
    }

    /// Multi-value field; blank and repeated entries are dropped, first occurrence wins
    pub fn string_list(&mut self, key: &str) -> Vec<String> {
        match self.input.raw(key) {
            Raw::Absent | Raw::Blank => Vec::new(),
            Raw::Text(s) => vec![s.into_owned()],
            Raw::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) if !s.trim().is_empty() => {
                            push_unique(&mut values, s.trim().to_string())
                        }
                        Value::String(_) | Value::Null => {}
                        Value::Number(n) => push_unique(&mut values, n.to_string()),
                        _ => {
                            self.errors
                                .push(key, format!("{} must be a list of text", label(key)));
                            return Vec::new();
                        }
                    }
                }
                values
            }
            Raw::Other => {
                self.errors
                    .push(key, format!("{} must be a list of text", label(key)));
                Vec::new()
            }
        }
    }

    fn require_missing(&mut self, key: &str) {
        if self.errors.message_for(key).is_none() {
            self.errors.push(key, format!("{} is required", label(key)));
        }
    }

    /// Finish per-field checks; cross-field rules run only if all passed
    pub fn into_rules(self) -> Result<Rules, ValidationErrors> {
        self.errors.into_result()?;
        Ok(Rules {
            errors: ValidationErrors::new(),
        })
    }
}

/// Cross-field rules, evaluated after per-field checks
#[derive(Debug, Default)]
pub struct Rules {
    errors: ValidationErrors,
}

impl Rules {
    /// Record `message` against `path` when `ok` is false
    pub fn check(&mut self, ok: bool, path: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(path, message);
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part is kept)
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// `supplierContactId` -> `Supplier contact ID`
fn label(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in key.chars() {
        if c.is_ascii_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    let words: Vec<String> = words
        .into_iter()
        .enumerate()
        .map(|(i, w)| {
            if w == "id" {
                "ID".to_string()
            } else if i == 0 {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => w,
                }
            } else {
                w
            }
        })
        .collect();
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::catalog_enum! {
        enum Kind {
            Value => "Value",
            List => "List",
        }
    }

    fn form(value: Value) -> FormInput {
        FormInput::from_json(value)
    }

    #[test]
    fn test_label_humanizes_camel_case() {
        assert_eq!(label("supplierContactId"), "Supplier contact ID");
        assert_eq!(label("name"), "Name");
        assert_eq!(label("expirationDate"), "Expiration date");
    }

    #[test]
    fn test_required_fields_report_every_missing_path() {
        let input = form(json!({ "name": "  " }));
        let mut reader = FormReader::new(&input);
        reader.required_str("name");
        reader.required_date("openDate");
        let errors = reader.into_rules().err().expect("should fail");
        assert_eq!(errors.paths(), vec!["name", "openDate"]);
        assert_eq!(errors.message_for("name"), Some("Name is required"));
    }

    #[test]
    fn test_numbers_and_bools_accept_strings() {
        let input = form(json!({
            "qty": "2.5",
            "price": 4,
            "drop": "on",
            "flag": false,
        }));
        let mut reader = FormReader::new(&input);
        assert_eq!(reader.optional_f64("qty"), Some(2.5));
        assert_eq!(reader.optional_f64("price"), Some(4.0));
        assert!(reader.bool_flag("drop"));
        assert!(!reader.bool_flag("flag"));
        assert!(!reader.bool_flag("missing"));
        assert!(reader.into_rules().is_ok());
    }

    #[test]
    fn test_invalid_values_are_attributed() {
        let input = form(json!({
            "qty": "lots",
            "when": "31/12/2026",
            "kind": "Other",
        }));
        let mut reader = FormReader::new(&input);
        reader.optional_f64("qty");
        reader.optional_date("when");
        reader.optional_enum::<Kind>("kind");
        let errors = reader.into_rules().err().unwrap();
        assert_eq!(errors.paths(), vec!["qty", "when", "kind"]);
        assert_eq!(
            errors.message_for("kind"),
            Some("Kind must be one of: Value, List")
        );
    }

    #[test]
    fn test_required_enum_with_bad_value_reports_once() {
        let input = form(json!({ "kind": "Nope" }));
        let mut reader = FormReader::new(&input);
        reader.required_enum::<Kind>("kind");
        let errors = reader.into_rules().err().unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_dates_accept_rfc3339() {
        let input = form(json!({ "d": "2026-10-19T08:30:00-05:00" }));
        let mut reader = FormReader::new(&input);
        assert_eq!(
            reader.optional_date("d"),
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
    }

    #[test]
    fn test_patch_distinguishes_absent_and_blank() {
        let input = form(json!({ "notes": "", "ref": "R1" }));
        let mut reader = FormReader::new(&input);
        assert_eq!(reader.patch_str("missing"), None);
        assert_eq!(reader.patch_str("notes"), Some(None));
        assert_eq!(reader.patch_str("ref"), Some(Some("R1".to_string())));
    }

    #[test]
    fn test_string_list_drops_blank_entries() {
        let input = form(json!({ "values": ["A", " ", "", null, "B"] }));
        let mut reader = FormReader::new(&input);
        assert_eq!(reader.string_list("values"), vec!["A", "B"]);
    }

    #[test]
    fn test_string_list_keeps_first_of_repeats() {
        let input = form(json!({ "values": ["B", "A", " B ", 7, "7", "A"] }));
        let mut reader = FormReader::new(&input);
        assert_eq!(reader.string_list("values"), vec!["B", "A", "7"]);
    }

    #[test]
    fn test_rules_only_run_after_fields_pass() {
        let input = form(json!({ "qty": "x" }));
        let mut reader = FormReader::new(&input);
        reader.optional_f64("qty");
        // per-field failure short-circuits before any rule is evaluated
        assert!(reader.into_rules().is_err());

        let input = form(json!({ "min": 5, "max": 1 }));
        let mut reader = FormReader::new(&input);
        let min = reader.optional_f64("min");
        let max = reader.optional_f64("max");
        let mut rules = reader.into_rules().unwrap();
        rules.check(
            !matches!((min, max), (Some(lo), Some(hi)) if hi < lo),
            "max",
            "Maximum must be greater than or equal to minimum",
        );
        let errors = rules.finish().unwrap_err();
        assert_eq!(errors.paths(), vec!["max"]);
    }

    #[test]
    fn test_display_joins_violations() {
        let mut errors = ValidationErrors::new();
        errors.push("a", "bad");
        errors.push("b", "worse");
        assert_eq!(errors.to_string(), "a: bad; b: worse");
    }
}
