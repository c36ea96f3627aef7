//! Supplier quote validators

use chrono::NaiveDate;
use mfg_common::{FormInput, FormReader, ValidationErrors};

use crate::models::SupplierQuoteStatus;

const EXPIRED: &str = "Expiration date must be today or later";

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierQuoteForm {
    pub supplier_id: String,
    pub supplier_reference: Option<String>,
    pub status: Option<SupplierQuoteStatus>,
    pub quoted_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub currency_code: Option<String>,
    pub notes: Option<String>,
}

impl SupplierQuoteForm {
    pub fn for_supplier(supplier_id: impl Into<String>) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            supplier_reference: None,
            status: None,
            quoted_date: None,
            expiration_date: None,
            currency_code: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierQuotePatch {
    pub supplier_id: Option<String>,
    pub supplier_reference: Option<Option<String>>,
    pub status: Option<SupplierQuoteStatus>,
    pub quoted_date: Option<Option<NaiveDate>>,
    pub expiration_date: Option<Option<NaiveDate>>,
    pub currency_code: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

/// `today` is the caller's local date
pub fn validate_supplier_quote(input: &FormInput, today: NaiveDate) -> Result<SupplierQuoteForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = SupplierQuoteForm {
        supplier_id: reader.required_str("supplierId"),
        supplier_reference: reader.optional_str("supplierReference"),
        status: reader.optional_enum("status"),
        quoted_date: reader.optional_date("quotedDate"),
        expiration_date: reader.optional_date("expirationDate"),
        currency_code: reader.optional_str("currencyCode"),
        notes: reader.optional_str("notes"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(
        form.expiration_date.map_or(true, |d| d >= today),
        "expirationDate",
        EXPIRED,
    );
    rules.finish()?;

    Ok(form)
}

pub fn validate_supplier_quote_patch(input: &FormInput, today: NaiveDate) -> Result<SupplierQuotePatch, ValidationErrors> {
    let mut reader = FormReader::new(input);

    let supplier_id = reader.patch_str("supplierId");
    reader.check(!matches!(supplier_id, Some(None)), "supplierId", "Supplier ID is required");

    let patch = SupplierQuotePatch {
        supplier_id: supplier_id.flatten(),
        supplier_reference: reader.patch_str("supplierReference"),
        status: reader.optional_enum("status"),
        quoted_date: reader.patch_date("quotedDate"),
        expiration_date: reader.patch_date("expirationDate"),
        currency_code: reader.patch_str("currencyCode"),
        notes: reader.patch_str("notes"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(
        !matches!(patch.expiration_date, Some(Some(d)) if d < today),
        "expirationDate",
        EXPIRED,
    );
    rules.finish()?;

    Ok(patch)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierQuoteLineForm {
    pub item_id: String,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub lead_time: i64,
}

pub fn validate_supplier_quote_line(input: &FormInput) -> Result<SupplierQuoteLineForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = SupplierQuoteLineForm {
        item_id: reader.required_str("itemId"),
        description: reader.optional_str("description"),
        quantity: reader.required_f64("quantity"),
        unit_price: reader.optional_f64("unitPrice").unwrap_or(0.0),
        lead_time: reader.optional_i64("leadTime").unwrap_or(0),
    };

    let mut rules = reader.into_rules()?;
    rules
        .check(form.quantity > 0.0, "quantity", "Quantity must be greater than 0")
        .check(form.unit_price >= 0.0, "unitPrice", "Unit price must be at least 0")
        .check(form.lead_time >= 0, "leadTime", "Lead time must be at least 0");
    rules.finish()?;

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_expiration_must_not_be_past() {
        let input = FormInput::from_json(json!({
            "supplierId": "s1",
            "expirationDate": "2026-10-18",
        }));
        let errors = validate_supplier_quote(&input, today()).unwrap_err();
        assert_eq!(errors.paths(), vec!["expirationDate"]);

        let input = FormInput::from_json(json!({
            "supplierId": "s1",
            "expirationDate": "2026-10-19",
        }));
        assert!(validate_supplier_quote(&input, today()).is_ok());
    }

    #[test]
    fn test_patch_expiration_rule() {
        let input = FormInput::from_json(json!({ "expirationDate": "2025-01-01" }));
        let errors = validate_supplier_quote_patch(&input, today()).unwrap_err();
        assert_eq!(errors.paths(), vec!["expirationDate"]);

        let input = FormInput::from_json(json!({ "expirationDate": "" }));
        let patch = validate_supplier_quote_patch(&input, today()).unwrap();
        assert_eq!(patch.expiration_date, Some(None));
    }

    #[test]
    fn test_line_numbers() {
        let input = FormInput::from_json(json!({
            "itemId": "i1",
            "quantity": 0,
            "unitPrice": -2,
            "leadTime": -1,
        }));
        let errors = validate_supplier_quote_line(&input).unwrap_err();
        assert_eq!(errors.paths(), vec!["quantity", "unitPrice", "leadTime"]);

        let input = FormInput::from_json(json!({ "itemId": "i1", "quantity": "3" }));
        let line = validate_supplier_quote_line(&input).unwrap();
        assert_eq!(line.quantity, 3.0);
        assert_eq!(line.lead_time, 0);
    }
}
