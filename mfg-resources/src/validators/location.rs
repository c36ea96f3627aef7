//! Location and employee validators

use mfg_common::{FormInput, FormReader, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationForm {
    pub name: String,
    /// IANA zone name, e.g. `America/Chicago`
    pub timezone: Option<String>,
    pub address_line_1: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
}

pub fn validate_location(input: &FormInput) -> Result<LocationForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = LocationForm {
        name: reader.required_str("name"),
        timezone: reader.optional_str("timezone"),
        address_line_1: reader.optional_str("addressLine1"),
        city: reader.optional_str("city"),
        country_code: reader.optional_str("countryCode"),
    };
    reader.into_rules()?.finish()?;
    Ok(form)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// Stored on the employee's job as their default location
    pub location_id: Option<String>,
}

pub fn validate_employee(input: &FormInput) -> Result<EmployeeForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = EmployeeForm {
        first_name: reader.required_str("firstName"),
        last_name: reader.required_str("lastName"),
        email: reader.optional_str("email"),
        location_id: reader.optional_str("locationId"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(
        form.email.as_deref().map_or(true, |email| email.contains('@')),
        "email",
        "Email must be a valid address",
    );
    rules.finish()?;
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_employee_names_required() {
        let errors = validate_employee(&FormInput::from_json(json!({ "firstName": "Ada" }))).unwrap_err();
        assert_eq!(errors.paths(), vec!["lastName"]);
        assert_eq!(errors.message_for("lastName"), Some("Last name is required"));
    }

    #[test]
    fn test_employee_email_shape() {
        let errors = validate_employee(&FormInput::from_json(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada",
        })))
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["email"]);
    }

    #[test]
    fn test_location_optional_fields() {
        let form = validate_location(&FormInput::from_json(json!({
            "name": "Plant 1",
            "timezone": "America/Chicago",
            "city": "",
        })))
        .unwrap();
        assert_eq!(form.timezone.as_deref(), Some("America/Chicago"));
        assert_eq!(form.city, None);
    }
}
