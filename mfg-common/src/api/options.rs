//! Option lists for form dropdowns
//!
//! Served from the same enums the validators parse, so a form can only offer
//! values the server accepts.

use axum::Json;
use serde::Serialize;

use crate::catalog::CatalogEnum;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Every variant of `T` as a select option
pub fn catalog_options<T: CatalogEnum>() -> Json<Vec<SelectOption>> {
    Json(
        T::ALL
            .iter()
            .map(|v| SelectOption {
                value: v.as_str(),
                label: v.as_str(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::catalog_enum! {
        enum Colour {
            Red => "Red",
            DarkBlue => "Dark Blue",
        }
    }

    #[test]
    fn test_options_follow_declaration_order() {
        let Json(options) = catalog_options::<Colour>();
        assert_eq!(
            options,
            vec![
                SelectOption { value: "Red", label: "Red" },
                SelectOption { value: "Dark Blue", label: "Dark Blue" },
            ]
        );
    }
}
