//! Fixed string enumerations (statuses, types, priorities)
//!
//! One enum per concept is the single source of truth for validation,
//! storage and the option lists served to forms. `catalog_enum!` generates
//! the string mapping, serde and sqlx glue so the three never drift.

/// A closed set of string-labelled values
pub trait CatalogEnum: Sized + Copy + 'static {
    /// Every variant, in display order
    const ALL: &'static [Self];

    /// Stored and displayed label
    fn as_str(&self) -> &'static str;

    /// Parse an exact label
    fn parse_label(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }

    /// All labels, for option lists
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.as_str()).collect()
    }
}

/// Declare a [`CatalogEnum`] with its labels.
///
/// ```
/// mfg_common::catalog_enum! {
///     /// Shift pattern
///     pub enum Shift {
///         Day => "Day",
///         Night => "Night",
///     }
/// }
///
/// use mfg_common::CatalogEnum;
/// assert_eq!(Shift::Night.as_str(), "Night");
/// assert_eq!("Day".parse::<Shift>().unwrap(), Shift::Day);
/// ```
#[macro_export]
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::catalog::CatalogEnum for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::catalog::CatalogEnum::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::catalog::CatalogEnum>::parse_label(s).ok_or_else(|| {
                    $crate::Error::InvalidInput(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        s
                    ))
                })
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                serializer.serialize_str($crate::catalog::CatalogEnum::as_str(self))
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                let label = <String as $crate::__serde::Deserialize>::deserialize(deserializer)?;
                label.parse().map_err($crate::__serde::de::Error::custom)
            }
        }

        impl $crate::__sqlx::Type<$crate::__sqlx::Sqlite> for $name {
            fn type_info() -> $crate::__sqlx::sqlite::SqliteTypeInfo {
                <String as $crate::__sqlx::Type<$crate::__sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &$crate::__sqlx::sqlite::SqliteTypeInfo) -> bool {
                <String as $crate::__sqlx::Type<$crate::__sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> $crate::__sqlx::Encode<'q, $crate::__sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<$crate::__sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> ::std::result::Result<
                $crate::__sqlx::encode::IsNull,
                $crate::__sqlx::error::BoxDynError,
            > {
                let label: &'q str = $crate::catalog::CatalogEnum::as_str(self);
                <&'q str as $crate::__sqlx::Encode<'q, $crate::__sqlx::Sqlite>>::encode_by_ref(
                    &label, buf,
                )
            }
        }

        impl<'r> $crate::__sqlx::Decode<'r, $crate::__sqlx::Sqlite> for $name {
            fn decode(
                value: $crate::__sqlx::sqlite::SqliteValueRef<'r>,
            ) -> ::std::result::Result<Self, $crate::__sqlx::error::BoxDynError> {
                let label = <&'r str as $crate::__sqlx::Decode<'r, $crate::__sqlx::Sqlite>>::decode(value)?;
                Ok(label.parse::<$name>()?)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::CatalogEnum;

    crate::catalog_enum! {
        enum Colour {
            Red => "Red",
            LightBlue => "Light Blue",
        }
    }

    #[test]
    fn test_labels_in_declaration_order() {
        assert_eq!(Colour::labels(), vec!["Red", "Light Blue"]);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("Light Blue".parse::<Colour>().unwrap(), Colour::LightBlue);
        assert!("light blue".parse::<Colour>().is_err());
        assert!("LightBlue".parse::<Colour>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Colour::LightBlue).unwrap();
        assert_eq!(json, "\"Light Blue\"");

        let back: Colour = serde_json::from_str("\"Red\"").unwrap();
        assert_eq!(back, Colour::Red);
        assert!(serde_json::from_str::<Colour>("\"Green\"").is_err());
    }

    #[tokio::test]
    async fn test_sqlx_round_trip_as_text() {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let (stored, decoded): (String, Colour) =
            sqlx::query_as("SELECT ?1, ?1")
                .bind(Colour::LightBlue)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(stored, "Light Blue");
        assert_eq!(decoded, Colour::LightBlue);
    }
}
