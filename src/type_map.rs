//! # Type Map Module
//!
//! Maps a column's database type name to the [`FieldType`] rendered in the
//! document.
//!
//! ## Default MySQL Table
//!
//! | Database type              | Schema type | Extra properties   |
//! |----------------------------|-------------|--------------------|
//! | `VARCHAR`, `TEXT`, `CHAR`  | `string`    |                    |
//! | `DATETIME`                 | `string`    | `format: date-time`|
//! | `TINYINT`                  | `boolean`   | `format: int64`    |
//! | `SMALLINT`, `INT`, `BIGINT`| `integer`   | `format: int64`    |
//!
//! Matching is exact and case-sensitive. Callers pass the bare type name
//! (`VARCHAR`, not `VARCHAR(255)`); the introspector normalises it.
//!
//! A name with no entry is an error. There is no fallback type.
//!
//! ## Extending
//!
//! ```rust
//! use swagen::model::FieldType;
//! use swagen::type_map::{TypeMatcher, TypeRegistry};
//!
//! let registry = TypeRegistry::mysql()
//!     .with_mapping(TypeMatcher::exact("DECIMAL"), FieldType::with_format("number", "double"));
//! assert_eq!(registry.resolve("DECIMAL").map(|t| t.name), Ok("number".to_string()));
//! ```

use crate::model::FieldType;
use std::fmt;
use std::sync::OnceLock;

/// A database type name with no registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedTypeError {
    pub type_name: String,
}

impl fmt::Display for UnsupportedTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {} not supported", self.type_name)
    }
}

impl std::error::Error for UnsupportedTypeError {}

/// Decides whether a registry entry applies to a database type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMatcher {
    /// Case-sensitive equality with the bare type name
    Exact(String),
}

impl TypeMatcher {
    pub fn exact(name: impl Into<String>) -> Self {
        TypeMatcher::Exact(name.into())
    }

    pub fn matches(&self, database_type_name: &str) -> bool {
        match self {
            TypeMatcher::Exact(name) => name == database_type_name,
        }
    }
}

impl fmt::Display for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMatcher::Exact(name) => write!(f, "{name}"),
        }
    }
}

/// Ordered list of `(matcher, field type)` entries. The first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    entries: Vec<(TypeMatcher, FieldType)>,
}

impl TypeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The MySQL table used by default.
    pub fn mysql() -> Self {
        let string = FieldType::plain("string");
        let int64 = FieldType::with_format("integer", "int64");
        Self::empty()
            .with_mapping(TypeMatcher::exact("VARCHAR"), string.clone())
            .with_mapping(TypeMatcher::exact("TEXT"), string.clone())
            .with_mapping(TypeMatcher::exact("CHAR"), string)
            .with_mapping(
                TypeMatcher::exact("DATETIME"),
                FieldType::with_format("string", "date-time"),
            )
            .with_mapping(
                TypeMatcher::exact("TINYINT"),
                FieldType::with_format("boolean", "int64"),
            )
            .with_mapping(TypeMatcher::exact("SMALLINT"), int64.clone())
            .with_mapping(TypeMatcher::exact("INT"), int64.clone())
            .with_mapping(TypeMatcher::exact("BIGINT"), int64)
    }

    /// Append an entry. Entries added earlier keep precedence.
    pub fn with_mapping(mut self, matcher: TypeMatcher, field_type: FieldType) -> Self {
        self.entries.push((matcher, field_type));
        self
    }

    pub fn entries(&self) -> &[(TypeMatcher, FieldType)] {
        &self.entries
    }

    pub fn resolve(&self, database_type_name: &str) -> Result<FieldType, UnsupportedTypeError> {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher.matches(database_type_name))
            .map(|(_, field_type)| field_type.clone())
            .ok_or_else(|| UnsupportedTypeError {
                type_name: database_type_name.to_string(),
            })
    }
}

fn default_registry() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TypeRegistry::mysql)
}

/// Map a database type name using the default MySQL table.
pub fn map_column_type(database_type_name: &str) -> Result<FieldType, UnsupportedTypeError> {
    default_registry().resolve(database_type_name)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_supported_types() {
        let cases = [
            ("VARCHAR", "string", None),
            ("TEXT", "string", None),
            ("CHAR", "string", None),
            ("DATETIME", "string", Some("date-time")),
            ("TINYINT", "boolean", Some("int64")),
            ("SMALLINT", "integer", Some("int64")),
            ("INT", "integer", Some("int64")),
            ("BIGINT", "integer", Some("int64")),
        ];
        for (db_type, schema, format) in cases {
            let ty = map_column_type(db_type).unwrap();
            assert_eq!(ty.name, schema, "{db_type}");
            assert_eq!(
                ty.extra_properties.get("format").map(String::as_str),
                format,
                "{db_type}"
            );
            let expected_len = usize::from(format.is_some());
            assert_eq!(ty.extra_properties.len(), expected_len, "{db_type}");
        }
    }

    #[test]
    fn test_unsupported_type_names_offender() {
        for name in ["JSON", "BLOB"] {
            let err = map_column_type(name).unwrap_err();
            assert_eq!(err.type_name, name);
            assert!(err.to_string().contains(name));
        }
    }

    #[test]
    fn test_matching_is_exact() {
        assert!(map_column_type("varchar").is_err());
        assert!(map_column_type("VARCHAR(255)").is_err());
        assert!(map_column_type("INTEGER").is_err());
        assert!(map_column_type("").is_err());
    }

    #[test]
    fn test_first_match_wins() {
        let registry =
            TypeRegistry::mysql().with_mapping(TypeMatcher::exact("INT"), FieldType::plain("number"));
        assert_eq!(registry.resolve("INT").unwrap().name, "integer");
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        assert!(TypeRegistry::empty().resolve("VARCHAR").is_err());
    }

    #[test]
    fn test_registry_is_inspectable() {
        let names: Vec<String> = TypeRegistry::mysql()
            .entries()
            .iter()
            .map(|(m, _)| m.to_string())
            .collect();
        assert_eq!(
            names,
            ["VARCHAR", "TEXT", "CHAR", "DATETIME", "TINYINT", "SMALLINT", "INT", "BIGINT"]
        );
    }
}
