//! Errors produced by a generation run.
//!
//! Every kind is fatal to the run. The caller gets one [`GenerateError`]
//! and decides how to report it.

use crate::introspect::IntrospectError;
use std::fmt;
use std::time::Duration;

/// Terminal error of a generation run.
#[derive(Debug)]
pub enum GenerateError {
    /// The column source could not be queried for a table
    Introspection(IntrospectError),
    /// Listing a table's columns did not finish before the deadline
    Timeout {
        table: String,
        after: Duration,
    },
    /// A column's database type has no registry entry
    UnsupportedType {
        table: String,
        column: String,
        type_name: String,
    },
    /// The column source could not tell whether a column is nullable
    UnresolvedNullability { table: String, column: String },
    /// A template failed to render
    Render(askama::Error),
    /// Every failure of a run in collect-all mode, in configured order
    Multiple(Vec<GenerateError>),
}

impl GenerateError {
    /// The table the error is about, when there is exactly one.
    pub fn table(&self) -> Option<&str> {
        match self {
            GenerateError::Introspection(e) => Some(e.table()),
            GenerateError::Timeout { table, .. }
            | GenerateError::UnsupportedType { table, .. }
            | GenerateError::UnresolvedNullability { table, .. } => Some(table),
            GenerateError::Render(_) | GenerateError::Multiple(_) => None,
        }
    }

    /// Flatten nested [`GenerateError::Multiple`] values.
    pub fn flatten(self) -> Vec<GenerateError> {
        match self {
            GenerateError::Multiple(errors) => {
                errors.into_iter().flat_map(GenerateError::flatten).collect()
            }
            other => vec![other],
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Introspection(e) => write!(f, "{e}"),
            GenerateError::Timeout { table, after } => write!(
                f,
                "listing columns of table '{table}' timed out after {}ms",
                after.as_millis()
            ),
            GenerateError::UnsupportedType {
                table,
                column,
                type_name,
            } => write!(
                f,
                "column '{column}' of table '{table}': type {type_name} not supported"
            ),
            GenerateError::UnresolvedNullability { table, column } => write!(
                f,
                "column '{column}' of table '{table}': could not determine nullability"
            ),
            GenerateError::Render(e) => write!(f, "failed to render document: {e}"),
            GenerateError::Multiple(errors) => {
                write!(f, "{} tables failed:", errors.len())?;
                for e in errors {
                    write!(f, "\n  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Introspection(e) => Some(e),
            GenerateError::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IntrospectError> for GenerateError {
    fn from(e: IntrospectError) -> Self {
        GenerateError::Introspection(e)
    }
}

impl From<askama::Error> for GenerateError {
    fn from(e: askama::Error) -> Self {
        GenerateError::Render(e)
    }
}
