//! # Introspect Module
//!
//! Column metadata sources. The assembler only sees the
//! [`ColumnIntrospector`] trait; it never reads row data.
//!
//! - [`MySqlIntrospector`] - reads `information_schema.COLUMNS` through sqlx
//! - [`MemoryIntrospector`] - fixed in-memory tables, for tests and embedding
//!
//! ## Contract
//!
//! - Columns come back in table order (`ORDINAL_POSITION` for MySQL)
//! - `database_type_name` is the bare upper-case type name (`VARCHAR`)
//! - `nullable` is `None` when the source could not determine it; the
//!   assembler treats that as a failure of the whole run

mod memory;
mod mysql;

pub use memory::MemoryIntrospector;
pub use mysql::{normalize_type_name, parse_nullable, MySqlIntrospector};

use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Metadata of one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub database_type_name: String,
    pub nullable: Option<bool>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, database_type_name: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            database_type_name: database_type_name.into(),
            nullable: Some(nullable),
        }
    }

    /// A column whose nullability the source could not resolve.
    pub fn unresolved(name: impl Into<String>, database_type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database_type_name: database_type_name.into(),
            nullable: None,
        }
    }
}

/// Source of column metadata for a table.
pub trait ColumnIntrospector: Send + Sync {
    /// List the columns of `table` in table order.
    fn columns_of(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<ColumnMeta>, IntrospectError>> + Send;
}

impl<T: ColumnIntrospector> ColumnIntrospector for Arc<T> {
    fn columns_of(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<ColumnMeta>, IntrospectError>> + Send {
        (**self).columns_of(table)
    }
}

/// Why listing a table's columns failed.
#[derive(Debug)]
pub enum IntrospectErrorKind {
    /// The data source has no such table, or it has no columns
    UnknownTable,
    /// The data source returned an error
    Source(Box<dyn std::error::Error + Send + Sync>),
}

/// Failure to list the columns of one table.
#[derive(Debug)]
pub struct IntrospectError {
    table: String,
    kind: IntrospectErrorKind,
}

impl IntrospectError {
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: IntrospectErrorKind::UnknownTable,
        }
    }

    pub fn query_failed(
        table: impl Into<String>,
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            table: table.into(),
            kind: IntrospectErrorKind::Source(error.into()),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> &IntrospectErrorKind {
        &self.kind
    }
}

impl fmt::Display for IntrospectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IntrospectErrorKind::UnknownTable => {
                write!(f, "table '{}' not found or has no columns", self.table)
            }
            IntrospectErrorKind::Source(e) => {
                write!(f, "failed to list columns of table '{}': {e}", self.table)
            }
        }
    }
}

impl std::error::Error for IntrospectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            IntrospectErrorKind::UnknownTable => None,
            IntrospectErrorKind::Source(e) => Some(e.as_ref()),
        }
    }
}
