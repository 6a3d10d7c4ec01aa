use super::{ColumnIntrospector, ColumnMeta, IntrospectError};
use std::collections::HashMap;

/// Introspector answering from tables registered up front.
///
/// ```rust
/// use swagen::introspect::{ColumnMeta, MemoryIntrospector};
///
/// let source = MemoryIntrospector::new()
///     .with_table("users", vec![ColumnMeta::new("id", "BIGINT", false)]);
/// assert!(source.has_table("users"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryIntrospector {
    tables: HashMap<String, Vec<ColumnMeta>>,
}

impl MemoryIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>, columns: Vec<ColumnMeta>) -> Self {
        self.tables.insert(table.into(), columns);
        self
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }
}

impl ColumnIntrospector for MemoryIntrospector {
    async fn columns_of(&self, table: &str) -> Result<Vec<ColumnMeta>, IntrospectError> {
        match self.tables.get(table) {
            Some(columns) if !columns.is_empty() => Ok(columns.clone()),
            _ => Err(IntrospectError::unknown_table(table)),
        }
    }
}
