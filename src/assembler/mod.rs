//! # Assembler Module
//!
//! Turns configured tables into fully populated [`Resource`]s.
//!
//! ## Per-table algorithm
//!
//! 1. List the table's columns through the [`ColumnIntrospector`]
//! 2. Map every column type through the [`TypeRegistry`]
//! 3. Require a resolved nullability for every column
//! 4. Keep column order for the definition fields
//! 5. Derive the path from the table name (`order_items` → `order-items`)
//!
//! ## Ordering and failures
//!
//! Tables are introspected concurrently (bounded by
//! [`AssemblerOptions::max_concurrency`]), but resources always come back in
//! configured order. Any failure means no resources at all: in
//! [`ErrorMode::FailFast`] the first failure cancels in-flight fetches, in
//! [`ErrorMode::CollectAll`] every table is tried and all failures are
//! reported together.

use crate::error::GenerateError;
use crate::introspect::{ColumnIntrospector, ColumnMeta};
use crate::model::{Definition, DefinitionField, FieldType, Request, RequestParam, Resource};
use crate::type_map::TypeRegistry;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

#[cfg(test)]
mod tests;

/// A configured table, before its columns are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Source table name
    pub table: String,
    /// Human readable resource name, e.g. `Product`
    pub title: String,
    /// Schema name; derived from the title when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_name: Option<String>,
}

impl ResourceConfig {
    pub fn new(table: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            title: title.into(),
            definition_name: None,
        }
    }

    pub fn with_definition_name(mut self, name: impl Into<String>) -> Self {
        self.definition_name = Some(name.into());
        self
    }

    /// The configured schema name, or the title in PascalCase
    /// (`Order Item` → `OrderItem`). An empty result falls back to the
    /// table name (`order_items` → `OrderItem`).
    pub fn definition_name(&self) -> String {
        if let Some(name) = &self.definition_name {
            return name.clone();
        }
        let from_title = to_pascal_case(&self.title);
        if from_title.is_empty() {
            to_pascal_case(&self.table)
        } else {
            from_title
        }
    }
}

/// Join the ASCII alphanumeric runs of `text`, each starting upper-case.
pub fn to_pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Whether `name` can be used as a schema name and in operation IDs.
pub fn is_valid_definition_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// How a run reacts to failing tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Stop at the first failure
    #[default]
    FailFast,
    /// Try every table, then report all failures at once
    CollectAll,
}

/// Tuning for [`ResourceAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerOptions {
    /// Upper bound for listing the columns of one table
    pub deadline: Option<Duration>,
    /// How many tables are introspected at once
    pub max_concurrency: usize,
    pub error_mode: ErrorMode,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            deadline: Some(Duration::from_secs(30)),
            max_concurrency: 4,
            error_mode: ErrorMode::FailFast,
        }
    }
}

/// URL path of a table's resource: every `_` becomes `-`.
pub fn path_for_table(table: &str) -> String {
    table.replace('_', "-")
}

/// Query parameters of the collection `GET`, as the resource template
/// renders them.
pub fn collection_params() -> Vec<RequestParam> {
    vec![
        RequestParam::query("limit", FieldType::plain("integer")),
        RequestParam::query("offset", FieldType::plain("integer")),
    ]
}

/// Build the resource of one table from its columns.
///
/// Fails on the first column with an unsupported type or unresolved
/// nullability; no partially mapped resource is ever returned.
pub fn build_resource(
    config: &ResourceConfig,
    columns: &[ColumnMeta],
    registry: &TypeRegistry,
) -> Result<Resource, GenerateError> {
    let fields = columns
        .iter()
        .map(|col| {
            let field_type = registry.resolve(&col.database_type_name).map_err(|e| {
                GenerateError::UnsupportedType {
                    table: config.table.clone(),
                    column: col.name.clone(),
                    type_name: e.type_name,
                }
            })?;
            let is_nullable = col
                .nullable
                .ok_or_else(|| GenerateError::UnresolvedNullability {
                    table: config.table.clone(),
                    column: col.name.clone(),
                })?;
            Ok(DefinitionField {
                name: col.name.clone(),
                field_type,
                is_nullable,
            })
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    Ok(Resource {
        title: config.title.clone(),
        path: path_for_table(&config.table),
        definition: Definition::new(config.definition_name(), fields),
        get: Request {
            params: collection_params(),
        },
    })
}

/// Fetches columns and builds resources for a set of configured tables.
#[derive(Debug, Clone)]
pub struct ResourceAssembler<I> {
    introspector: I,
    registry: TypeRegistry,
    options: AssemblerOptions,
}

impl<I: ColumnIntrospector> ResourceAssembler<I> {
    pub fn new(introspector: I) -> Self {
        Self {
            introspector,
            registry: TypeRegistry::mysql(),
            options: AssemblerOptions::default(),
        }
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: AssemblerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Assemble every configured table, returning resources in configured order.
    pub async fn assemble(&self, configs: &[ResourceConfig]) -> Result<Vec<Resource>, GenerateError> {
        let mut pending = stream::iter(configs.iter().enumerate())
            .map(|(idx, config)| async move { (idx, self.assemble_one(config).await) })
            .buffer_unordered(self.options.max_concurrency.max(1));

        let mut slots: Vec<Option<Resource>> = vec![None; configs.len()];
        let mut errors: Vec<(usize, GenerateError)> = Vec::new();

        while let Some((idx, result)) = pending.next().await {
            match result {
                Ok(resource) => slots[idx] = Some(resource),
                // Dropping `pending` cancels the fetches still in flight.
                Err(e) if self.options.error_mode == ErrorMode::FailFast => return Err(e),
                Err(e) => errors.push((idx, e)),
            }
        }

        if !errors.is_empty() {
            errors.sort_by_key(|(idx, _)| *idx);
            let mut errors: Vec<GenerateError> = errors.into_iter().map(|(_, e)| e).collect();
            return Err(match errors.len() {
                1 => errors.swap_remove(0),
                _ => GenerateError::Multiple(errors),
            });
        }

        let resources: Vec<Resource> = slots.into_iter().flatten().collect();
        info!(resources = resources.len(), "Assembled resources");
        Ok(resources)
    }

    async fn assemble_one(&self, config: &ResourceConfig) -> Result<Resource, GenerateError> {
        let span = info_span!("assemble_resource", table = %config.table);
        async {
            let columns = self.fetch_columns(&config.table).await?;
            let resource = build_resource(config, &columns, &self.registry)?;
            debug!(
                path = %resource.path,
                fields = resource.definition.fields.len(),
                "Assembled resource"
            );
            Ok::<_, GenerateError>(resource)
        }
        .instrument(span)
        .await
    }

    async fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnMeta>, GenerateError> {
        let fetch = self.introspector.columns_of(table);
        match self.options.deadline {
            Some(after) => tokio::time::timeout(after, fetch)
                .await
                .map_err(|_| GenerateError::Timeout {
                    table: table.to_string(),
                    after,
                })?
                .map_err(GenerateError::from),
            None => fetch.await.map_err(GenerateError::from),
        }
    }
}
