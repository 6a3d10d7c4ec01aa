#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::introspect::{IntrospectError, MemoryIntrospector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers from a [`MemoryIntrospector`] after a per-table delay and records
/// which fetches ran to completion.
#[derive(Default)]
struct DelayedIntrospector {
    inner: MemoryIntrospector,
    delays: HashMap<String, Duration>,
    completed: Arc<Mutex<Vec<String>>>,
}

impl DelayedIntrospector {
    fn new(inner: MemoryIntrospector) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    fn delay(mut self, table: &str, ms: u64) -> Self {
        self.delays.insert(table.to_string(), Duration::from_millis(ms));
        self
    }
}

impl ColumnIntrospector for DelayedIntrospector {
    async fn columns_of(&self, table: &str) -> Result<Vec<ColumnMeta>, IntrospectError> {
        if let Some(delay) = self.delays.get(table) {
            tokio::time::sleep(*delay).await;
        }
        let result = self.inner.columns_of(table).await;
        self.completed.lock().unwrap().push(table.to_string());
        result
    }
}

fn products() -> Vec<ColumnMeta> {
    vec![
        ColumnMeta::new("id", "BIGINT", false),
        ColumnMeta::new("name", "VARCHAR", false),
        ColumnMeta::new("description", "TEXT", true),
    ]
}

fn users() -> Vec<ColumnMeta> {
    vec![
        ColumnMeta::new("id", "INT", false),
        ColumnMeta::new("email", "VARCHAR", false),
        ColumnMeta::new("created_at", "DATETIME", false),
        ColumnMeta::new("active", "TINYINT", true),
    ]
}

#[test]
fn test_path_for_table() {
    assert_eq!(path_for_table("order_items"), "order-items");
    assert_eq!(path_for_table("users"), "users");
    assert_eq!(path_for_table("a__b_"), "a--b-");
    assert_eq!(path_for_table(""), "");
}

#[test]
fn test_definition_name_defaults_to_title() {
    let config = ResourceConfig::new("order_items", "OrderItem");
    assert_eq!(config.definition_name(), "OrderItem");
    let config = config.with_definition_name("LineItem");
    assert_eq!(config.definition_name(), "LineItem");
}

#[test]
fn test_definition_name_from_multi_word_title() {
    assert_eq!(
        ResourceConfig::new("order_items", "Order Item").definition_name(),
        "OrderItem"
    );
    assert_eq!(
        ResourceConfig::new("users", "user account").definition_name(),
        "UserAccount"
    );
    assert_eq!(
        ResourceConfig::new("order_items", "--").definition_name(),
        "OrderItems"
    );
}

#[test]
fn test_definition_name_validity() {
    assert!(is_valid_definition_name("OrderItem"));
    assert!(is_valid_definition_name("Order_Item2"));
    assert!(!is_valid_definition_name("Order Item"));
    assert!(!is_valid_definition_name(""));
    assert!(!is_valid_definition_name("Order-Item"));
}

#[test]
fn test_build_resource_with_multi_word_title() {
    let config = ResourceConfig::new("order_items", "Order Item");
    let resource = build_resource(
        &config,
        &[ColumnMeta::new("id", "BIGINT", false)],
        &TypeRegistry::mysql(),
    )
    .unwrap();
    assert_eq!(resource.title, "Order Item");
    assert_eq!(resource.definition.name, "OrderItem");
    assert_eq!(resource.path, "order-items");
}

#[test]
fn test_build_resource_keeps_column_order() {
    let config = ResourceConfig::new("products", "Product");
    let resource = build_resource(&config, &products(), &TypeRegistry::mysql()).unwrap();

    assert_eq!(resource.title, "Product");
    assert_eq!(resource.path, "products");
    assert_eq!(resource.definition.name, "Product");
    let fields: Vec<(&str, &str, bool)> = resource
        .definition
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.field_type.name.as_str(), f.is_nullable))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("id", "integer", false),
            ("name", "string", false),
            ("description", "string", true),
        ]
    );
    let params: Vec<&str> = resource.get.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["limit", "offset"]);
}

#[test]
fn test_build_resource_rejects_unsupported_type() {
    let config = ResourceConfig::new("events", "Event");
    let columns = vec![
        ColumnMeta::new("id", "BIGINT", false),
        ColumnMeta::new("payload", "JSON", true),
    ];
    let err = build_resource(&config, &columns, &TypeRegistry::mysql()).unwrap_err();
    match err {
        GenerateError::UnsupportedType {
            table,
            column,
            type_name,
        } => {
            assert_eq!(table, "events");
            assert_eq!(column, "payload");
            assert_eq!(type_name, "JSON");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_build_resource_rejects_unresolved_nullability() {
    let config = ResourceConfig::new("events", "Event");
    let columns = vec![
        ColumnMeta::new("id", "BIGINT", false),
        ColumnMeta::unresolved("kind", "VARCHAR"),
    ];
    let err = build_resource(&config, &columns, &TypeRegistry::mysql()).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::UnresolvedNullability { ref column, .. } if column == "kind"
    ));
}

#[tokio::test]
async fn test_assemble_preserves_configured_order() {
    // `users` answers first, but `products` is configured first.
    let source = DelayedIntrospector::new(
        MemoryIntrospector::new()
            .with_table("products", products())
            .with_table("users", users()),
    )
    .delay("products", 50);
    let assembler = ResourceAssembler::new(source);

    let resources = assembler
        .assemble(&[
            ResourceConfig::new("products", "Product"),
            ResourceConfig::new("users", "User"),
        ])
        .await
        .unwrap();

    let titles: Vec<&str> = resources.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Product", "User"]);
}

#[tokio::test]
async fn test_assemble_empty_config() {
    let assembler = ResourceAssembler::new(MemoryIntrospector::new());
    assert!(assembler.assemble(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_assemble_fails_whole_run_on_second_table() {
    let source = MemoryIntrospector::new()
        .with_table("products", products())
        .with_table("blobs", vec![ColumnMeta::new("data", "BLOB", false)]);
    let assembler = ResourceAssembler::new(source);

    let err = assembler
        .assemble(&[
            ResourceConfig::new("products", "Product"),
            ResourceConfig::new("blobs", "Blob"),
        ])
        .await
        .unwrap_err();
    assert_eq!(err.table(), Some("blobs"));
    assert!(err.to_string().contains("BLOB"));
}

#[tokio::test]
async fn test_assemble_propagates_introspection_failure() {
    let assembler = ResourceAssembler::new(MemoryIntrospector::new());
    let err = assembler
        .assemble(&[ResourceConfig::new("missing", "Missing")])
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Introspection(_)));
    assert_eq!(err.table(), Some("missing"));
}

#[tokio::test]
async fn test_assemble_times_out() {
    let source = DelayedIntrospector::new(MemoryIntrospector::new().with_table("products", products()))
        .delay("products", 500);
    let assembler = ResourceAssembler::new(source).with_options(AssemblerOptions {
        deadline: Some(Duration::from_millis(20)),
        ..AssemblerOptions::default()
    });

    let err = assembler
        .assemble(&[ResourceConfig::new("products", "Product")])
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Timeout { ref table, .. } if table == "products"));
}

#[tokio::test]
async fn test_fail_fast_cancels_in_flight_fetches() {
    let source = DelayedIntrospector::new(
        MemoryIntrospector::new()
            .with_table("products", products())
            .with_table("blobs", vec![ColumnMeta::new("data", "BLOB", false)]),
    )
    .delay("products", 200);
    let completed = Arc::clone(&source.completed);
    let assembler = ResourceAssembler::new(source);

    let result = assembler
        .assemble(&[
            ResourceConfig::new("products", "Product"),
            ResourceConfig::new("blobs", "Blob"),
        ])
        .await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(*completed.lock().unwrap(), vec!["blobs".to_string()]);
}

#[tokio::test]
async fn test_collect_all_reports_every_failure_in_order() {
    let source = DelayedIntrospector::new(
        MemoryIntrospector::new()
            .with_table("blobs", vec![ColumnMeta::new("data", "BLOB", false)])
            .with_table("products", products())
            .with_table("docs", vec![ColumnMeta::new("body", "JSON", false)]),
    )
    .delay("blobs", 40);
    let assembler = ResourceAssembler::new(source).with_options(AssemblerOptions {
        error_mode: ErrorMode::CollectAll,
        ..AssemblerOptions::default()
    });

    let err = assembler
        .assemble(&[
            ResourceConfig::new("blobs", "Blob"),
            ResourceConfig::new("products", "Product"),
            ResourceConfig::new("docs", "Doc"),
            ResourceConfig::new("missing", "Missing"),
        ])
        .await
        .unwrap_err();

    let tables: Vec<String> = err
        .flatten()
        .iter()
        .filter_map(|e| e.table().map(str::to_string))
        .collect();
    assert_eq!(tables, vec!["blobs", "docs", "missing"]);
}

#[tokio::test]
async fn test_collect_all_single_failure_is_not_wrapped() {
    let assembler = ResourceAssembler::new(MemoryIntrospector::new().with_table("products", products()))
        .with_options(AssemblerOptions {
            error_mode: ErrorMode::CollectAll,
            ..AssemblerOptions::default()
        });
    let err = assembler
        .assemble(&[
            ResourceConfig::new("products", "Product"),
            ResourceConfig::new("missing", "Missing"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Introspection(_)));
}

#[tokio::test]
async fn test_custom_registry_is_used() {
    use crate::type_map::TypeMatcher;

    let source = MemoryIntrospector::new()
        .with_table("prices", vec![ColumnMeta::new("amount", "DECIMAL", false)]);
    let registry = TypeRegistry::mysql().with_mapping(
        TypeMatcher::exact("DECIMAL"),
        FieldType::with_format("number", "double"),
    );
    let resources = ResourceAssembler::new(source)
        .with_registry(registry)
        .assemble(&[ResourceConfig::new("prices", "Price")])
        .await
        .unwrap();
    assert_eq!(resources[0].definition.fields[0].field_type.name, "number");
}
