use std::fs;
use swagen::config::{normalize_dsn, Config};

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swagen.yaml");
    fs::write(
        &path,
        r#"
db:
  dsn: "reader:pw@tcp(localhost:3306)/shop"
service:
  name: Catalog
  host: api.example.com
introspect:
  max_concurrency: 8
resources:
  users:
    title: User
  order_items:
    title: Order Item
    definition:
      name: OrderItem
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.service.name, "Catalog");
    assert_eq!(config.introspect.max_concurrency, 8);
    assert_eq!(config.introspect.timeout_secs, 30);
    assert_eq!(
        config.resources.iter().map(|r| r.table.as_str()).collect::<Vec<_>>(),
        vec!["users", "order_items"]
    );
    assert_eq!(
        config.db.dsn.as_deref().map(normalize_dsn).transpose().unwrap(),
        Some("mysql://reader:pw@localhost:3306/shop".to_string())
    );
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = Config::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn test_malformed_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "service: [not, a, mapping\n").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.yaml"));
}

#[test]
fn test_service_is_required() {
    assert!(Config::from_yaml_str("resources: {}\n").is_err());
}
