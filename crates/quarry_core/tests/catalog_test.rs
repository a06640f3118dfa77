//! Tests for catalog loading and connection strings.

use quarry_core::{Catalog, LimitStyle};
use serde_json::json;
use std::io::Write;

fn queries() -> serde_json::Value {
    json!({
        "connections": [
            {"name": "warehouse", "dialect": "mssql", "driver": "ODBC Driver 18", "server": "db1", "port": 1433, "database": "sales"},
            {"name": "lake", "dialect": "trino", "dsn": "LAKE"}
        ],
        "dialects": {
            "mssql": {"limit": {"style": "top", "template": "TOP {n}"}},
            "trino": {"limit": {"style": "limit", "template": "LIMIT {n} OFFSET {o}"}},
            "db2": {"limit": {"style": "fetch_first", "template": "FETCH FIRST {n} ROWS ONLY"}},
            "odd": {"limit": {"style": "sample", "template": "SAMPLE {n}"}}
        },
        "catalog": {
            "expressions": {
                "today": {"by_dialect": {"mssql": "CAST(GETDATE() AS DATE)", "trino": "current_date"}}
            }
        }
    })
}

#[test]
fn test_catalog_parses_dialects_and_expressions() {
    let catalog = Catalog::from_json_str(&queries().to_string()).unwrap();

    assert_eq!(catalog.connections().len(), 2);
    assert_eq!(catalog.default_connection_name(), "warehouse");

    let mssql = catalog.dialect("mssql").unwrap();
    assert_eq!(*mssql.limit().as_ref().unwrap().style(), LimitStyle::Top);
    let odd = catalog.dialect("odd").unwrap();
    assert_eq!(*odd.limit().as_ref().unwrap().style(), LimitStyle::Unknown);

    let today = catalog.expression("today").unwrap();
    assert_eq!(today.template_for("trino"), Some("current_date"));
    assert!(today.template_for("db2").is_none());
    assert!(today.args().is_empty());
}

#[test]
fn test_catalog_explicit_default_connection() {
    let mut doc = queries();
    doc["default_connection"] = json!("lake");
    let catalog = Catalog::from_json_str(&doc.to_string()).unwrap();
    assert_eq!(catalog.default_connection_name(), "lake");
}

#[test]
fn test_catalog_requires_connections() {
    let mut doc = queries();
    doc["connections"] = json!([]);
    let err = Catalog::from_json_str(&doc.to_string()).unwrap_err();
    assert!(err.message.contains("at least one connection"));
}

#[test]
fn test_catalog_requires_dialects() {
    let mut doc = queries();
    doc.as_object_mut().unwrap().remove("dialects");
    let err = Catalog::from_json_str(&doc.to_string()).unwrap_err();
    assert!(err.message.contains("dialects"));
}

#[test]
fn test_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", queries()).unwrap();
    let catalog = Catalog::from_file(file.path()).unwrap();
    assert!(catalog.connection("lake").is_some());
    assert!(catalog.connection("missing").is_none());
}

#[test]
fn test_catalog_missing_file_is_config_error() {
    let err = Catalog::from_file("/definitely/not/here/queries.json").unwrap_err();
    assert!(err.message.contains("Failed to read catalog file"));
}

#[test]
fn test_connection_string_with_driver_settings() {
    let catalog = Catalog::from_json_str(&queries().to_string()).unwrap();
    let conn = catalog.connection("warehouse").unwrap();
    assert_eq!(
        conn.connection_string(),
        "DRIVER=ODBC Driver 18;SERVER=db1;PORT=1433;DATABASE=sales"
    );
}

#[test]
fn test_connection_string_prefers_dsn_and_reads_credentials() {
    let doc = json!({
        "connections": [{
            "name": "lake",
            "dialect": "trino",
            "dsn": "LAKE",
            "server": "ignored",
            "user_env": "QUARRY_TEST_LAKE_USER",
            "password_env": "QUARRY_TEST_LAKE_UNSET_PASSWORD",
            "options": {"encoding": "UTF-8"}
        }],
        "dialects": {}
    });
    // SAFETY: the variable name is unique to this test.
    unsafe { std::env::set_var("QUARRY_TEST_LAKE_USER", "reporter") };
    let catalog = Catalog::from_json_str(&doc.to_string()).unwrap();
    let conn = catalog.connection("lake").unwrap();
    assert_eq!(conn.connection_string(), "DSN=LAKE;UID=reporter;CHARSET=UTF8");
}
