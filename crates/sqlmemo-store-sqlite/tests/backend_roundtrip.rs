//! Round-trip integration tests for `SqliteBackend`.

use rusqlite::params;
use serde_json::{json, Value};

use sqlmemo_store_sqlite::SqliteBackend;
use sqlmemo_types::ToolName;

const CREATE_T: &str = "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL)";

fn backend_with_table() -> SqliteBackend {
    let backend = SqliteBackend::open_in_memory().expect("open");
    backend.call(ToolName::CreateTable, CREATE_T).expect("create");
    backend
}

#[test]
fn create_insert_select_roundtrip() {
    let backend = backend_with_table();
    let inserted = backend
        .call(ToolName::WriteQuery, "INSERT INTO t (name) VALUES ('x'),('y')")
        .expect("insert");
    assert_eq!(inserted, "Affected rows: 2");

    let text = backend
        .call(ToolName::ReadQuery, "SELECT * FROM t")
        .expect("select");
    let rows: Vec<Value> = serde_json::from_str(&text).expect("rows json");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "x");
    assert_eq!(rows[1]["name"], "y");
    assert_eq!(rows[0]["id"], 1);
}

fn names(backend: &SqliteBackend) -> Vec<String> {
    backend
        .execute_query("SELECT name FROM t ORDER BY id", [])
        .expect("rows")
        .into_iter()
        .map(|row| row["name"].as_str().expect("text").to_string())
        .collect()
}

#[test]
fn write_query_runs_every_statement() {
    let backend = backend_with_table();
    let text = backend
        .call(
            ToolName::WriteQuery,
            "INSERT INTO t (name) VALUES ('a'); INSERT INTO t (name) VALUES ('b');",
        )
        .expect("insert");
    assert_eq!(text, "Affected rows: 2");
    assert_eq!(names(&backend), vec!["a", "b"]);
}

#[test]
fn write_query_accepts_returning() {
    let backend = backend_with_table();
    let text = backend
        .call(
            ToolName::WriteQuery,
            "INSERT INTO t (name) VALUES ('x') RETURNING id",
        )
        .expect("insert returning");
    assert_eq!(text, "Affected rows: 1");
    assert_eq!(names(&backend), vec!["x"]);
}

#[test]
fn write_query_failure_keeps_earlier_statements() {
    let backend = backend_with_table();
    let err = backend
        .call(
            ToolName::WriteQuery,
            "INSERT INTO t (name) VALUES ('a'); INSERT INTO missing VALUES (1)",
        )
        .unwrap_err();
    assert!(err.to_string().contains("no such table: missing"));
    assert_eq!(names(&backend), vec!["a"]);
}

#[test]
fn update_reports_changed_rows_only() {
    let backend = backend_with_table();
    backend
        .call(ToolName::WriteQuery, "INSERT INTO t (name) VALUES ('a'),('b'),('c')")
        .expect("insert");
    let text = backend
        .call(ToolName::WriteQuery, "UPDATE t SET name = 'z' WHERE name <> 'a'")
        .expect("update");
    assert_eq!(text, "Affected rows: 2");
}

#[test]
fn bound_parameters_on_direct_calls() {
    let backend = backend_with_table();
    backend
        .execute_write(
            "INSERT INTO t (name) VALUES (?1), (?2)",
            params!["test1", "test2"],
        )
        .expect("insert");
    let rows = backend
        .execute_query("SELECT * FROM t WHERE name = ?1", ["test2"])
        .expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "test2");
}

#[test]
fn create_table_reports_success_text() {
    let backend = SqliteBackend::open_in_memory().expect("open");
    let text = backend
        .call(ToolName::CreateTable, "  create table notes (body TEXT)")
        .expect("create");
    assert_eq!(text, "Table created successfully");
}

#[test]
fn describe_table_returns_first_column() {
    let backend = backend_with_table();
    let text = backend
        .call(ToolName::DescribeTable, "t")
        .expect("describe");
    let descriptor: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(
        descriptor,
        json!({"cid":0,"dflt_value":null,"name":"id","notnull":0,"pk":1,"type":"INTEGER"})
    );
}

#[test]
fn describe_missing_table_is_not_found() {
    let backend = SqliteBackend::open_in_memory().expect("open");
    let err = backend.call(ToolName::DescribeTable, "ghost").unwrap_err();
    assert!(err.to_string().contains("table not found: ghost"));
}

#[test]
fn list_tables_in_catalog_order() {
    let backend = SqliteBackend::open_in_memory().expect("open");
    backend
        .call(ToolName::CreateTable, "CREATE TABLE a (x INTEGER)")
        .expect("a");
    backend
        .call(ToolName::CreateTable, "CREATE TABLE b (y INTEGER)")
        .expect("b");
    let text = backend.call(ToolName::ListTables, "").expect("list");
    assert_eq!(text, "a, b");
    assert_eq!(backend.list_tables().expect("names"), vec!["a", "b"]);
}

#[test]
fn list_tables_on_empty_database_is_empty() {
    let backend = SqliteBackend::open_in_memory().expect("open");
    assert_eq!(backend.call(ToolName::ListTables, "").expect("list"), "");
}

#[test]
fn storage_classes_survive_serialization() {
    let backend = SqliteBackend::open_in_memory().expect("open");
    backend
        .execute_write("CREATE TABLE v (i INTEGER, r REAL, s TEXT, b BLOB, n)", [])
        .expect("create");
    backend
        .execute_write(
            "INSERT INTO v VALUES (42, 2.5, 'txt', x'0102ff', NULL)",
            [],
        )
        .expect("insert");
    let rows = backend.execute_query("SELECT * FROM v", []).expect("rows");
    let row = &rows[0];
    assert_eq!(row["i"], json!(42));
    assert_eq!(row["r"], json!(2.5));
    assert_eq!(row["s"], json!("txt"));
    assert_eq!(row["b"], json!([1, 2, 255]));
    assert_eq!(row["n"], Value::Null);
}

#[test]
fn data_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("memo.db");
    let path = path.to_str().expect("utf8");

    let backend = SqliteBackend::open(path).expect("open");
    backend.call(ToolName::CreateTable, CREATE_T).expect("create");
    backend
        .call(ToolName::WriteQuery, "INSERT INTO t (name) VALUES ('kept')")
        .expect("insert");
    backend.close().expect("close");

    let reopened = SqliteBackend::open(path).expect("reopen");
    let text = reopened
        .call(ToolName::ReadQuery, "SELECT name FROM t")
        .expect("select");
    assert_eq!(text, r#"[{"name":"kept"}]"#);
}

#[test]
fn open_in_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("no/such/dir/memo.db");
    let result = SqliteBackend::open(path.to_str().expect("utf8"));
    assert!(result.is_err());
}
