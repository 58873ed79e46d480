//! Row-to-JSON mapping for query results.
//!
//! Values keep the storage class SQLite reports for each cell, so integers
//! stay integers and text stays text after serialization.

use rusqlite::types::ValueRef;
use serde_json::{Map, Number, Value};

/// Converts one SQLite cell into a JSON value.
///
/// BLOBs become arrays of byte values; non-finite REALs become `null`.
pub(crate) fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

/// Maps a row to a column-name keyed object.
pub(crate) fn row_to_object(
    row: &rusqlite::Row<'_>,
    columns: &[String],
) -> rusqlite::Result<Map<String, Value>> {
    let mut object = Map::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        object.insert(name.clone(), value_to_json(row.get_ref(idx)?));
    }
    Ok(object)
}
