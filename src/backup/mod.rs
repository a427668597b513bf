//! JSON backup and restore
//!
//! Serializes all tables to a single table-name-keyed document,
//! `{ "<table>": [ {row}, ... ], ... }`, and replays such a document back
//! into the database. Restore expects the schema to exist already
//! (run [`crate::stores::initialize_schema`] first).

use std::path::Path;
use rusqlite::Connection;
use serde_json::{Map, Value};
use crate::error::{Result, StoreError};

/// Tables included in a backup, parent tables before expense items so a
/// restore never inserts a child row ahead of its referenced parent.
pub const EXPORT_TABLES: &[&str] = &[
    "app_config",
    "currencies",
    "categories",
    "expense_items",
    "todos",
    "memos",
];

fn allowed_columns(table: &str) -> Option<&'static [&'static str]> {
    match table {
        "app_config" => Some(&["key", "value"]),
        "currencies" => Some(&["id", "name", "symbol", "created_at"]),
        "categories" => Some(&["id", "name", "created_at"]),
        "expense_items" => Some(&[
            "id",
            "name",
            "price",
            "quantity",
            "category_id",
            "currency_id",
            "created_at",
        ]),
        "todos" => Some(&[
            "id",
            "title",
            "description",
            "created_at",
            "completed",
            "deadline",
        ]),
        "memos" => Some(&["id", "title", "description", "created_at"]),
        _ => None,
    }
}

/// Serialize every table to a table-name-keyed JSON document
pub fn export_json(conn: &Connection) -> Result<Value> {
    let mut doc = Map::new();
    for table in EXPORT_TABLES {
        doc.insert(table.to_string(), Value::Array(export_table(conn, table)?));
    }
    Ok(Value::Object(doc))
}

/// Export the database to a pretty-printed JSON file
pub fn export_to_file(conn: &Connection, path: &Path) -> Result<()> {
    let doc = export_json(conn)?;
    std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

/// Replay a backup document inside one transaction.
///
/// Rows are inserted with insert-or-replace semantics so restoring over
/// existing data (including seeded defaults) does not duplicate rows.
pub fn import_json(conn: &mut Connection, doc: &Value) -> Result<()> {
    let obj = doc
        .as_object()
        .ok_or_else(|| StoreError::ImportError("document must be an object".to_string()))?;

    for key in obj.keys() {
        if !EXPORT_TABLES.contains(&key.as_str()) {
            return Err(StoreError::ImportError(format!("unknown table \"{key}\"")));
        }
    }

    let tx = conn.transaction()?;
    for table in EXPORT_TABLES {
        let Some(rows) = obj.get(*table) else {
            continue;
        };
        let rows = rows.as_array().ok_or_else(|| {
            StoreError::ImportError(format!("\"{table}\" must be an array of rows"))
        })?;
        for row in rows {
            insert_row(&tx, table, row)?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Restore the database from a JSON file written by [`export_to_file`]
pub fn import_from_file(conn: &mut Connection, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&contents)?;
    import_json(conn, &doc)
}

fn export_table(conn: &Connection, table: &str) -> Result<Vec<Value>> {
    // Table names come from the fixed EXPORT_TABLES list, never from input
    let mut stmt = conn.prepare(&format!("SELECT * FROM {table}"))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let rows = stmt.query_map([], |row| {
        let mut obj = Map::new();
        for (i, name) in columns.iter().enumerate() {
            obj.insert(name.clone(), value_ref_to_json(row.get_ref(i)?));
        }
        Ok(Value::Object(obj))
    })?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

fn value_ref_to_json(value: rusqlite::types::ValueRef<'_>) -> Value {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        // No table in the schema stores blobs
        ValueRef::Blob(_) => Value::Null,
    }
}

fn json_to_sql(value: &Value) -> Result<rusqlite::types::Value> {
    use rusqlite::types::Value as SqlValue;
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(*b as i64)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::Real(f))
            } else {
                Err(StoreError::ImportError(format!("unsupported number {n}")))
            }
        }
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(StoreError::ImportError(
            "nested values are not valid column data".to_string(),
        )),
    }
}

fn insert_row(conn: &Connection, table: &str, row: &Value) -> Result<()> {
    let obj = row.as_object().ok_or_else(|| {
        StoreError::ImportError(format!("rows of \"{table}\" must be objects"))
    })?;
    let allowed = allowed_columns(table)
        .ok_or_else(|| StoreError::ImportError(format!("unknown table \"{table}\"")))?;

    let mut columns = Vec::with_capacity(obj.len());
    let mut values = Vec::with_capacity(obj.len());
    for (column, value) in obj {
        if !allowed.contains(&column.as_str()) {
            return Err(StoreError::ImportError(format!(
                "unknown column \"{column}\" in table \"{table}\""
            )));
        }
        columns.push(column.as_str());
        values.push(json_to_sql(value)?);
    }
    if columns.is_empty() {
        return Ok(());
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT OR REPLACE INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );
    conn.execute(&sql, rusqlite::params_from_iter(values))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_db() -> (Connection, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.db");
        crate::stores::initialize_schema(&path).unwrap();
        (Connection::open(&path).unwrap(), temp_dir)
    }

    #[test]
    fn test_export_shape() {
        let (conn, _temp) = seeded_db();
        let doc = export_json(&conn).unwrap();
        let obj = doc.as_object().unwrap();

        for table in EXPORT_TABLES {
            assert!(obj.get(*table).unwrap().is_array(), "missing {table}");
        }

        let categories = obj["categories"].as_array().unwrap();
        assert_eq!(
            categories.len(),
            crate::database::schema::DEFAULT_CATEGORIES.len()
        );
        assert!(categories[0].get("name").unwrap().is_string());
    }

    #[test]
    fn test_round_trip() {
        let (mut conn, _temp) = seeded_db();
        conn.execute(
            "INSERT INTO expense_items (name, price, quantity, category_id, currency_id, created_at)
             VALUES ('Lunch', 12.5, 2, 1, 1, 1700000000)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO memos (title, description, created_at) VALUES ('m', 'body', 42)",
            [],
        )
        .unwrap();

        let doc = export_json(&conn).unwrap();

        // Restore into a fresh database
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("restore.db");
        crate::stores::initialize_schema(&path).unwrap();
        let mut restored = Connection::open(&path).unwrap();
        import_json(&mut restored, &doc).unwrap();

        let total: f64 = restored
            .query_row(
                "SELECT SUM(price * quantity) FROM expense_items",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(total, 25.0);

        let memo_count: i64 = restored
            .query_row("SELECT COUNT(*) FROM memos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(memo_count, 1);

        // Seeded defaults were replaced, not duplicated
        let categories: i64 = restored
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(
            categories,
            crate::database::schema::DEFAULT_CATEGORIES.len() as i64
        );
    }

    #[test]
    fn test_import_rejects_unknown_table() {
        let (mut conn, _temp) = seeded_db();
        let doc = serde_json::json!({ "evil": [] });
        let err = import_json(&mut conn, &doc).unwrap_err();
        assert!(matches!(err, StoreError::ImportError(_)));
    }

    #[test]
    fn test_import_rejects_unknown_column() {
        let (mut conn, _temp) = seeded_db();
        let doc = serde_json::json!({
            "memos": [{ "title": "x", "description": "y", "created_at": 1, "nope": 2 }]
        });
        let err = import_json(&mut conn, &doc).unwrap_err();
        assert!(matches!(err, StoreError::ImportError(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let (conn, temp) = seeded_db();
        let backup = temp.path().join("backup.json");
        export_to_file(&conn, &backup).unwrap();

        let temp2 = TempDir::new().unwrap();
        let path = temp2.path().join("expenses.db");
        crate::stores::initialize_schema(&path).unwrap();
        let mut restored = Connection::open(&path).unwrap();
        import_from_file(&mut restored, &backup).unwrap();

        let currencies: i64 = restored
            .query_row("SELECT COUNT(*) FROM currencies", [], |row| row.get(0))
            .unwrap();
        assert_eq!(currencies, 1);
    }
}
