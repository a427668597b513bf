//! SQL query operations for database access
//!
//! This module provides low-level query functions over an open connection.
//! For the initialization gate and the multi-table flows, use the store
//! types in [`crate::stores`].

use rusqlite::{Connection, params};
use chrono::{DateTime, Utc};
use crate::error::{Result, StoreError, is_unique_violation};
use super::models::{Currency, ExpenseCategory, ExpenseItem, Memo, TodoItem};

/// Timestamp format used for TEXT timestamp columns
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a DateTime for database storage
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp from database
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
}

/// Get current timestamp formatted for database
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Current time in epoch seconds
pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

// ============================================================================
// App config queries
// ============================================================================

/// Upsert a config value for `key`
pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO app_config (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Get a config value, `None` when the key is absent
pub fn get_config(conn: &Connection, key: &str) -> Result<Option<String>> {
    let result = conn.query_row(
        "SELECT value FROM app_config WHERE key = ?",
        params![key],
        |row| row.get(0),
    );
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete a config key; no-op when absent
pub fn remove_config(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM app_config WHERE key = ?", params![key])?;
    Ok(())
}

// ============================================================================
// Currency queries
// ============================================================================

fn map_currency(row: &rusqlite::Row<'_>) -> rusqlite::Result<Currency> {
    Ok(Currency {
        id: row.get(0)?,
        name: row.get(1)?,
        symbol: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Get all currencies ordered by name
pub fn get_all_currencies(conn: &Connection) -> Result<Vec<Currency>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, symbol, created_at FROM currencies ORDER BY name",
    )?;
    let currencies = stmt.query_map([], map_currency)?;
    currencies
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Get a currency by id
pub fn get_currency(conn: &Connection, id: i64) -> Result<Option<Currency>> {
    let result = conn.query_row(
        "SELECT id, name, symbol, created_at FROM currencies WHERE id = ?",
        params![id],
        map_currency,
    );
    match result {
        Ok(currency) => Ok(Some(currency)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a new currency, surfacing name collisions as `DuplicateName`
pub fn create_currency(conn: &Connection, name: &str, symbol: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO currencies (name, symbol, created_at) VALUES (?, ?, ?)",
        params![name, symbol, now_timestamp()],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::DuplicateName(name.to_string())
        } else {
            e.into()
        }
    })?;
    Ok(conn.last_insert_rowid())
}

/// Delete a currency row; returns the number of rows removed
pub fn delete_currency(conn: &Connection, id: i64) -> Result<usize> {
    let rows = conn.execute("DELETE FROM currencies WHERE id = ?", params![id])?;
    Ok(rows)
}

/// Count currency rows
pub fn count_currencies(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM currencies", [], |row| row.get(0))?;
    Ok(count)
}

/// Alphabetically-first currency, used to reassign the selection
pub fn first_currency_by_name(conn: &Connection) -> Result<Option<Currency>> {
    let result = conn.query_row(
        "SELECT id, name, symbol, created_at FROM currencies ORDER BY name LIMIT 1",
        [],
        map_currency,
    );
    match result {
        Ok(currency) => Ok(Some(currency)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Category queries
// ============================================================================

fn map_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExpenseCategory> {
    Ok(ExpenseCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Get all categories ordered by name
pub fn get_all_categories(conn: &Connection) -> Result<Vec<ExpenseCategory>> {
    let mut stmt =
        conn.prepare("SELECT id, name, created_at FROM categories ORDER BY name")?;
    let categories = stmt.query_map([], map_category)?;
    categories
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Get a category by id
pub fn get_category(conn: &Connection, id: i64) -> Result<Option<ExpenseCategory>> {
    let result = conn.query_row(
        "SELECT id, name, created_at FROM categories WHERE id = ?",
        params![id],
        map_category,
    );
    match result {
        Ok(category) => Ok(Some(category)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Get a category by its unique name
pub fn get_category_by_name(conn: &Connection, name: &str) -> Result<Option<ExpenseCategory>> {
    let result = conn.query_row(
        "SELECT id, name, created_at FROM categories WHERE name = ?",
        params![name],
        map_category,
    );
    match result {
        Ok(category) => Ok(Some(category)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a new category, surfacing name collisions as `DuplicateName`
pub fn create_category(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories (name, created_at) VALUES (?, ?)",
        params![name, now_timestamp()],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::DuplicateName(name.to_string())
        } else {
            e.into()
        }
    })?;
    Ok(conn.last_insert_rowid())
}

/// Delete a category row; returns the number of rows removed
pub fn delete_category(conn: &Connection, id: i64) -> Result<usize> {
    let rows = conn.execute("DELETE FROM categories WHERE id = ?", params![id])?;
    Ok(rows)
}

// ============================================================================
// Expense item queries
// ============================================================================

fn map_expense_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExpenseItem> {
    Ok(ExpenseItem {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        quantity: row.get(3)?,
        category_id: row.get(4)?,
        currency_id: row.get(5)?,
        created_at: row.get(6)?,
        total: 0.0,
    })
}

const EXPENSE_COLUMNS: &str =
    "id, name, price, quantity, category_id, currency_id, created_at";

/// Insert an expense item with an explicit creation time
pub fn create_expense_item(
    conn: &Connection,
    name: &str,
    price: f64,
    quantity: i64,
    category_id: i64,
    currency_id: i64,
    created_at: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO expense_items (name, price, quantity, category_id, currency_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![name, price, quantity, category_id, currency_id, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get all expense items, newest first, with totals derived
pub fn get_all_expense_items(conn: &Connection) -> Result<Vec<ExpenseItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM expense_items ORDER BY created_at DESC"
    ))?;
    let items = stmt.query_map([], map_expense_item)?;
    let items = items.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items.into_iter().map(ExpenseItem::with_total).collect())
}

/// Get expense items with `created_at` in the inclusive range, totals derived
pub fn get_expense_items_in_range(
    conn: &Connection,
    start_epoch: i64,
    end_epoch: i64,
) -> Result<Vec<ExpenseItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM expense_items WHERE created_at BETWEEN ? AND ?"
    ))?;
    let items = stmt.query_map(params![start_epoch, end_epoch], map_expense_item)?;
    let items = items.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items.into_iter().map(ExpenseItem::with_total).collect())
}

/// Sum `price * quantity` over the inclusive range
pub fn sum_expense_in_range(
    conn: &Connection,
    start_epoch: i64,
    end_epoch: i64,
) -> Result<f64> {
    let total = conn.query_row(
        "SELECT COALESCE(SUM(price * quantity), 0) FROM expense_items
         WHERE created_at BETWEEN ? AND ?",
        params![start_epoch, end_epoch],
        |row| row.get(0),
    )?;
    Ok(total)
}

/// Thin scan of (created_at, price, quantity) for client-side bucketing
pub fn get_expense_scan(conn: &Connection) -> Result<Vec<(i64, f64, i64)>> {
    let mut stmt =
        conn.prepare("SELECT created_at, price, quantity FROM expense_items")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })?;
    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Delete an expense item; no-op when absent
pub fn delete_expense_item(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM expense_items WHERE id = ?", params![id])?;
    Ok(())
}

/// Atomically bump quantity by one
pub fn increment_quantity(conn: &Connection, id: i64) -> Result<()> {
    conn.execute(
        "UPDATE expense_items SET quantity = quantity + 1 WHERE id = ?",
        params![id],
    )?;
    Ok(())
}

/// Atomically lower quantity by one, flooring at 1
pub fn decrement_quantity(conn: &Connection, id: i64) -> Result<()> {
    conn.execute(
        "UPDATE expense_items SET quantity = CASE WHEN quantity > 1 THEN quantity - 1 ELSE 1 END
         WHERE id = ?",
        params![id],
    )?;
    Ok(())
}

/// Bulk re-point items from one category to another.
/// Returns the number of items moved.
pub fn update_category_for_items(
    conn: &Connection,
    from_category_id: i64,
    to_category_id: i64,
) -> Result<usize> {
    let rows = conn.execute(
        "UPDATE expense_items SET category_id = ? WHERE category_id = ?",
        params![to_category_id, from_category_id],
    )?;
    Ok(rows)
}

/// Count items referencing a category
pub fn count_items_by_category(conn: &Connection, category_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM expense_items WHERE category_id = ?",
        params![category_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ============================================================================
// Todo queries
// ============================================================================

fn map_todo(row: &rusqlite::Row<'_>) -> rusqlite::Result<TodoItem> {
    Ok(TodoItem {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        completed: row.get::<_, i64>(4)? != 0,
        deadline: row.get(5)?,
    })
}

/// Insert a new todo with an explicit creation timestamp
pub fn create_todo(
    conn: &Connection,
    title: &str,
    description: Option<&str>,
    completed: bool,
    deadline: Option<i64>,
    created_at: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO todos (title, description, created_at, completed, deadline)
         VALUES (?, ?, ?, ?, ?)",
        params![title, description, created_at, completed as i64, deadline],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get all todos: deadlined items first ascending by deadline, then
/// null-deadline items in creation order.
pub fn get_all_todos(conn: &Connection) -> Result<Vec<TodoItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, created_at, completed, deadline FROM todos
         ORDER BY CASE WHEN deadline IS NULL THEN 1 ELSE 0 END,
                  deadline ASC, created_at ASC, id ASC",
    )?;
    let todos = stmt.query_map([], map_todo)?;
    todos
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Set the completion flag to the supplied target state
pub fn set_todo_completed(conn: &Connection, id: i64, completed: bool) -> Result<()> {
    conn.execute(
        "UPDATE todos SET completed = ? WHERE id = ?",
        params![completed as i64, id],
    )?;
    Ok(())
}

/// Delete a todo; no-op when absent
pub fn delete_todo(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM todos WHERE id = ?", params![id])?;
    Ok(())
}

/// Delete all completed todos; returns the number of rows removed
pub fn delete_completed_todos(conn: &Connection) -> Result<usize> {
    let rows = conn.execute("DELETE FROM todos WHERE completed = 1", [])?;
    Ok(rows)
}

/// Count all todos
pub fn count_todos(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?;
    Ok(count)
}

/// Count completed todos
pub fn count_completed_todos(conn: &Connection) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM todos WHERE completed = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Count todos whose deadline falls in the inclusive epoch-ms range
pub fn count_todos_with_deadline_between(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM todos WHERE deadline BETWEEN ? AND ?",
        params![start_ms, end_ms],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Count completed todos whose deadline falls in the inclusive epoch-ms range
pub fn count_completed_todos_with_deadline_between(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM todos WHERE completed = 1 AND deadline BETWEEN ? AND ?",
        params![start_ms, end_ms],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ============================================================================
// Memo queries
// ============================================================================

fn map_memo(row: &rusqlite::Row<'_>) -> rusqlite::Result<Memo> {
    Ok(Memo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Insert a new memo with an explicit creation time
pub fn create_memo(
    conn: &Connection,
    title: &str,
    description: &str,
    created_at: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO memos (title, description, created_at) VALUES (?, ?, ?)",
        params![title, description, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a memo by id
pub fn get_memo(conn: &Connection, id: i64) -> Result<Option<Memo>> {
    let result = conn.query_row(
        "SELECT id, title, description, created_at FROM memos WHERE id = ?",
        params![id],
        map_memo,
    );
    match result {
        Ok(memo) => Ok(Some(memo)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Get all memos, newest first
pub fn get_all_memos(conn: &Connection) -> Result<Vec<Memo>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, created_at FROM memos ORDER BY created_at DESC",
    )?;
    let memos = stmt.query_map([], map_memo)?;
    memos
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Update a memo's title and description; created_at stays untouched
pub fn update_memo(conn: &Connection, id: i64, title: &str, description: &str) -> Result<()> {
    conn.execute(
        "UPDATE memos SET title = ?, description = ? WHERE id = ?",
        params![title, description, id],
    )?;
    Ok(())
}

/// Delete a memo; no-op when absent
pub fn delete_memo(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM memos WHERE id = ?", params![id])?;
    Ok(())
}
