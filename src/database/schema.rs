//! Database schema definitions and default seed data

use rusqlite::Connection;
use crate::error::Result;

/// SQL to create the app config table
pub const CREATE_APP_CONFIG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS app_config (
    key             TEXT NOT NULL PRIMARY KEY,
    value           TEXT NOT NULL
)
"#;

/// SQL to create the currencies table
pub const CREATE_CURRENCIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS currencies (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    symbol          TEXT NOT NULL,
    created_at      TEXT NOT NULL
)
"#;

/// SQL to create the categories table
pub const CREATE_CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    created_at      TEXT NOT NULL
)
"#;

/// SQL to create the expense items table
pub const CREATE_EXPENSE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expense_items (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    price           REAL NOT NULL,
    quantity        INTEGER NOT NULL DEFAULT 1,
    category_id     INTEGER NOT NULL,
    currency_id     INTEGER NOT NULL,
    created_at      INTEGER NOT NULL,
    FOREIGN KEY (category_id) REFERENCES categories(id),
    FOREIGN KEY (currency_id) REFERENCES currencies(id)
)
"#;

/// SQL to create the todos table
pub const CREATE_TODOS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    description     TEXT,
    created_at      TEXT NOT NULL,
    completed       INTEGER NOT NULL DEFAULT 0,
    deadline        INTEGER
)
"#;

/// SQL to create the memos table
pub const CREATE_MEMOS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS memos (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    created_at      INTEGER NOT NULL
)
"#;

/// All table creation statements in dependency order
pub const CREATE_ALL_TABLES: &[&str] = &[
    CREATE_APP_CONFIG_TABLE,
    CREATE_CURRENCIES_TABLE,
    CREATE_CATEGORIES_TABLE,
    CREATE_EXPENSE_ITEMS_TABLE,
    CREATE_TODOS_TABLE,
    CREATE_MEMOS_TABLE,
];

/// Default expense categories, seeded once on first init.
///
/// "None" is the protected sentinel: it can never be deleted and absorbs
/// expense items whose category is removed.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "None",
    "Food",
    "Transportation",
    "Medication",
    "Cloth",
    "School",
    "Tax",
    "Other",
];

/// Default currencies as (name, symbol) pairs
pub const DEFAULT_CURRENCIES: &[(&str, &str)] = &[("US Dollar", "$")];

/// Seed the default categories with insert-or-ignore semantics keyed on
/// the unique name, so re-running init never duplicates rows.
pub fn seed_default_categories(conn: &Connection) -> Result<()> {
    for name in DEFAULT_CATEGORIES {
        conn.execute(
            "INSERT OR IGNORE INTO categories (name, created_at) VALUES (?, ?)",
            rusqlite::params![name, super::queries::now_timestamp()],
        )?;
    }
    Ok(())
}

/// Seed the default currencies with insert-or-ignore semantics
pub fn seed_default_currencies(conn: &Connection) -> Result<()> {
    for (name, symbol) in DEFAULT_CURRENCIES {
        conn.execute(
            "INSERT OR IGNORE INTO currencies (name, symbol, created_at) VALUES (?, ?, ?)",
            rusqlite::params![name, symbol, super::queries::now_timestamp()],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        for sql in CREATE_ALL_TABLES {
            conn.execute(sql, []).unwrap();
        }

        // Creation statements are idempotent
        for sql in CREATE_ALL_TABLES {
            conn.execute(sql, []).unwrap();
        }

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 6);
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        for sql in CREATE_ALL_TABLES {
            conn.execute(sql, []).unwrap();
        }

        seed_default_categories(&conn).unwrap();
        seed_default_currencies(&conn).unwrap();
        seed_default_categories(&conn).unwrap();
        seed_default_currencies(&conn).unwrap();

        let categories: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(categories, DEFAULT_CATEGORIES.len() as i64);

        let currencies: i64 = conn
            .query_row("SELECT COUNT(*) FROM currencies", [], |row| row.get(0))
            .unwrap();
        assert_eq!(currencies, DEFAULT_CURRENCIES.len() as i64);
    }

    #[test]
    fn test_protected_category_is_seeded() {
        let conn = Connection::open_in_memory().unwrap();
        for sql in CREATE_ALL_TABLES {
            conn.execute(sql, []).unwrap();
        }
        seed_default_categories(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM categories WHERE name = 'None'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
