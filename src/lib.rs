//! # PocketBook Core
//!
//! The local data store of a personal expense/todo/memo tracker.
//!
//! ## Features
//!
//! - SQLite-backed record stores with lazy, idempotent initialization
//! - Default-row seeding (categories, currencies) that never duplicates
//! - Manual referential integrity: deleting a category re-points its
//!   expense items to the protected "None" category
//! - Daily/monthly/yearly totals and month/week aggregation buckets
//! - JSON backup and restore of all tables
//!
//! ## Example
//!
//! ```no_run
//! use pbcore::{CurrencyStore, ExpenseItemStore};
//! use std::path::Path;
//!
//! let db = Path::new("/data/expenses.db");
//! let mut currencies = CurrencyStore::new(db);
//! currencies.init().unwrap();
//!
//! let mut expenses = ExpenseItemStore::new(db);
//! expenses.init().unwrap();
//!
//! let usd = currencies.get_all().unwrap()[0].id;
//! expenses.add("Coffee", 4.5, 1, 1, usd).unwrap();
//! for item in expenses.get_all().unwrap() {
//!     println!("{}: {}", item.name, item.total);
//! }
//! ```

pub mod backup;
pub mod database;
pub mod error;
pub mod stores;
pub mod utils;

// Re-export main types
pub use error::{Result, StoreError};
pub use database::models::{Currency, ExpenseCategory, ExpenseItem, Memo, TodoItem};
pub use stores::{
    AppConfigStore, CategoryStore, CurrencyStore, ExpenseItemStore, MemoStore, TodoStore,
    initialize_schema,
};
pub use utils::retry_with_delay;

/// Database filename used by the app
pub const DATABASE_FILENAME: &str = "expenses.db";

/// Config key holding the id of the selected currency
pub const SELECTED_CURRENCY_KEY: &str = "selected_currency_id";

/// Name of the protected fallback category
pub const PROTECTED_CATEGORY_NAME: &str = "None";
