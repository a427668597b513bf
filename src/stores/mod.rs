//! Record stores over the shared on-device database
//!
//! Each store owns its table(s) and its own connection handle; the
//! application's composition root constructs the stores it needs and
//! passes them to consumers. Cross-store references (expense items to
//! categories and currencies, the currency selection in app config) are
//! logical foreign keys cleaned up by the stores themselves.

pub mod app_config;
pub mod categories;
pub mod currencies;
pub mod expenses;
pub mod memos;
pub mod todos;

pub use app_config::AppConfigStore;
pub use categories::CategoryStore;
pub use currencies::CurrencyStore;
pub use expenses::ExpenseItemStore;
pub use memos::MemoStore;
pub use todos::TodoStore;

use std::path::Path;
use crate::database::schema;
use crate::error::Result;

/// Create every table and seed the default rows in one transaction.
///
/// App-boot convenience for the composition root; the per-store `init()`
/// calls remain idempotent afterwards. Callers that want the bounded
/// boot retry wrap this in [`crate::utils::retry_with_delay`].
pub fn initialize_schema(path: &Path) -> Result<()> {
    let mut conn = rusqlite::Connection::open(path)?;
    let tx = conn.transaction()?;
    for sql in schema::CREATE_ALL_TABLES {
        tx.execute(sql, [])?;
    }
    schema::seed_default_categories(&tx)?;
    schema::seed_default_currencies(&tx)?;
    tx.commit()?;
    Ok(())
}
