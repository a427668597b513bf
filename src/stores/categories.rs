//! Expense category store
//!
//! Enforces the protected "None" sentinel: it can never be deleted and
//! absorbs expense items whose category is removed. The reassign-then-delete
//! flow runs inside a single transaction so a failure midway leaves both
//! tables untouched.

use std::path::Path;
use tracing::{debug, warn};
use crate::database::{Database, ExpenseCategory, queries, schema};
use crate::error::{Result, StoreError};
use crate::PROTECTED_CATEGORY_NAME;

/// CRUD store over the `categories` table
pub struct CategoryStore {
    db: Database,
}

impl CategoryStore {
    /// Create a store handle without opening the database
    pub fn new(path: &Path) -> Self {
        Self {
            db: Database::new(path),
        }
    }

    /// Open the connection, ensure the tables the deletion flow touches,
    /// and seed the default categories. Table creation and seeding run in
    /// one transaction; re-running never duplicates or overwrites rows.
    pub fn init(&mut self) -> Result<()> {
        self.db.init()?;
        let tx = self.db.connection_mut()?.transaction()?;
        tx.execute(schema::CREATE_CATEGORIES_TABLE, [])?;
        // The removal flow re-points expense items, so their table must exist
        tx.execute(schema::CREATE_EXPENSE_ITEMS_TABLE, [])?;
        schema::seed_default_categories(&tx)?;
        tx.commit()?;
        Ok(())
    }

    /// Close the connection; a later `init()` reopens
    pub fn close(&mut self) {
        self.db.close();
    }

    /// All categories ordered by name.
    /// Storage failures degrade to an empty list.
    pub fn get_all(&self) -> Result<Vec<ExpenseCategory>> {
        let conn = self.db.connection()?;
        match queries::get_all_categories(conn) {
            Ok(categories) => Ok(categories),
            Err(err) => {
                warn!(error = %err, "category listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Add a category; a name collision fails with `DuplicateName`
    pub fn add(&self, name: &str) -> Result<i64> {
        queries::create_category(self.db.connection()?, name)
    }

    /// True unless `id` is the protected "None" category
    pub fn can_delete(&self, id: i64) -> Result<bool> {
        let conn = self.db.connection()?;
        match queries::get_category(conn, id)? {
            Some(category) => Ok(!category.is_protected()),
            None => Ok(true),
        }
    }

    /// Remove a category, re-pointing its expense items to "None" first.
    ///
    /// Deleting the protected category fails with `ProtectedCategory` and
    /// mutates nothing. Deleting a nonexistent id is a no-op.
    pub fn remove(&mut self, id: i64) -> Result<()> {
        let conn = self.db.connection_mut()?;

        let Some(category) = queries::get_category(conn, id)? else {
            return Ok(());
        };
        if category.is_protected() {
            return Err(StoreError::ProtectedCategory);
        }

        // Seeded invariant: the fallback row must exist
        let fallback = queries::get_category_by_name(conn, PROTECTED_CATEGORY_NAME)?
            .ok_or_else(|| {
                StoreError::DatabaseError(
                    "protected \"None\" category missing".to_string(),
                )
            })?;

        let tx = conn.transaction()?;
        let moved = queries::update_category_for_items(&tx, id, fallback.id)?;
        queries::delete_category(&tx, id)?;
        tx.commit()?;

        debug!(id, moved, "category removed, expense items reassigned");
        Ok(())
    }
}
