//! Memo store
//!
//! Simple CRUD with an immutable creation timestamp. No derived fields,
//! no cross-table coupling.

use std::path::Path;
use tracing::warn;
use crate::database::{Database, Memo, queries, schema};
use crate::error::Result;

/// CRUD store over the `memos` table
pub struct MemoStore {
    db: Database,
}

impl MemoStore {
    /// Create a store handle without opening the database
    pub fn new(path: &Path) -> Self {
        Self {
            db: Database::new(path),
        }
    }

    /// Open the connection and ensure the `memos` table. Idempotent.
    pub fn init(&mut self) -> Result<()> {
        self.db.init()?;
        self.db.connection()?.execute(schema::CREATE_MEMOS_TABLE, [])?;
        Ok(())
    }

    /// Close the connection; a later `init()` reopens
    pub fn close(&mut self) {
        self.db.close();
    }

    /// Add a memo stamped with the current epoch seconds
    pub fn add(&self, title: &str, description: &str) -> Result<i64> {
        queries::create_memo(
            self.db.connection()?,
            title,
            description,
            queries::now_epoch_seconds(),
        )
    }

    /// Get a memo by id, `None` when absent.
    /// Storage failures degrade to `None`.
    pub fn get(&self, id: i64) -> Result<Option<Memo>> {
        let conn = self.db.connection()?;
        match queries::get_memo(conn, id) {
            Ok(memo) => Ok(memo),
            Err(err) => {
                warn!(id, error = %err, "memo lookup failed");
                Ok(None)
            }
        }
    }

    /// All memos, newest first.
    /// Storage failures degrade to an empty list.
    pub fn get_all(&self) -> Result<Vec<Memo>> {
        let conn = self.db.connection()?;
        match queries::get_all_memos(conn) {
            Ok(memos) => Ok(memos),
            Err(err) => {
                warn!(error = %err, "memo listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Update title and description; `created_at` stays untouched.
    /// Updating a nonexistent id is a no-op.
    pub fn update(&self, memo: &Memo) -> Result<()> {
        queries::update_memo(
            self.db.connection()?,
            memo.id,
            &memo.title,
            &memo.description,
        )
    }

    /// Delete a memo; no-op when absent
    pub fn remove(&self, id: i64) -> Result<()> {
        queries::delete_memo(self.db.connection()?, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use tempfile::TempDir;

    fn create_test_store() -> (MemoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut store = MemoStore::new(&temp_dir.path().join("expenses.db"));
        store.init().unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_round_trip() {
        let (store, _temp) = create_test_store();
        let before = queries::now_epoch_seconds();
        let id = store.add("Groceries", "eggs, bread").unwrap();
        let after = queries::now_epoch_seconds();

        let memo = store.get(id).unwrap().unwrap();
        assert_eq!(memo.title, "Groceries");
        assert_eq!(memo.description, "eggs, bread");
        assert!(memo.created_at >= before && memo.created_at <= after);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (store, _temp) = create_test_store();
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn test_get_all_newest_first() {
        let (store, _temp) = create_test_store();
        let conn = store.db.connection().unwrap();
        queries::create_memo(conn, "old", "", 100).unwrap();
        queries::create_memo(conn, "new", "", 200).unwrap();

        let memos = store.get_all().unwrap();
        assert_eq!(memos[0].title, "new");
        assert_eq!(memos[1].title, "old");
    }

    #[test]
    fn test_update_preserves_created_at() {
        let (store, _temp) = create_test_store();
        let id = store.add("Title", "Body").unwrap();
        let original = store.get(id).unwrap().unwrap();

        let mut edited = original.clone();
        edited.title = "Edited".to_string();
        edited.description = "New body".to_string();
        store.update(&edited).unwrap();

        let reloaded = store.get(id).unwrap().unwrap();
        assert_eq!(reloaded.title, "Edited");
        assert_eq!(reloaded.created_at, original.created_at);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (store, _temp) = create_test_store();
        let id = store.add("Title", "Body").unwrap();
        store.remove(id).unwrap();
        store.remove(id).unwrap();
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn test_fails_before_init() {
        let temp_dir = TempDir::new().unwrap();
        let store = MemoStore::new(&temp_dir.path().join("expenses.db"));
        assert!(matches!(
            store.add("t", "d"),
            Err(StoreError::NotInitialized)
        ));
    }
}
