//! Generic key/value config store
//!
//! Shared scalar storage for the other stores' "current selection"
//! semantics; it has no business logic of its own.

use std::path::Path;
use tracing::warn;
use crate::database::{Database, queries, schema};
use crate::error::Result;

/// Key/value store over the `app_config` table
pub struct AppConfigStore {
    db: Database,
}

impl AppConfigStore {
    /// Create a store handle without opening the database
    pub fn new(path: &Path) -> Self {
        Self {
            db: Database::new(path),
        }
    }

    /// Open the connection and ensure the `app_config` table exists.
    /// Idempotent; safe to call from multiple screens.
    pub fn init(&mut self) -> Result<()> {
        self.db.init()?;
        self.db
            .connection()?
            .execute(schema::CREATE_APP_CONFIG_TABLE, [])?;
        Ok(())
    }

    /// Close the connection; a later `init()` reopens
    pub fn close(&mut self) {
        self.db.close();
    }

    /// Upsert the value for `key`
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        queries::set_config(self.db.connection()?, key, value)
    }

    /// Get the value for `key`, `None` when absent.
    /// Storage failures degrade to `None` so UI reads stay resilient.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.db.connection()?;
        match queries::get_config(conn, key) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(key, error = %err, "config read failed");
                Ok(None)
            }
        }
    }

    /// Delete `key`; no-op when absent
    pub fn remove(&self, key: &str) -> Result<()> {
        queries::remove_config(self.db.connection()?, key)
    }
}
