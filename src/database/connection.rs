//! Database connection management
//!
//! Each store owns one [`Database`] handle to the shared on-device file.
//! The handle opens lazily on `init()` and every operation before that
//! fails fast with [`StoreError::NotInitialized`].

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use crate::error::{Result, StoreError};

/// Database connection wrapper with lazy, idempotent initialization
pub struct Database {
    /// Path to the database file
    path: PathBuf,
    /// SQLite connection, `None` until `init()` or after `close()`
    conn: Option<Connection>,
}

impl Database {
    /// Create a handle for the database at `path` without opening it
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            conn: None,
        }
    }

    /// Open the connection if not already open.
    ///
    /// Safe to call repeatedly; a second call after a successful open is a
    /// no-op, so overlapping screens can both issue `init()`.
    pub fn init(&mut self) -> Result<()> {
        if self.conn.is_none() {
            self.conn = Some(Connection::open(&self.path)?);
        }
        Ok(())
    }

    /// Get a reference to the connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotInitialized)
    }

    /// Get a mutable reference to the connection (for transactions)
    pub fn connection_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(StoreError::NotInitialized)
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection and reset state so a later `init()` reopens
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Check if the connection is open
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}
