//! Database layer for PocketBook
//!
//! Handles SQLite database operations including:
//! - Schema creation and default-row seeding
//! - Low-level parameterized queries per table
//! - The per-store connection handle

pub mod models;
pub mod schema;
pub mod connection;
pub mod queries;

pub use connection::Database;
pub use models::*;
