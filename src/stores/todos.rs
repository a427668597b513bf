//! Todo store
//!
//! Tasks with an optional deadline in epoch milliseconds. Listing puts
//! deadlined tasks first in deadline order; tasks without a deadline come
//! last in creation order.

use std::path::Path;
use tracing::warn;
use crate::database::{Database, TodoItem, queries, schema};
use crate::error::Result;
use crate::utils::today_range_ms;

/// CRUD store over the `todos` table
pub struct TodoStore {
    db: Database,
}

impl TodoStore {
    /// Create a store handle without opening the database
    pub fn new(path: &Path) -> Self {
        Self {
            db: Database::new(path),
        }
    }

    /// Open the connection and ensure the `todos` table. Idempotent.
    pub fn init(&mut self) -> Result<()> {
        self.db.init()?;
        self.db.connection()?.execute(schema::CREATE_TODOS_TABLE, [])?;
        Ok(())
    }

    /// Close the connection; a later `init()` reopens
    pub fn close(&mut self) {
        self.db.close();
    }

    /// Add a todo stamped with the current creation timestamp
    pub fn add(
        &self,
        title: &str,
        description: Option<&str>,
        completed: bool,
        deadline: Option<i64>,
    ) -> Result<i64> {
        queries::create_todo(
            self.db.connection()?,
            title,
            description,
            completed,
            deadline,
            &queries::now_timestamp(),
        )
    }

    /// All todos in deadline order, null deadlines last.
    /// Storage failures degrade to an empty list.
    pub fn get_all(&self) -> Result<Vec<TodoItem>> {
        let conn = self.db.connection()?;
        match queries::get_all_todos(conn) {
            Ok(todos) => Ok(todos),
            Err(err) => {
                warn!(error = %err, "todo listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Set the completion flag to `completed`. Callers pass the target
    /// state; this is not a read-then-flip toggle.
    pub fn set_completed(&self, id: i64, completed: bool) -> Result<()> {
        queries::set_todo_completed(self.db.connection()?, id, completed)
    }

    /// Delete a todo; no-op when absent
    pub fn remove(&self, id: i64) -> Result<()> {
        queries::delete_todo(self.db.connection()?, id)
    }

    /// Delete all completed todos; returns the number removed
    pub fn remove_completed(&self) -> Result<usize> {
        queries::delete_completed_todos(self.db.connection()?)
    }

    /// Count of completed todos. Storage failures degrade to zero.
    pub fn get_completed_count(&self) -> Result<i64> {
        self.degraded_count(queries::count_completed_todos(self.db.connection()?))
    }

    /// Count of all todos. Storage failures degrade to zero.
    pub fn get_total_count(&self) -> Result<i64> {
        self.degraded_count(queries::count_todos(self.db.connection()?))
    }

    /// Todos whose deadline falls within the current local calendar day
    pub fn get_todays_tasks_count(&self) -> Result<i64> {
        let (start_ms, end_ms) = today_range_ms();
        self.degraded_count(queries::count_todos_with_deadline_between(
            self.db.connection()?,
            start_ms,
            end_ms,
        ))
    }

    /// Completed todos whose deadline falls within the current local day
    pub fn get_todays_completed_tasks_count(&self) -> Result<i64> {
        let (start_ms, end_ms) = today_range_ms();
        self.degraded_count(queries::count_completed_todos_with_deadline_between(
            self.db.connection()?,
            start_ms,
            end_ms,
        ))
    }

    fn degraded_count(&self, result: Result<i64>) -> Result<i64> {
        match result {
            Ok(count) => Ok(count),
            Err(err) => {
                warn!(error = %err, "todo count failed");
                Ok(0)
            }
        }
    }
}
