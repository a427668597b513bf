//! Data models for PocketBook database entities

use serde::{Deserialize, Serialize};

/// Currency used for display and aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    /// Auto-assigned row id
    pub id: i64,
    /// Unique display name (e.g. "US Dollar")
    pub name: String,
    /// Display symbol (e.g. "$")
    pub symbol: String,
    /// Creation timestamp ("%Y-%m-%d %H:%M:%S")
    pub created_at: String,
}

/// Expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    /// Auto-assigned row id
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Creation timestamp ("%Y-%m-%d %H:%M:%S")
    pub created_at: String,
}

impl ExpenseCategory {
    /// Check if this is the protected fallback category
    pub fn is_protected(&self) -> bool {
        self.name == crate::PROTECTED_CATEGORY_NAME
    }
}

/// Expense line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// Auto-assigned row id
    pub id: i64,
    /// Item name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Quantity, always >= 1
    pub quantity: i64,
    /// Owning category (logical FK, cleaned up by application code)
    pub category_id: i64,
    /// Currency the price is denominated in
    pub currency_id: i64,
    /// Creation time in epoch seconds, doubles as the expense date
    pub created_at: i64,
    /// Derived `price * quantity`, recomputed on every read and never stored
    #[serde(skip)]
    pub total: f64,
}

impl ExpenseItem {
    /// Recompute the derived total from price and quantity
    pub(crate) fn with_total(mut self) -> Self {
        self.total = self.price * self.quantity as f64;
        self
    }
}

/// To-do task with an optional deadline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    /// Auto-assigned row id
    pub id: i64,
    /// Task title
    pub title: String,
    /// Free-text details
    pub description: Option<String>,
    /// Creation timestamp ("%Y-%m-%d %H:%M:%S")
    pub created_at: String,
    /// Completion flag, stored as 0/1
    pub completed: bool,
    /// Optional do-at time in epoch milliseconds
    pub deadline: Option<i64>,
}

/// Free-text memo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    /// Auto-assigned row id
    pub id: i64,
    /// Memo title
    pub title: String,
    /// Memo body
    pub description: String,
    /// Creation time in epoch seconds, immutable after creation
    pub created_at: i64,
}
