//! Expense item store
//!
//! CRUD plus the range and aggregate queries behind the summary screens.
//! Totals are always derived at read time from `price * quantity`, so
//! quantity edits never require a separate total-update step.

use std::collections::BTreeMap;
use std::path::Path;
use chrono::{Datelike, Local, NaiveDate, TimeZone};
use tracing::warn;
use crate::database::{Database, ExpenseItem, queries, schema};
use crate::error::Result;
use crate::utils::{day_range, month_range, year_range};

/// CRUD and aggregation store over the `expense_items` table
pub struct ExpenseItemStore {
    db: Database,
}

impl ExpenseItemStore {
    /// Create a store handle without opening the database
    pub fn new(path: &Path) -> Self {
        Self {
            db: Database::new(path),
        }
    }

    /// Open the connection and ensure the `expense_items` table. Idempotent.
    pub fn init(&mut self) -> Result<()> {
        self.db.init()?;
        self.db
            .connection()?
            .execute(schema::CREATE_EXPENSE_ITEMS_TABLE, [])?;
        Ok(())
    }

    /// Close the connection; a later `init()` reopens
    pub fn close(&mut self) {
        self.db.close();
    }

    /// Add an expense item stamped with the current epoch seconds
    pub fn add(
        &self,
        name: &str,
        price: f64,
        quantity: i64,
        category_id: i64,
        currency_id: i64,
    ) -> Result<i64> {
        self.add_at(
            name,
            price,
            quantity,
            category_id,
            currency_id,
            queries::now_epoch_seconds(),
        )
    }

    /// Add an expense item with an explicit creation time, for seeding
    /// and backup restore.
    pub fn add_at(
        &self,
        name: &str,
        price: f64,
        quantity: i64,
        category_id: i64,
        currency_id: i64,
        created_at: i64,
    ) -> Result<i64> {
        queries::create_expense_item(
            self.db.connection()?,
            name,
            price,
            quantity,
            category_id,
            currency_id,
            created_at,
        )
    }

    /// All items newest first, totals derived.
    /// Storage failures degrade to an empty list.
    pub fn get_all(&self) -> Result<Vec<ExpenseItem>> {
        let conn = self.db.connection()?;
        match queries::get_all_expense_items(conn) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(error = %err, "expense listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Items with `created_at` in the inclusive epoch-second range
    pub fn fetch_expenses_in_range(
        &self,
        start_epoch: i64,
        end_epoch: i64,
    ) -> Result<Vec<ExpenseItem>> {
        let conn = self.db.connection()?;
        match queries::get_expense_items_in_range(conn, start_epoch, end_epoch) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(start_epoch, end_epoch, error = %err, "expense range fetch failed");
                Ok(Vec::new())
            }
        }
    }

    /// Delete an item; no-op when absent
    pub fn remove(&self, id: i64) -> Result<()> {
        queries::delete_expense_item(self.db.connection()?, id)
    }

    /// Bump quantity by one in a single atomic update
    pub fn increment_quantity(&self, id: i64) -> Result<()> {
        queries::increment_quantity(self.db.connection()?, id)
    }

    /// Lower quantity by one, never below 1
    pub fn decrement_quantity(&self, id: i64) -> Result<()> {
        queries::decrement_quantity(self.db.connection()?, id)
    }

    /// Total spent on the local calendar day containing `date`
    pub fn get_daily_total_expense(&self, date: NaiveDate) -> Result<f64> {
        let (start, end) = day_range(date);
        self.sum_range(start, end)
    }

    /// Total spent in the local calendar month containing `date`
    pub fn get_monthly_total_expense(&self, date: NaiveDate) -> Result<f64> {
        let (start, end) = month_range(date);
        self.sum_range(start, end)
    }

    /// Total spent in the local calendar year containing `date`
    pub fn get_yearly_total_expense(&self, date: NaiveDate) -> Result<f64> {
        let (start, end) = year_range(date);
        self.sum_range(start, end)
    }

    /// Total spent in the current local month
    pub fn get_this_month_expense(&self) -> Result<f64> {
        self.get_monthly_total_expense(Local::now().date_naive())
    }

    /// Items created today, local time
    pub fn get_today_expense(&self) -> Result<Vec<ExpenseItem>> {
        let (start, end) = day_range(Local::now().date_naive());
        self.fetch_expenses_in_range(start, end)
    }

    /// Per-month totals for `year`, keyed "YYYY-MM" with a bucket for all
    /// twelve months. Bucketing happens client-side over a full-table scan.
    pub fn fetch_expenses_by_month(&self, year: i32) -> Result<BTreeMap<String, f64>> {
        let rows = self.scan(self.db.connection()?);
        let mut totals: BTreeMap<String, f64> = (1..=12)
            .map(|month| (format!("{year}-{month:02}"), 0.0))
            .collect();
        for (created_at, price, quantity) in rows {
            let Some(dt) = Local.timestamp_opt(created_at, 0).single() else {
                continue;
            };
            if dt.year() == year {
                let key = format!("{year}-{:02}", dt.month());
                *totals.entry(key).or_insert(0.0) += price * quantity as f64;
            }
        }
        Ok(totals)
    }

    /// Per-week totals for the given month, keyed "Week N" with
    /// `N = ceil(day-of-month / 7)`, so four or five buckets depending on
    /// month length. The split does not follow ISO weeks; it matches the
    /// chart the app renders.
    pub fn fetch_expenses_by_week(
        &self,
        year: i32,
        month: u32,
    ) -> Result<BTreeMap<String, f64>> {
        let rows = self.scan(self.db.connection()?);
        let mut totals: BTreeMap<String, f64> = NaiveDate::from_ymd_opt(year, month, 1)
            .map(crate::utils::days_in_month)
            .map(|days| {
                (1..=(days + 6) / 7)
                    .map(|week| (format!("Week {week}"), 0.0))
                    .collect()
            })
            .unwrap_or_default();
        for (created_at, price, quantity) in rows {
            let Some(dt) = Local.timestamp_opt(created_at, 0).single() else {
                continue;
            };
            if dt.year() == year && dt.month() == month {
                let week = (dt.day() + 6) / 7;
                let key = format!("Week {week}");
                *totals.entry(key).or_insert(0.0) += price * quantity as f64;
            }
        }
        Ok(totals)
    }

    /// Bulk re-point items from one category to another; used by the
    /// category deletion flow.
    pub fn update_category_for_items(
        &self,
        from_category_id: i64,
        to_category_id: i64,
    ) -> Result<usize> {
        queries::update_category_for_items(
            self.db.connection()?,
            from_category_id,
            to_category_id,
        )
    }

    /// Number of items referencing a category.
    /// Storage failures degrade to zero.
    pub fn get_item_count_by_category(&self, category_id: i64) -> Result<i64> {
        let conn = self.db.connection()?;
        match queries::count_items_by_category(conn, category_id) {
            Ok(count) => Ok(count),
            Err(err) => {
                warn!(category_id, error = %err, "category usage count failed");
                Ok(0)
            }
        }
    }

    fn sum_range(&self, start: i64, end: i64) -> Result<f64> {
        let conn = self.db.connection()?;
        match queries::sum_expense_in_range(conn, start, end) {
            Ok(total) => Ok(total),
            Err(err) => {
                warn!(start, end, error = %err, "expense total failed");
                Ok(0.0)
            }
        }
    }

    fn scan(&self, conn: &rusqlite::Connection) -> Vec<(i64, f64, i64)> {
        match queries::get_expense_scan(conn) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "expense scan failed");
                Vec::new()
            }
        }
    }
}
