//! Shared helpers: caller-side retry and local-calendar time ranges

use std::time::Duration;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use tracing::warn;
use crate::error::Result;

/// Run `op` up to `max_attempts` times with a fixed delay between attempts.
///
/// This is the caller-side companion to the store layer: screens wrap their
/// `init()`/fetch sequences in it instead of hand-rolling retry loops. The
/// stores themselves stay idempotent so retrying is safe.
pub fn retry_with_delay<T, F>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                warn!(attempt, error = %err, "operation failed, retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Epoch seconds for a local wall-clock datetime.
///
/// Ambiguous local times (DST fold) resolve to the earliest mapping;
/// nonexistent local times (DST gap) fall back to the UTC reading.
pub(crate) fn local_epoch_seconds(ndt: NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(&ndt)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| ndt.and_utc().timestamp())
}

/// Inclusive epoch-second bounds of the local calendar day containing `date`
pub(crate) fn day_range(date: NaiveDate) -> (i64, i64) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + chrono::Duration::seconds(86_399);
    (local_epoch_seconds(start), local_epoch_seconds(end))
}

/// First day of the month after the one containing `date`
fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap_or(date)
}

/// Number of days in the calendar month containing `date`
pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    (first_of_next_month(date) - first).num_days() as u32
}

/// Inclusive epoch-second bounds of the local calendar month containing `date`
pub(crate) fn month_range(date: NaiveDate) -> (i64, i64) {
    let first = date.with_day(1).unwrap_or(date);
    let start = first.and_time(NaiveTime::MIN);
    let end = first_of_next_month(date).and_time(NaiveTime::MIN) - chrono::Duration::seconds(1);
    (local_epoch_seconds(start), local_epoch_seconds(end))
}

/// Inclusive epoch-second bounds of the local calendar year containing `date`
pub(crate) fn year_range(date: NaiveDate) -> (i64, i64) {
    let year = date.year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap_or(date)
        .and_time(NaiveTime::MIN);
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .unwrap_or(date)
        .and_time(NaiveTime::MIN)
        - chrono::Duration::seconds(1);
    (local_epoch_seconds(start), local_epoch_seconds(end))
}

/// Inclusive epoch-millisecond bounds of the current local calendar day,
/// used for "due today" deadline counts.
pub(crate) fn today_range_ms() -> (i64, i64) {
    let start = Local::now().date_naive().and_time(NaiveTime::MIN);
    let start_ms = local_epoch_seconds(start) * 1000;
    (start_ms, start_ms + 86_400_000 - 1)
}
