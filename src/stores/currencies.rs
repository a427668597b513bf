//! Currency store
//!
//! Tracks the selected currency through the shared `app_config` table and
//! enforces the at-least-one-currency invariant. Deleting the selected
//! currency reassigns the selection to the alphabetically-first survivor
//! inside the same transaction, so `selected_currency_id` never points at
//! a deleted row.

use std::path::Path;
use tracing::warn;
use crate::database::{Currency, Database, queries, schema};
use crate::error::{Result, StoreError};
use crate::SELECTED_CURRENCY_KEY;

/// CRUD store over the `currencies` table plus selection state
pub struct CurrencyStore {
    db: Database,
}

impl CurrencyStore {
    /// Create a store handle without opening the database
    pub fn new(path: &Path) -> Self {
        Self {
            db: Database::new(path),
        }
    }

    /// Open the connection, ensure the `currencies` and `app_config`
    /// tables (the selection lives in the latter) and seed the default
    /// currency, all in one transaction. Idempotent.
    pub fn init(&mut self) -> Result<()> {
        self.db.init()?;
        let tx = self.db.connection_mut()?.transaction()?;
        tx.execute(schema::CREATE_CURRENCIES_TABLE, [])?;
        tx.execute(schema::CREATE_APP_CONFIG_TABLE, [])?;
        schema::seed_default_currencies(&tx)?;
        tx.commit()?;
        Ok(())
    }

    /// Close the connection; a later `init()` reopens
    pub fn close(&mut self) {
        self.db.close();
    }

    /// All currencies ordered by name.
    /// Storage failures degrade to an empty list.
    pub fn get_all(&self) -> Result<Vec<Currency>> {
        let conn = self.db.connection()?;
        match queries::get_all_currencies(conn) {
            Ok(currencies) => Ok(currencies),
            Err(err) => {
                warn!(error = %err, "currency listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Resolve the selected currency, `None` when unset or when the
    /// referenced row no longer exists.
    pub fn get_selected_currency(&self) -> Result<Option<Currency>> {
        let conn = self.db.connection()?;
        let selected_id = match queries::get_config(conn, SELECTED_CURRENCY_KEY) {
            Ok(value) => value.and_then(|s| s.parse::<i64>().ok()),
            Err(err) => {
                warn!(error = %err, "selected currency read failed");
                return Ok(None);
            }
        };
        let Some(id) = selected_id else {
            return Ok(None);
        };
        match queries::get_currency(conn, id) {
            Ok(currency) => Ok(currency),
            Err(err) => {
                warn!(id, error = %err, "selected currency lookup failed");
                Ok(None)
            }
        }
    }

    /// Mark `id` as the selected currency. No existence check at write
    /// time; callers pass ids they obtained from `get_all()`.
    pub fn set_currency(&self, id: i64) -> Result<()> {
        queries::set_config(self.db.connection()?, SELECTED_CURRENCY_KEY, &id.to_string())
    }

    /// Add a currency; a name collision fails with `DuplicateName`
    pub fn add(&self, name: &str, symbol: &str) -> Result<i64> {
        queries::create_currency(self.db.connection()?, name, symbol)
    }

    /// Remove a currency.
    ///
    /// Deleting the last remaining currency fails with `LastCurrency` and
    /// mutates nothing. Deleting the selected currency reassigns the
    /// selection to the alphabetically-first remaining row in the same
    /// transaction. Deleting a nonexistent id is a no-op.
    pub fn remove(&mut self, id: i64) -> Result<()> {
        let conn = self.db.connection_mut()?;

        if queries::get_currency(conn, id)?.is_none() {
            return Ok(());
        }
        if queries::count_currencies(conn)? <= 1 {
            return Err(StoreError::LastCurrency);
        }

        let selected = queries::get_config(conn, SELECTED_CURRENCY_KEY)?
            .and_then(|s| s.parse::<i64>().ok());
        if selected != Some(id) {
            queries::delete_currency(conn, id)?;
            return Ok(());
        }

        let tx = conn.transaction()?;
        queries::delete_currency(&tx, id)?;
        match queries::first_currency_by_name(&tx)? {
            Some(next) => {
                queries::set_config(&tx, SELECTED_CURRENCY_KEY, &next.id.to_string())?
            }
            // Unreachable given the count check above; clear rather than dangle
            None => queries::remove_config(&tx, SELECTED_CURRENCY_KEY)?,
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (CurrencyStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut store = CurrencyStore::new(&temp_dir.path().join("expenses.db"));
        store.init().unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_default_currency_seeded() {
        let (mut store, _temp) = create_test_store();
        let currencies = store.get_all().unwrap();
        assert_eq!(currencies.len(), 1);
        assert_eq!(currencies[0].name, "US Dollar");
        assert_eq!(currencies[0].symbol, "$");

        store.init().unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_selection_roundtrip() {
        let (store, _temp) = create_test_store();
        assert!(store.get_selected_currency().unwrap().is_none());

        let id = store.add("Euro", "€").unwrap();
        store.set_currency(id).unwrap();

        let selected = store.get_selected_currency().unwrap().unwrap();
        assert_eq!(selected.id, id);
        assert_eq!(selected.name, "Euro");
    }

    #[test]
    fn test_dangling_selection_resolves_to_none() {
        let (store, _temp) = create_test_store();
        store.set_currency(424242).unwrap();
        assert!(store.get_selected_currency().unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (store, _temp) = create_test_store();
        let err = store.add("US Dollar", "USD").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(name) if name == "US Dollar"));
    }

    #[test]
    fn test_last_currency_guard() {
        let (mut store, _temp) = create_test_store();
        let currencies = store.get_all().unwrap();
        assert_eq!(currencies.len(), 1);

        let err = store.remove(currencies[0].id).unwrap_err();
        assert!(matches!(err, StoreError::LastCurrency));
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_removing_selected_reassigns_selection() {
        let (mut store, _temp) = create_test_store();
        let euro = store.add("Euro", "€").unwrap();
        let yen = store.add("Yen", "¥").unwrap();
        store.set_currency(yen).unwrap();

        store.remove(yen).unwrap();

        // Alphabetically-first survivor: Euro before US Dollar
        let selected = store.get_selected_currency().unwrap().unwrap();
        assert_eq!(selected.id, euro);

        let remaining = store.get_all().unwrap();
        assert!(remaining.iter().any(|c| c.id == selected.id));
        assert!(remaining.iter().all(|c| c.id != yen));
    }

    #[test]
    fn test_removing_unselected_keeps_selection() {
        let (mut store, _temp) = create_test_store();
        let euro = store.add("Euro", "€").unwrap();
        let yen = store.add("Yen", "¥").unwrap();
        store.set_currency(euro).unwrap();

        store.remove(yen).unwrap();

        let selected = store.get_selected_currency().unwrap().unwrap();
        assert_eq!(selected.id, euro);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let (mut store, _temp) = create_test_store();
        store.remove(9999).unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);
    }
}
