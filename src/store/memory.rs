use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BoxFuture, RecordStore, Row, StoreError};

type Columns = BTreeMap<&'static str, String>;
type Table = BTreeMap<String, Columns>;

/// Process-local store with the same upsert semantics as [`super::SqliteStore`].
///
/// This is the client's default store. It grows with the number of distinct keys seen.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in `table`.
    pub fn len(&self, table: &str) -> usize {
        self.read().get(table).map_or(0, Table::len)
    }

    /// Stored columns of the row with natural key `key`, key column included.
    pub fn get(&self, table: &str, key: &str) -> Option<Columns> {
        self.read()
            .get(table)
            .and_then(|rows| rows.get(key).cloned())
    }

    // Reads look through poisoning; writes report it as `StoreError::Poisoned`.
    fn read(&self) -> MutexGuard<'_, BTreeMap<&'static str, Table>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, row: Row) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        let stored = tables
            .entry(row.table)
            .or_default()
            .entry(row.key.clone())
            .or_default();

        stored.insert(row.key_column, row.key);
        for (column, value) in row.columns {
            if let Some(value) = value {
                stored.insert(column, value);
            }
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn upsert<'a>(&'a self, row: Row) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move { self.apply(row) })
    }
}
