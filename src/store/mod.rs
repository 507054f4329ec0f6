//! Persistence adapter: mirrors parsed records into a store, keyed by natural key.
//!
//! Every write goes through [`persist`], which never fails: a rejected write yields
//! [`Persisted::Unsaved`] carrying the parsed record and the reason.

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::domain::Collection;

mod memory;
mod rows;
mod sqlite;

pub use memory::MemoryStore;
pub use rows::Persist;
pub use sqlite::SqliteStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One record flattened for an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub table: &'static str,
    pub key_column: &'static str,
    pub key: String,
    /// Non-key columns. `None` leaves an existing value untouched.
    pub columns: Vec<(&'static str, Option<String>)>,
}

/// Upsert-capable store: create the row for `row.key`, or update it in place.
pub trait RecordStore: Send + Sync {
    fn upsert<'a>(&'a self, row: Row) -> BoxFuture<'a, Result<(), StoreError>>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{table} record has no {column}")]
    MissingKey {
        table: &'static str,
        column: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Query(e.to_string())
    }
}

/// Outcome of mirroring a record into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted<T> {
    Stored(T),
    /// The store rejected the write; the parsed values are kept as-is.
    Unsaved { record: T, reason: StoreError },
}

impl<T> Persisted<T> {
    pub fn record(&self) -> &T {
        match self {
            Self::Stored(record) | Self::Unsaved { record, .. } => record,
        }
    }

    pub fn into_record(self) -> T {
        match self {
            Self::Stored(record) | Self::Unsaved { record, .. } => record,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }

    pub fn reason(&self) -> Option<&StoreError> {
        match self {
            Self::Stored(_) => None,
            Self::Unsaved { reason, .. } => Some(reason),
        }
    }
}

impl<T> AsRef<T> for Persisted<T> {
    fn as_ref(&self) -> &T {
        self.record()
    }
}

impl<T> Collection<Persisted<T>> {
    /// Parsed records, stored or not, in response order.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.iter().map(Persisted::record)
    }

    pub fn all_stored(&self) -> bool {
        self.iter().all(Persisted::is_stored)
    }
}

/// Upsert `record` by its natural key, falling back to an unsaved record on any failure.
pub async fn persist<T: Persist>(store: &dyn RecordStore, record: T) -> Persisted<T> {
    let outcome = match record.row() {
        Ok(row) => store.upsert(row).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => Persisted::Stored(record),
        Err(reason) => {
            warn!(table = T::TABLE, error = %reason, "keeping record unsaved");
            Persisted::Unsaved { record, reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{Account, User};

    use super::*;

    struct RejectingStore;

    impl RecordStore for RejectingStore {
        fn upsert<'a>(&'a self, _row: Row) -> BoxFuture<'a, Result<(), StoreError>> {
            Box::pin(async { Err(StoreError::Query("UNIQUE constraint failed".to_owned())) })
        }
    }

    fn account() -> Account {
        Account {
            account_id: "12345".to_owned(),
            account_name: "Example Shop".to_owned(),
            status: "Active".to_owned(),
            credit_balance: "100".to_owned(),
        }
    }

    #[tokio::test]
    async fn rejected_write_keeps_parsed_values() {
        let outcome = persist(&RejectingStore, account()).await;

        assert!(!outcome.is_stored());
        assert_eq!(outcome.record(), &account());
        assert_eq!(
            outcome.reason(),
            Some(&StoreError::Query("UNIQUE constraint failed".to_owned()))
        );
    }

    #[tokio::test]
    async fn missing_key_is_reported_without_writing() {
        let store = MemoryStore::new();
        let user = User {
            email: Some("ops@example.com".to_owned()),
            ..User::default()
        };

        let outcome = persist(&store, user.clone()).await;
        assert_eq!(
            outcome,
            Persisted::Unsaved {
                record: user,
                reason: StoreError::MissingKey {
                    table: "semaphore_users",
                    column: "user_id",
                },
            }
        );
        assert_eq!(store.len("semaphore_users"), 0);
    }

    #[tokio::test]
    async fn successful_write_is_stored() {
        let store = MemoryStore::new();
        let outcome = persist(&store, account()).await;
        assert!(outcome.is_stored());
        assert_eq!(outcome.into_record().account_id, "12345");
        assert_eq!(store.len("semaphore_accounts"), 1);
    }

    #[test]
    fn collection_helpers_see_through_outcomes() {
        let mut collection = Collection::new();
        collection.add(Persisted::Stored(1));
        collection.add(Persisted::Unsaved {
            record: 2,
            reason: StoreError::Poisoned,
        });

        assert_eq!(collection.records().copied().collect::<Vec<_>>(), [1, 2]);
        assert!(!collection.all_stored());
    }
}
