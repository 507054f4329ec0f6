use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use super::{BoxFuture, RecordStore, Row, StoreError};

/// SQLite-backed store. Opening it runs the bundled migrations.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directory if it does not exist, enables WAL journal
    /// mode and sets a 5-second busy timeout.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|it| !it.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(path = %path.display(), "Database opened");

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // A single connection that is never recycled, or the database goes with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        info!("Semaphore migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Number of rows in `table`.
    pub async fn count(&self, table: &str) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote(table));
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

impl RecordStore for SqliteStore {
    fn upsert<'a>(&'a self, row: Row) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let sql = upsert_sql(&row);
            let mut query = sqlx::query(&sql).bind(row.key);
            for (_, value) in row.columns {
                query = query.bind(value);
            }
            query.execute(&self.pool).await?;
            Ok(())
        })
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// `INSERT .. ON CONFLICT(key) DO UPDATE`, keeping stored values where the new one is NULL.
fn upsert_sql(row: &Row) -> String {
    let table = quote(row.table);
    let key = quote(row.key_column);

    let columns = row
        .columns
        .iter()
        .map(|(name, _)| quote(name))
        .collect::<Vec<_>>();

    let names = std::iter::once(key.clone())
        .chain(columns.iter().cloned())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len() + 1].join(", ");

    let action = if columns.is_empty() {
        "NOTHING".to_owned()
    } else {
        let assignments = columns
            .iter()
            .map(|column| format!("{column} = COALESCE(excluded.{column}, {table}.{column})"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("UPDATE SET {assignments}")
    };

    format!(
        "INSERT INTO {table} ({names}) VALUES ({placeholders}) ON CONFLICT({key}) DO {action}"
    )
}
