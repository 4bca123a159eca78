//! SQLite populator.

use crate::error::SqlitePopulatorError;
use crate::insert::{generate_create_table, generate_drop_table, insert_rows};
use clickstream_core::{Row, Table};
use clickstream_populate::EventSink;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// SQLite populator that stores generated tables in one database file.
///
/// Foreign keys are enforced, so tables must be written parents first.
/// rusqlite calls block, so every statement runs on tokio's blocking pool.
pub struct SqlitePopulator {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePopulator {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqlitePopulatorError> {
        let conn = Connection::open(path.as_ref())?;
        info!("Opened SQLite database {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqlitePopulatorError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection.
    pub fn with_connection(conn: Connection) -> Result<Self, SqlitePopulatorError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, SqlitePopulatorError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, SqlitePopulatorError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            f(&mut *conn)
        })
        .await?
    }

    /// Drop every table, children first.
    pub async fn drop_tables(&self) -> Result<(), SqlitePopulatorError> {
        self.with_conn(|conn| {
            for table in Table::ALL.iter().rev() {
                info!("Dropping table: {}", table.name());
                conn.execute(&generate_drop_table(table.name()), [])?;
            }
            Ok(())
        })
        .await
    }

    /// Create every missing table, parents first.
    pub async fn create_tables(&self) -> Result<(), SqlitePopulatorError> {
        self.with_conn(|conn| {
            for table in Table::ALL {
                let sql = generate_create_table(&table.definition());
                debug!("DDL: {}", sql);
                conn.execute(&sql, [])?;
            }
            Ok(())
        })
        .await
    }

    /// Insert one table's rows in a single transaction.
    pub async fn insert_table(
        &self,
        table: Table,
        rows: &[Row],
    ) -> Result<u64, SqlitePopulatorError> {
        let rows = rows.to_vec();
        let inserted = self
            .with_conn(move |conn| insert_rows(conn, table, &rows))
            .await?;
        info!("Inserted {} rows into '{}'", inserted, table.name());
        Ok(inserted)
    }

    /// Get the row count for a table.
    pub async fn count_rows(&self, table: Table) -> Result<u64, SqlitePopulatorError> {
        self.with_conn(move |conn| {
            let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.name());
            let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}

#[async_trait::async_trait]
impl EventSink for SqlitePopulator {
    async fn prepare(&self, drop_existing: bool) -> anyhow::Result<()> {
        if drop_existing {
            self.drop_tables().await?;
        }
        self.create_tables().await?;
        Ok(())
    }

    async fn write_table(&self, table: Table, rows: &[Row]) -> anyhow::Result<u64> {
        Ok(self.insert_table(table, rows).await?)
    }

    async fn row_count(&self, table: Table) -> anyhow::Result<u64> {
        Ok(self.count_rows(table).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clickstream_core::{GenerationConfig, Value};
    use clickstream_generator::{DataGenerator, Dataset};
    use clickstream_populate::{persist_dataset, PersistError};

    fn dataset() -> Dataset {
        let config = GenerationConfig {
            num_users: 20,
            num_sessions: 50,
            num_products: 10,
            ..Default::default()
        };
        DataGenerator::new(config).unwrap().generate().unwrap()
    }

    async fn prepared() -> SqlitePopulator {
        let sink = SqlitePopulator::open_in_memory().unwrap();
        sink.prepare(false).await.unwrap();
        sink
    }

    #[tokio::test]
    async fn test_persist_generated_dataset() {
        let sink = prepared().await;
        let dataset = dataset();

        let metrics = persist_dataset(&sink, &dataset).await.unwrap();
        assert_eq!(metrics.rows_inserted as usize, dataset.total_records());

        for table in Table::ALL {
            assert_eq!(
                sink.row_count(table).await.unwrap() as usize,
                dataset.len(table),
                "{}",
                table.name()
            );
        }
    }

    #[tokio::test]
    async fn test_duplicate_key_rolls_back_table() {
        let sink = prepared().await;
        let dataset = dataset();
        let mut rows = dataset.rows(Table::Users);
        rows.push(rows[0].clone());

        let result = sink.write_table(Table::Users, &rows).await;
        assert!(result.is_err());
        assert_eq!(sink.row_count(Table::Users).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let sink = prepared().await;
        let dataset = dataset();

        let err = persist_dataset(&sink, &Dataset {
            users: Vec::new(),
            ..dataset
        })
        .await
        .unwrap_err();
        assert!(matches!(err, PersistError::Write { table: "sessions", .. }));
        assert_eq!(sink.row_count(Table::Sessions).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_row_shape_is_checked() {
        let sink = prepared().await;
        let row = Row::new(vec![Value::from("only-one-column")]);

        let err = sink.insert_table(Table::Users, &[row]).await.unwrap_err();
        assert!(matches!(err, SqlitePopulatorError::RowShape { expected: 6, found: 1, .. }));
    }

    #[tokio::test]
    async fn test_drop_existing_recreates_tables() {
        let sink = prepared().await;
        let dataset = dataset();
        persist_dataset(&sink, &dataset).await.unwrap();

        sink.prepare(true).await.unwrap();
        for table in Table::ALL {
            assert_eq!(sink.row_count(table).await.unwrap(), 0);
        }

        // Without dropping, a second run collides on primary keys
        persist_dataset(&sink, &dataset).await.unwrap();
        sink.prepare(false).await.unwrap();
        assert!(persist_dataset(&sink, &dataset).await.is_err());
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clickstream.db");

        let sink = SqlitePopulator::open(&path).unwrap();
        sink.prepare(false).await.unwrap();
        persist_dataset(&sink, &dataset()).await.unwrap();
        drop(sink);

        let reopened = SqlitePopulator::open(&path).unwrap();
        assert_eq!(reopened.row_count(Table::Users).await.unwrap(), 20);
        assert!(path.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_spawned_writers_share_one_connection() {
        let sink = Arc::new(prepared().await);
        let dataset = dataset();
        let users = dataset.rows(Table::Users);
        let products = dataset.rows(Table::Products);

        let (users_written, products_written) = tokio::join!(
            tokio::spawn({
                let sink = Arc::clone(&sink);
                async move { sink.insert_table(Table::Users, &users).await }
            }),
            tokio::spawn({
                let sink = Arc::clone(&sink);
                async move { sink.insert_table(Table::Products, &products).await }
            }),
        );

        assert_eq!(users_written.unwrap().unwrap(), 20);
        assert_eq!(products_written.unwrap().unwrap(), 10);
        assert_eq!(sink.count_rows(Table::Users).await.unwrap(), 20);
        assert_eq!(sink.count_rows(Table::Products).await.unwrap(), 10);
    }
}
