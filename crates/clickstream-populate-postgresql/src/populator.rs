//! PostgreSQL populator.

use crate::error::PostgreSQLPopulatorError;
use crate::insert::{
    generate_create_table, generate_drop_table, insert_batch, validate_batch_size,
    DEFAULT_BATCH_SIZE,
};
use clickstream_core::{Row, Table};
use clickstream_populate::EventSink;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, info};

/// PostgreSQL populator that writes generated tables with batched
/// multi-row INSERTs.
pub struct PostgreSQLPopulator {
    client: Arc<Mutex<Client>>,
    batch_size: usize,
}

impl PostgreSQLPopulator {
    /// Create a new PostgreSQL populator.
    ///
    /// # Arguments
    ///
    /// * `connection_string` - PostgreSQL connection string (e.g., "host=localhost user=postgres password=postgres dbname=shop")
    pub async fn new(connection_string: &str) -> Result<Self, PostgreSQLPopulatorError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // Spawn the connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        // Test connection
        client.simple_query("SELECT 1").await?;

        Ok(Self::with_client(Arc::new(Mutex::new(client))))
    }

    /// Create a new PostgreSQL populator with an existing client.
    pub fn with_client(client: Arc<Mutex<Client>>) -> Self {
        Self {
            client,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the batch size for INSERT operations.
    ///
    /// Rejects zero and any size whose widest INSERT would exceed the
    /// PostgreSQL bind parameter limit.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, PostgreSQLPopulatorError> {
        self.batch_size = validate_batch_size(batch_size)?;
        Ok(self)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Drop every table, children first.
    pub async fn drop_tables(&self) -> Result<(), PostgreSQLPopulatorError> {
        let client = self.client.lock().await;
        for table in Table::ALL.iter().rev() {
            info!("Dropping table: {}", table.name());
            client.execute(&generate_drop_table(table.name()), &[]).await?;
        }
        Ok(())
    }

    /// Create every missing table, parents first.
    pub async fn create_tables(&self) -> Result<(), PostgreSQLPopulatorError> {
        let client = self.client.lock().await;
        for table in Table::ALL {
            let sql = generate_create_table(&table.definition());
            info!("Creating table: {}", table.name());
            debug!("DDL: {}", sql);
            client.execute(&sql, &[]).await?;
        }
        Ok(())
    }

    /// Insert one table's rows in `batch_size` chunks inside a single
    /// transaction.
    pub async fn insert_table(
        &self,
        table: Table,
        rows: &[Row],
    ) -> Result<u64, PostgreSQLPopulatorError> {
        let definition = table.definition();
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        info!(
            "Populating table '{}' with {} rows (batch size: {})",
            table.name(),
            rows.len(),
            self.batch_size
        );

        let mut inserted = 0;
        for (batch, chunk) in rows.chunks(self.batch_size).enumerate() {
            inserted += insert_batch(&tx, &definition, chunk).await?;
            debug!(
                "Batch {} complete: {} rows inserted, {} remaining",
                batch + 1,
                chunk.len(),
                rows.len() as u64 - inserted
            );
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Get the row count for a table.
    pub async fn count_rows(&self, table: Table) -> Result<u64, PostgreSQLPopulatorError> {
        let client = self.client.lock().await;
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", table.name());
        let row = client.query_one(&sql, &[]).await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }
}

#[async_trait::async_trait]
impl EventSink for PostgreSQLPopulator {
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

    #[tokio::test]
    async fn test_invalid_connection_string() {
        let result = PostgreSQLPopulator::new("host=localhost port=not-a-port").await;
        assert!(matches!(result, Err(PostgreSQLPopulatorError::PostgreSQL(_))));
    }
}
