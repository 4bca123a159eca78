//! EventSink trait definition.

use anyhow::Result;
use clickstream_core::{Row, Table};

/// Trait for persisting generated tables to a relational store.
///
/// Implementations own the connection to their backend and translate
/// [`Row`]s into driver parameters. A run has exactly one writer: callers
/// must not drive two runs against the same store concurrently.
///
/// ```ignore
/// pub async fn run<S: EventSink>(sink: &S, dataset: &Dataset) -> Result<()> {
///     sink.prepare(true).await?;
///     persist_dataset(sink, dataset).await?;
/// }
/// ```
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    /// Create every table if missing, dropping existing tables first when
    /// `drop_existing` is set.
    async fn prepare(&self, drop_existing: bool) -> Result<()>;

    /// Append all rows of one table.
    ///
    /// The write is all-or-nothing: on error no row of this call is left
    /// in the table. Returns the number of rows written.
    async fn write_table(&self, table: Table, rows: &[Row]) -> Result<u64>;

    /// Number of rows currently stored in a table.
    async fn row_count(&self, table: Table) -> Result<u64>;
}
