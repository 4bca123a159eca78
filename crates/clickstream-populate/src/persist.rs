//! Per-table flush of a generated dataset.

use crate::sink::EventSink;
use clickstream_core::Table;
use clickstream_generator::Dataset;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Error type for persisting a dataset.
///
/// Tables written before the failing one stay in the store; the caller
/// should treat the whole store as invalid and re-run against a clean one.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Creating or dropping tables failed
    #[error("Failed to prepare tables: {0}")]
    Prepare(#[source] anyhow::Error),

    /// Writing one table failed; that table was rolled back
    #[error("Failed to write table '{table}': {source}")]
    Write {
        table: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Metrics for one table's flush.
#[derive(Debug, Clone)]
pub struct TableMetrics {
    pub table: Table,
    pub rows_inserted: u64,
    pub duration: Duration,
}

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of rows inserted across all tables.
    pub rows_inserted: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Per-table breakdown, in flush order.
    pub tables: Vec<TableMetrics>,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_inserted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Prepare the sink's tables.
pub async fn prepare_sink<S: EventSink + ?Sized>(
    sink: &S,
    drop_existing: bool,
) -> Result<(), PersistError> {
    sink.prepare(drop_existing)
        .await
        .map_err(PersistError::Prepare)
}

/// Write every table of `dataset`, parents before children.
///
/// Each table is one atomic write. Writing stops at the first failing
/// table.
pub async fn persist_dataset<S: EventSink + ?Sized>(
    sink: &S,
    dataset: &Dataset,
) -> Result<PopulateMetrics, PersistError> {
    let start_time = Instant::now();
    let mut metrics = PopulateMetrics::default();

    for table in Table::ALL {
        let rows = dataset.rows(table);
        let table_start = Instant::now();

        let inserted = sink
            .write_table(table, &rows)
            .await
            .map_err(|source| PersistError::Write {
                table: table.name(),
                source,
            })?;

        let duration = table_start.elapsed();
        debug!("Wrote {} rows to '{}' in {:?}", inserted, table.name(), duration);

        metrics.rows_inserted += inserted;
        metrics.tables.push(TableMetrics {
            table,
            rows_inserted: inserted,
            duration,
        });
    }

    metrics.total_duration = start_time.elapsed();
    info!(
        "Population complete: {} rows in {:?} ({:.2} rows/sec)",
        metrics.rows_inserted,
        metrics.total_duration,
        metrics.rows_per_second()
    );

    Ok(metrics)
}
