//! Populate command runner.

use anyhow::Context;
use clickstream_core::Table;
use clickstream_generator::{DataGenerator, Dataset};
use clickstream_populate::{
    persist_dataset, prepare_sink, CommonPopulateArgs, EventSink, PopulateMetrics,
};
use clickstream_populate_postgresql::{validate_batch_size, PostgreSQLPopulator};
use clickstream_populate_sqlite::SqlitePopulator;

use super::{mask_connection_password, PopulateTarget};

/// Run populate command to fill a store with a deterministic clickstream
pub async fn run_populate(target: PopulateTarget) -> anyhow::Result<()> {
    match target {
        PopulateTarget::Sqlite { args } => {
            let dataset = generate_dataset(&args.common)?;

            if args.common.dry_run {
                tracing::info!(
                    "[DRY-RUN] Would write {} records to SQLite database {}",
                    dataset.total_records(),
                    args.database.display()
                );
                return Ok(());
            }

            tracing::info!("Populating SQLite database {}", args.database.display());
            let sink = SqlitePopulator::open(&args.database).with_context(|| {
                format!("Failed to open SQLite database {}", args.database.display())
            })?;
            write_dataset(&sink, &dataset, args.common.drop_existing).await?;
        }
        PopulateTarget::PostgreSQL { args } => {
            validate_batch_size(args.batch_size).context("Invalid PostgreSQL batch size")?;
            let dataset = generate_dataset(&args.common)?;
            let masked = mask_connection_password(&args.postgresql_connection_string);

            if args.common.dry_run {
                tracing::info!(
                    "[DRY-RUN] Would write {} records to PostgreSQL (batch size {})",
                    dataset.total_records(),
                    args.batch_size
                );
                tracing::info!("[DRY-RUN] Connection: {}", masked);
                return Ok(());
            }

            tracing::info!("Populating PostgreSQL at {}", masked);
            let sink = PostgreSQLPopulator::new(&args.postgresql_connection_string)
                .await
                .context("Failed to connect to PostgreSQL")?
                .with_batch_size(args.batch_size)?;
            write_dataset(&sink, &dataset, args.common.drop_existing).await?;
        }
    }

    Ok(())
}

/// Resolve the generation config and build a verified dataset.
pub fn generate_dataset(common: &CommonPopulateArgs) -> anyhow::Result<Dataset> {
    let config = common
        .generation_config()
        .context("Failed to load generation config")?;

    tracing::info!(
        "Generating {} sessions for {} users over {} products ({} to {}, seed={}, workers={})",
        config.num_sessions,
        config.num_users,
        config.num_products,
        config.start_date,
        config.end_date,
        config.seed,
        config.workers
    );

    let generator = DataGenerator::new(config).context("Invalid generation config")?;
    let dataset = generator
        .generate()
        .context("Failed to generate clickstream")?;
    Ok(dataset)
}

/// Prepare the sink's tables, flush the dataset and report the stored counts.
pub async fn write_dataset<S: EventSink + ?Sized>(
    sink: &S,
    dataset: &Dataset,
    drop_existing: bool,
) -> anyhow::Result<PopulateMetrics> {
    prepare_sink(sink, drop_existing).await?;
    let metrics = persist_dataset(sink, dataset)
        .await
        .context("Populate failed; written tables are incomplete, re-run with --drop-existing")?;

    for table in Table::ALL {
        let count = sink
            .row_count(table)
            .await
            .with_context(|| format!("Failed to count rows in '{}'", table.name()))?;
        tracing::info!("  {}: {} rows", table.name(), count);
    }

    Ok(metrics)
}
