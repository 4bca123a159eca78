//! Batched INSERT logic for PostgreSQL population.

use crate::error::PostgreSQLPopulatorError;
use clickstream_core::{ColumnType, Row, Table, TableDefinition, Value};
use tokio_postgres::types::ToSql;
use tokio_postgres::Transaction;

/// Default batch size for INSERT operations.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Bind parameters PostgreSQL accepts in a single statement.
pub const MAX_BIND_PARAMETERS: usize = 65_535;

/// Most rows one INSERT into `definition` can carry.
pub fn max_rows_per_insert(definition: &TableDefinition) -> usize {
    MAX_BIND_PARAMETERS / definition.columns.len().max(1)
}

/// Check that `batch_size` rows fit in one INSERT for every table.
///
/// The widest table sets the limit, so a batch size that passes here never
/// fails partway through a run after narrower tables are committed.
pub fn validate_batch_size(batch_size: usize) -> Result<usize, PostgreSQLPopulatorError> {
    if batch_size == 0 {
        return Err(PostgreSQLPopulatorError::Config(
            "batch size must be greater than zero".to_string(),
        ));
    }

    let limit = Table::ALL
        .iter()
        .map(|table| max_rows_per_insert(&table.definition()))
        .min()
        .unwrap_or(MAX_BIND_PARAMETERS);
    if batch_size > limit {
        return Err(PostgreSQLPopulatorError::Config(format!(
            "batch size {batch_size} exceeds {limit} rows, the most one INSERT can bind \
             within {MAX_BIND_PARAMETERS} parameters"
        )));
    }
    Ok(batch_size)
}

/// PostgreSQL column type for a backend-neutral column type.
pub fn postgresql_type(column_type: ColumnType) -> String {
    match column_type {
        ColumnType::Uuid => "UUID".to_string(),
        ColumnType::Text => "TEXT".to_string(),
        ColumnType::BigInt => "BIGINT".to_string(),
        ColumnType::Decimal { precision, scale } => format!("NUMERIC({precision},{scale})"),
        ColumnType::Timestamp => "TIMESTAMP".to_string(),
    }
}

/// Generate CREATE TABLE statement from a table definition.
pub fn generate_create_table(definition: &TableDefinition) -> String {
    let mut lines: Vec<String> = definition
        .columns
        .iter()
        .map(|c| format!("\"{}\" {} NOT NULL", c.name, postgresql_type(c.column_type)))
        .collect();

    lines.push(format!("PRIMARY KEY (\"{}\")", definition.primary_key().name));

    for fk in &definition.foreign_keys {
        let parent = fk.references.definition();
        lines.push(format!(
            "FOREIGN KEY (\"{}\") REFERENCES \"{}\" (\"{}\")",
            fk.column,
            parent.name,
            parent.primary_key().name
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (\n    {}\n)",
        definition.name,
        lines.join(",\n    ")
    )
}

/// Generate DROP TABLE statement.
pub fn generate_drop_table(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS \"{table_name}\"")
}

/// Generate a multi-row INSERT with `$n` placeholders for `row_count` rows.
pub fn generate_insert(definition: &TableDefinition, row_count: usize) -> String {
    let col_count = definition.columns.len();
    let mut placeholders: Vec<String> = Vec::with_capacity(row_count);
    let mut param_idx = 1;

    for _ in 0..row_count {
        let row_placeholders: Vec<String> = (0..col_count)
            .map(|_| {
                let p = format!("${param_idx}");
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO \"{}\" ({}) VALUES {}",
        definition.name,
        definition
            .columns
            .iter()
            .map(|c| format!("\"{}\"", c.name))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", ")
    )
}

/// Insert a batch of rows inside an open transaction.
pub async fn insert_batch(
    tx: &Transaction<'_>,
    definition: &TableDefinition,
    rows: &[Row],
) -> Result<u64, PostgreSQLPopulatorError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let expected = definition.columns.len();
    let mut params: Vec<Box<dyn ToSql + Sync + Send>> = Vec::with_capacity(rows.len() * expected);
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(PostgreSQLPopulatorError::RowShape {
                table: definition.name,
                row: idx,
                expected,
                found: row.len(),
            });
        }
        params.extend(row.values.iter().map(value_to_boxed));
    }

    let sql = generate_insert(definition, rows.len());
    let param_refs: Vec<&(dyn ToSql + Sync)> = params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect();

    tx.execute(&sql, &param_refs).await?;

    Ok(rows.len() as u64)
}

/// Convert a value to a boxed ToSql trait object.
fn value_to_boxed(value: &Value) -> Box<dyn ToSql + Sync + Send> {
    match value {
        Value::Uuid(u) => Box::new(*u),
        Value::Text(s) => Box::new(s.clone()),
        Value::Int(i) => Box::new(*i),
        Value::Decimal(d) => Box::new(*d),
        Value::Timestamp(ts) => Box::new(*ts),
    }
}
