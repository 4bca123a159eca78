//! Error types for the PostgreSQL populator.

use thiserror::Error;

/// Errors that can occur during PostgreSQL population.
#[derive(Error, Debug)]
pub enum PostgreSQLPopulatorError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// A row does not match its table definition.
    #[error("Row {row} of '{table}' has {found} values, expected {expected}")]
    RowShape {
        table: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
