//! Error types for the SQLite populator.

use thiserror::Error;

/// Errors that can occur during SQLite population.
#[derive(Error, Debug)]
pub enum SqlitePopulatorError {
    /// SQLite open, DDL or query error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row does not match its table definition.
    #[error("Row {row} of '{table}' has {found} values, expected {expected}")]
    RowShape {
        table: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A value cannot be represented in SQLite.
    #[error("Cannot store value in SQLite: {0}")]
    Conversion(String),

    /// The blocking task running a statement panicked or was cancelled.
    #[error("SQLite task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
