//! Column types for the clickstream tables.
//!
//! `ColumnType` is the backend-neutral type of a column. Each sink crate
//! derives its own DDL from it (SQLite `TEXT`/`REAL`, PostgreSQL
//! `UUID`/`NUMERIC`/`TIMESTAMP`, ...).

use serde::{Deserialize, Serialize};

/// Backend-neutral column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Globally unique identifier
    Uuid,

    /// Variable-length text
    Text,

    /// 64-bit signed integer
    BigInt,

    /// Exact decimal with specified precision and scale
    Decimal {
        /// Total number of digits
        precision: u8,
        /// Number of digits after the decimal point
        scale: u8,
    },

    /// Date and time without time zone
    Timestamp,
}

impl ColumnType {
    /// The money type used for prices.
    pub const MONEY: ColumnType = ColumnType::Decimal {
        precision: 10,
        scale: 2,
    };

    /// Returns true if values of this type are stored as integers.
    pub fn is_integer(&self) -> bool {
        matches!(self, ColumnType::BigInt)
    }
}
