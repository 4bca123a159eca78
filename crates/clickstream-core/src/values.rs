//! Value representations handed to the sinks.
//!
//! Records are flattened into [`Row`]s of [`Value`]s in the column order of
//! their [`TableDefinition`](crate::schema::TableDefinition). Sink crates
//! convert each `Value` into their driver's native parameter type.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Timestamp format used wherever a timestamp is rendered as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UUID value
    Uuid(Uuid),

    /// String value
    Text(String),

    /// 64-bit signed integer
    Int(i64),

    /// Exact decimal
    Decimal(Decimal),

    /// Date/time without time zone
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Try to get this value as a UUID.
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a timestamp.
    pub fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Render the value as text, the way text-typed backends store it.
    pub fn to_text(&self) -> String {
        match self {
            Self::Uuid(u) => u.hyphenated().to_string(),
            Self::Text(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// A record flattened into column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Column values, primary key first.
    pub values: Vec<Value>,
}

impl Row {
    /// Create a row from its values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// The primary key value (always the first column).
    pub fn primary_key(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Flatten a record into a [`Row`] matching its table definition.
pub trait ToRow {
    fn to_row(&self) -> Row;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamp_text_is_iso8601() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 2, 9)
            .unwrap();
        assert_eq!(Value::from(ts).to_text(), "2024-03-05T14:02:09");
    }

    #[test]
    fn test_decimal_text_keeps_cents() {
        let price = Decimal::new(1999, 2);
        assert_eq!(Value::from(price).to_text(), "19.99");
    }

    #[test]
    fn test_accessors() {
        let id = Uuid::nil();
        assert_eq!(Value::from(id).as_uuid(), Some(&id));
        assert_eq!(Value::from("cart").as_str(), Some("cart"));
        assert_eq!(Value::from(3u32).as_i64(), Some(3));
        assert!(Value::from(3i64).as_str().is_none());
    }

    #[test]
    fn test_row_primary_key() {
        let row = Row::new(vec![Value::from("pk"), Value::from(1i64)]);
        assert_eq!(row.primary_key(), Some(&Value::from("pk")));
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
    }
}
