//! DDL and transactional INSERT logic for SQLite population.

use crate::error::SqlitePopulatorError;
use clickstream_core::{ColumnType, Row, Table, TableDefinition, Value};
use rusqlite::types::Value as SqliteValue;
use rusqlite::{params_from_iter, Connection};
use rust_decimal::prelude::ToPrimitive;

/// SQLite column type for a backend-neutral column type.
///
/// Ids and timestamps are stored as text, timestamps in
/// `YYYY-MM-DDTHH:MM:SS` form so they sort chronologically.
pub fn sqlite_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Uuid | ColumnType::Text | ColumnType::Timestamp => "TEXT",
        ColumnType::BigInt => "INTEGER",
        ColumnType::Decimal { .. } => "REAL",
    }
}

/// Generate CREATE TABLE statement from a table definition.
pub fn generate_create_table(definition: &TableDefinition) -> String {
    let pk = definition.primary_key().name;
    let mut lines: Vec<String> = definition
        .columns
        .iter()
        .map(|c| {
            let constraint = if c.name == pk {
                " PRIMARY KEY"
            } else {
                " NOT NULL"
            };
            format!("\"{}\" {}{}", c.name, sqlite_type(c.column_type), constraint)
        })
        .collect();

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

/// Generate the single-row INSERT statement for a table.
pub fn generate_insert(definition: &TableDefinition) -> String {
    let columns = definition
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=definition.columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        definition.name, columns, placeholders
    )
}

/// Convert a value to its SQLite storage form.
pub fn to_sqlite_value(value: &Value) -> Result<SqliteValue, SqlitePopulatorError> {
    Ok(match value {
        Value::Int(i) => SqliteValue::Integer(*i),
        Value::Decimal(d) => SqliteValue::Real(
            d.to_f64()
                .ok_or_else(|| SqlitePopulatorError::Conversion(format!("decimal {d}")))?,
        ),
        Value::Uuid(_) | Value::Text(_) | Value::Timestamp(_) => {
            SqliteValue::Text(value.to_text())
        }
    })
}

/// Insert all rows of one table inside a single transaction.
///
/// Any failure rolls the whole table back.
pub fn insert_rows(
    conn: &mut Connection,
    table: Table,
    rows: &[Row],
) -> Result<u64, SqlitePopulatorError> {
    let definition = table.definition();
    let expected = definition.columns.len();
    let sql = generate_insert(&definition);

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&sql)?;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(SqlitePopulatorError::RowShape {
                    table: definition.name,
                    row: idx,
                    expected,
                    found: row.len(),
                });
            }
            let values = row
                .values
                .iter()
                .map(to_sqlite_value)
                .collect::<Result<Vec<_>, _>>()?;
            stmt.execute(params_from_iter(values))?;
        }
    }
    tx.commit()?;

    Ok(rows.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&Table::CartEvents.definition());

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"cart_events\""));
        assert!(sql.contains("\"event_id\" TEXT PRIMARY KEY"));
        assert!(sql.contains("\"quantity\" INTEGER NOT NULL"));
        assert!(sql.contains("\"timestamp\" TEXT NOT NULL"));
        assert!(sql.contains(
            "FOREIGN KEY (\"product_id\") REFERENCES \"products\" (\"product_id\")"
        ));
        assert!(sql.contains(
            "FOREIGN KEY (\"session_id\") REFERENCES \"sessions\" (\"session_id\")"
        ));
    }

    #[test]
    fn test_price_is_real() {
        let sql = generate_create_table(&Table::Products.definition());
        assert!(sql.contains("\"price\" REAL NOT NULL"));
        assert!(!sql.contains("FOREIGN KEY"));
    }

    #[test]
    fn test_generate_insert() {
        let sql = generate_insert(&Table::SearchEvents.definition());
        assert_eq!(
            sql,
            "INSERT INTO \"search_events\" (\"search_id\", \"session_id\", \"user_id\", \
             \"query\", \"results_count\", \"timestamp\") VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        );
    }

    #[test]
    fn test_generate_drop_table() {
        assert_eq!(generate_drop_table("users"), "DROP TABLE IF EXISTS \"users\"");
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(
            to_sqlite_value(&Value::Decimal(Decimal::new(1999, 2))).unwrap(),
            SqliteValue::Real(19.99)
        );
        assert_eq!(
            to_sqlite_value(&Value::Int(1)).unwrap(),
            SqliteValue::Integer(1)
        );
        assert_eq!(
            to_sqlite_value(&Value::from("homepage")).unwrap(),
            SqliteValue::Text("homepage".to_string())
        );
    }
}
