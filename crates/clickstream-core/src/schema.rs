//! Table definitions for the clickstream store.
//!
//! The nine tables below are the whole contract exposed to downstream
//! analytics. Sinks derive their DDL from these definitions, and records
//! flatten into rows in exactly this column order.
//!
//! ## Flush order
//!
//! [`Table::ALL`] lists tables in dependency order: every table appears
//! after the tables its foreign keys point at. Sinks create and fill tables
//! in this order and drop them in reverse.

use crate::types::ColumnType;

// ============================================================================
// Definitions
// ============================================================================

/// Column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: &'static str,

    /// Column type
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// A foreign key from one column to another table's primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references: Table,
}

/// Table definition.
///
/// The first column is always the primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    /// Table name
    pub name: &'static str,

    /// Column definitions, primary key first
    pub columns: Vec<ColumnDefinition>,

    /// Foreign keys declared on this table
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    /// The primary key column.
    pub fn primary_key(&self) -> &ColumnDefinition {
        &self.columns[0]
    }

    /// Get all column names in order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// ============================================================================
// Tables
// ============================================================================

/// The tables written by a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Products,
    Sessions,
    PageViews,
    Clicks,
    ProductViews,
    CartEvents,
    SearchEvents,
    CheckoutEvents,
}

impl Table {
    /// All tables in dependency (flush) order.
    pub const ALL: [Table; 9] = [
        Table::Users,
        Table::Products,
        Table::Sessions,
        Table::PageViews,
        Table::Clicks,
        Table::ProductViews,
        Table::CartEvents,
        Table::SearchEvents,
        Table::CheckoutEvents,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Products => "products",
            Table::Sessions => "sessions",
            Table::PageViews => "page_views",
            Table::Clicks => "clicks",
            Table::ProductViews => "product_views",
            Table::CartEvents => "cart_events",
            Table::SearchEvents => "search_events",
            Table::CheckoutEvents => "checkout_events",
        }
    }

    /// Look up a table by name.
    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Build the definition for this table.
    pub fn definition(&self) -> TableDefinition {
        use ColumnType::{BigInt, Text, Timestamp, Uuid};

        let col = ColumnDefinition::new;
        let fk = |column, references| ForeignKey { column, references };

        let (columns, foreign_keys) = match self {
            Table::Users => (
                vec![
                    col("user_id", Uuid),
                    col("first_visit_date", Timestamp),
                    col("device_type", Text),
                    col("browser", Text),
                    col("country", Text),
                    col("referrer", Text),
                ],
                vec![],
            ),
            Table::Products => (
                vec![
                    col("product_id", Uuid),
                    col("name", Text),
                    col("category", Text),
                    col("price", ColumnType::MONEY),
                    col("description", Text),
                ],
                vec![],
            ),
            Table::Sessions => (
                vec![
                    col("session_id", Uuid),
                    col("user_id", Uuid),
                    col("start_time", Timestamp),
                    col("end_time", Timestamp),
                    col("device_type", Text),
                    col("browser", Text),
                    col("conversion_status", Text),
                ],
                vec![fk("user_id", Table::Users)],
            ),
            Table::PageViews => (
                vec![
                    col("view_id", Uuid),
                    col("session_id", Uuid),
                    col("user_id", Uuid),
                    col("timestamp", Timestamp),
                    col("page_type", Text),
                    col("page_url", Text),
                    col("time_spent_seconds", BigInt),
                    col("exit_page", BigInt),
                ],
                vec![fk("session_id", Table::Sessions), fk("user_id", Table::Users)],
            ),
            Table::Clicks => (
                vec![
                    col("click_id", Uuid),
                    col("session_id", Uuid),
                    col("user_id", Uuid),
                    col("page_url", Text),
                    col("element_type", Text),
                    col("element_id", Text),
                    col("timestamp", Timestamp),
                ],
                vec![fk("session_id", Table::Sessions), fk("user_id", Table::Users)],
            ),
            Table::ProductViews => (
                vec![
                    col("view_id", Uuid),
                    col("session_id", Uuid),
                    col("user_id", Uuid),
                    col("product_id", Uuid),
                    col("timestamp", Timestamp),
                    col("time_spent_seconds", BigInt),
                ],
                vec![
                    fk("session_id", Table::Sessions),
                    fk("user_id", Table::Users),
                    fk("product_id", Table::Products),
                ],
            ),
            Table::CartEvents => (
                vec![
                    col("event_id", Uuid),
                    col("session_id", Uuid),
                    col("user_id", Uuid),
                    col("product_id", Uuid),
                    col("event_type", Text),
                    col("quantity", BigInt),
                    col("timestamp", Timestamp),
                ],
                vec![
                    fk("session_id", Table::Sessions),
                    fk("user_id", Table::Users),
                    fk("product_id", Table::Products),
                ],
            ),
            Table::SearchEvents => (
                vec![
                    col("search_id", Uuid),
                    col("session_id", Uuid),
                    col("user_id", Uuid),
                    col("query", Text),
                    col("results_count", BigInt),
                    col("timestamp", Timestamp),
                ],
                vec![fk("session_id", Table::Sessions), fk("user_id", Table::Users)],
            ),
            Table::CheckoutEvents => (
                vec![
                    col("checkout_id", Uuid),
                    col("session_id", Uuid),
                    col("user_id", Uuid),
                    col("step", Text),
                    col("status", Text),
                    col("timestamp", Timestamp),
                ],
                vec![fk("session_id", Table::Sessions), fk("user_id", Table::Users)],
            ),
        };

        TableDefinition {
            name: self.name(),
            columns,
            foreign_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("orders"), None);
    }

    #[test]
    fn test_primary_key_is_first_column() {
        let def = Table::CartEvents.definition();
        assert_eq!(def.primary_key().name, "event_id");
        assert_eq!(def.primary_key().column_type, ColumnType::Uuid);
        assert_eq!(
            def.column_names(),
            vec![
                "event_id",
                "session_id",
                "user_id",
                "product_id",
                "event_type",
                "quantity",
                "timestamp"
            ]
        );
    }

    #[test]
    fn test_foreign_keys_point_backwards_in_flush_order() {
        for (position, table) in Table::ALL.iter().enumerate() {
            for fk in table.definition().foreign_keys {
                let target = Table::ALL
                    .iter()
                    .position(|t| *t == fk.references)
                    .unwrap();
                assert!(
                    target < position,
                    "{} references {} which is flushed later",
                    table.name(),
                    fk.references.name()
                );
                assert!(table.definition().get_column(fk.column).is_some());
            }
        }
    }

    #[test]
    fn test_price_is_money() {
        let def = Table::Products.definition();
        assert_eq!(
            def.get_column("price").map(|c| c.column_type),
            Some(ColumnType::MONEY)
        );
    }
}
