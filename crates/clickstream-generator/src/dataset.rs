//! Per-run record buffers.
//!
//! A [`Dataset`] owns one append-only buffer per table. The factory and the
//! walker write into it explicitly; each session shard owns its own dataset
//! and shards are concatenated in shard order once they finish.

use clickstream_core::{
    CartEvent, CheckoutEvent, Click, PageType, PageView, Product, ProductView, Row, SearchEvent,
    Session, Table, ToRow, User,
};

/// Every record produced by one run, in emission order per table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub sessions: Vec<Session>,
    pub page_views: Vec<PageView>,
    pub clicks: Vec<Click>,
    pub product_views: Vec<ProductView>,
    pub cart_events: Vec<CartEvent>,
    pub search_events: Vec<SearchEvent>,
    pub checkout_events: Vec<CheckoutEvent>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another dataset's buffers after this one's.
    pub fn merge(&mut self, other: Dataset) {
        self.users.extend(other.users);
        self.products.extend(other.products);
        self.sessions.extend(other.sessions);
        self.page_views.extend(other.page_views);
        self.clicks.extend(other.clicks);
        self.product_views.extend(other.product_views);
        self.cart_events.extend(other.cart_events);
        self.search_events.extend(other.search_events);
        self.checkout_events.extend(other.checkout_events);
    }

    /// Number of records buffered for a table.
    pub fn len(&self, table: Table) -> usize {
        match table {
            Table::Users => self.users.len(),
            Table::Products => self.products.len(),
            Table::Sessions => self.sessions.len(),
            Table::PageViews => self.page_views.len(),
            Table::Clicks => self.clicks.len(),
            Table::ProductViews => self.product_views.len(),
            Table::CartEvents => self.cart_events.len(),
            Table::SearchEvents => self.search_events.len(),
            Table::CheckoutEvents => self.checkout_events.len(),
        }
    }

    /// Total number of records across all tables.
    pub fn total_records(&self) -> usize {
        Table::ALL.iter().map(|t| self.len(*t)).sum()
    }

    /// Flatten one table's buffer into rows, in emission order.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        fn to_rows<T: ToRow>(records: &[T]) -> Vec<Row> {
            records.iter().map(ToRow::to_row).collect()
        }

        match table {
            Table::Users => to_rows(&self.users),
            Table::Products => to_rows(&self.products),
            Table::Sessions => to_rows(&self.sessions),
            Table::PageViews => to_rows(&self.page_views),
            Table::Clicks => to_rows(&self.clicks),
            Table::ProductViews => to_rows(&self.product_views),
            Table::CartEvents => to_rows(&self.cart_events),
            Table::SearchEvents => to_rows(&self.search_events),
            Table::CheckoutEvents => to_rows(&self.checkout_events),
        }
    }

    /// Headline numbers for logging after a run.
    pub fn summary(&self) -> DatasetSummary {
        let completed_sessions = self
            .sessions
            .iter()
            .filter(|s| s.conversion_status.is_completed())
            .count();
        let confirmations = self
            .page_views
            .iter()
            .filter(|v| v.page_type == PageType::Confirmation)
            .count();

        DatasetSummary {
            table_counts: Table::ALL.iter().map(|t| (*t, self.len(*t))).collect(),
            completed_sessions,
            abandoned_sessions: self.sessions.len() - completed_sessions,
            confirmations,
        }
    }
}

/// Row counts and outcome totals for a generated dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub table_counts: Vec<(Table, usize)>,
    pub completed_sessions: usize,
    pub abandoned_sessions: usize,
    pub confirmations: usize,
}
