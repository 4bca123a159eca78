//! Common types and utilities for clickstream populators.
//!
//! This crate provides the shared CLI arguments, the [`EventSink`] trait the
//! clickstream-populate-* crates (SQLite, PostgreSQL) implement, and the
//! per-table flush driver that writes a generated dataset through a sink.

pub mod args;
pub mod persist;
pub mod sink;

pub use args::CommonPopulateArgs;
pub use persist::{persist_dataset, prepare_sink, PersistError, PopulateMetrics, TableMetrics};
pub use sink::EventSink;
