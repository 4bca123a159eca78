//! Core types for clickstream-synth.
//!
//! This crate provides the foundational types shared by the generator and
//! the sinks:
//!
//! - [`records`] - users, products, sessions and the six event records
//! - [`Table`] / [`TableDefinition`] - the relational contract
//! - [`Value`] / [`Row`] - backend-neutral rows handed to sinks
//! - [`GenerationConfig`] - run configuration loaded from YAML or CLI flags
//!
//! # Architecture
//!
//! ```text
//! clickstream-core (this crate)
//!    │
//!    ├─── clickstream-generator          (produces records)
//!    │
//!    ├─── clickstream-populate           (EventSink trait, flush driver)
//!    ├─── clickstream-populate-sqlite    (Value -> rusqlite params)
//!    └─── clickstream-populate-postgresql (Value -> tokio-postgres params)
//! ```

pub mod config;
pub mod records;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use config::{ConfigError, GenerationConfig, GenerationWindow, SessionBoundary};
pub use records::{
    Browser, CartEvent, CartEventType, Category, CheckoutEvent, CheckoutStatus, CheckoutStep,
    Click, ConversionStatus, DeviceType, ElementType, PageType, PageView, Product, ProductView,
    SearchEvent, Session, User,
};
pub use schema::{ColumnDefinition, ForeignKey, Table, TableDefinition};
pub use types::ColumnType;
pub use values::{Row, ToRow, Value, TIMESTAMP_FORMAT};
