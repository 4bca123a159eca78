//! Synthetic e-commerce clickstream generator.
//!
//! This crate provides the `DataGenerator`, which produces a deterministic,
//! internally consistent dataset of users, products, sessions and session
//! events from a [`GenerationConfig`]. The same seed and worker count always
//! produce the same dataset.
//!
//! # Architecture
//!
//! ```text
//! GenerationConfig (YAML / CLI)
//!        │
//!        ▼
//! ┌──────────────────┐     ┌───────────────┐
//! │  DataGenerator   │◄────│  EntityPools  │  weighted catalogs
//! │                  │     └───────────────┘
//! │  master StdRng ──┼──► users, products
//! │                  │
//! │  shard StdRng ───┼──► SessionSimulator ──► JourneyWalker ──► Dataset (per shard)
//! └────────┬─────────┘
//!          │  merge shards in order, verify
//!          ▼
//!       Dataset { users, products, sessions, page_views, clicks, ... }
//! ```
//!
//! # Example
//!
//! ```rust
//! use clickstream_core::GenerationConfig;
//! use clickstream_generator::DataGenerator;
//!
//! let config = GenerationConfig::from_yaml(r#"
//! num_users: 20
//! num_sessions: 50
//! num_products: 10
//! seed: 7
//! "#).unwrap();
//!
//! let dataset = DataGenerator::new(config).unwrap().generate().unwrap();
//! assert_eq!(dataset.sessions.len(), 50);
//! ```

pub mod catalog;
pub mod dataset;
pub mod factory;
pub mod generator;
pub mod ids;
pub mod pools;
pub mod simulator;
pub mod timing;
pub mod verify;
pub mod walker;

pub use clickstream_core::GenerationConfig;

pub use catalog::{price_range, EntityPools, PriceRange};
pub use dataset::{Dataset, DatasetSummary};
pub use generator::{DataGenerator, GeneratorError};
pub use pools::{PoolError, WeightedPool};
pub use simulator::{conversion_probability, SessionPlan, SessionSimulator};
pub use verify::{verify_dataset, VerificationReport, Violation};
pub use walker::{JourneyState, JourneyWalker};
