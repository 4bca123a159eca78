//! SQLite populator for clickstream-synth.
//!
//! Stores the generated tables in a single SQLite file: ids and timestamps
//! as `TEXT`, prices as `REAL`, counts as `INTEGER`, with primary and
//! foreign keys enforced. Each table is written in one transaction.

pub mod args;
pub mod error;
pub mod insert;
pub mod populator;

pub use args::SqlitePopulateArgs;
pub use error::SqlitePopulatorError;
pub use populator::SqlitePopulator;
