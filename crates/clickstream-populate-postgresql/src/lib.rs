//! PostgreSQL populator for clickstream-synth.
//!
//! Writes each generated table inside one transaction, as multi-row
//! `INSERT ... VALUES ($1, ..), (..)` statements of at most `batch_size`
//! rows. Columns use native types: `UUID`, `TIMESTAMP`, `NUMERIC(10,2)`,
//! `BIGINT` and `TEXT`.

pub mod args;
pub mod error;
pub mod insert;
pub mod populator;

pub use args::PostgreSQLPopulateArgs;
pub use error::PostgreSQLPopulatorError;
pub use insert::validate_batch_size;
pub use populator::PostgreSQLPopulator;
