//! CLI argument definitions for the SQLite populator.

use clap::Args;
use clickstream_populate::CommonPopulateArgs;
use std::path::PathBuf;

/// Default database file, created if missing.
pub const DEFAULT_DATABASE: &str = "ecommerce_data.db";

/// SQLite-specific populate arguments.
#[derive(Args, Clone, Debug)]
pub struct SqlitePopulateArgs {
    /// Path to the SQLite database file
    #[arg(long, env = "SQLITE_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    #[command(flatten)]
    pub common: CommonPopulateArgs,
}
