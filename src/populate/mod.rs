//! Populate command handlers.

mod logging;
mod run;

use clap::Subcommand;
use clickstream_populate_postgresql::PostgreSQLPopulateArgs;
use clickstream_populate_sqlite::SqlitePopulateArgs;

pub use logging::mask_connection_password;
pub use run::{generate_dataset, run_populate, write_dataset};

/// Storage backend to populate with a generated clickstream
#[derive(Subcommand, Debug)]
pub enum PopulateTarget {
    /// Write the clickstream to a SQLite database file
    #[command(name = "sqlite")]
    Sqlite {
        #[command(flatten)]
        args: SqlitePopulateArgs,
    },
    /// Write the clickstream to a PostgreSQL database
    #[command(name = "postgresql")]
    PostgreSQL {
        #[command(flatten)]
        args: PostgreSQLPopulateArgs,
    },
}
