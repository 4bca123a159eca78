//! Command-line interface for clickstream-synth
//!
//! # Usage Examples
//!
//! ```bash
//! # Populate SQLite from a YAML config, overriding the seed
//! clickstream-synth populate sqlite \
//!   --database ecommerce_data.db \
//!   --config clickstream.yaml \
//!   --seed 7
//!
//! # Generate and verify only
//! clickstream-synth populate sqlite --dry-run --session-boundary stretch
//! ```

use clap::{Parser, Subcommand};
use clickstream_synth::{run_populate, PopulateTarget};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clickstream-synth")]
#[command(about = "Generate a synthetic e-commerce clickstream into SQLite or PostgreSQL")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deterministic clickstream and write it to a store
    Populate {
        #[command(subcommand)]
        target: PopulateTarget,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate { target } => run_populate(target).await,
    }
}
