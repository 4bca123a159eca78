//! Common CLI argument definitions shared by all populators.

use clap::Args;
use clickstream_core::{ConfigError, GenerationConfig, SessionBoundary};
use std::path::PathBuf;

/// Common arguments shared by all populators.
///
/// Generation settings start from `--config` (or the defaults when it is
/// absent); every flag that is given overrides the matching field.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonPopulateArgs {
    /// Path to a generation config YAML file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of users to generate
    #[arg(long)]
    pub num_users: Option<u64>,

    /// Number of sessions to generate
    #[arg(long)]
    pub num_sessions: Option<u64>,

    /// Number of products to generate
    #[arg(long)]
    pub num_products: Option<u64>,

    /// First day of the generation window (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day of the generation window (YYYY-MM-DD, exclusive)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of session shards generated in parallel
    #[arg(long)]
    pub workers: Option<usize>,

    /// How journeys treat a session's end time: overrun, truncate or stretch
    #[arg(long)]
    pub session_boundary: Option<SessionBoundary>,

    /// Drop and recreate all tables before writing
    #[arg(long)]
    pub drop_existing: bool,

    /// Dry-run mode: generate and verify the dataset without writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonPopulateArgs {
    /// Resolve the generation config from the file and flag overrides.
    pub fn generation_config(&self) -> Result<GenerationConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_file(path)?,
            None => GenerationConfig::default(),
        };

        if let Some(n) = self.num_users {
            config.num_users = n;
        }
        if let Some(n) = self.num_sessions {
            config.num_sessions = n;
        }
        if let Some(n) = self.num_products {
            config.num_products = n;
        }
        if let Some(date) = &self.start_date {
            config.start_date = date.clone();
        }
        if let Some(date) = &self.end_date {
            config.end_date = date.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(boundary) = self.session_boundary {
            config.session_boundary = boundary;
        }

        Ok(config)
    }
}
