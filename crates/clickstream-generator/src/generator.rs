//! Main data generator for producing a full clickstream dataset.

use crate::catalog::EntityPools;
use crate::dataset::Dataset;
use crate::factory::{generate_products, generate_users};
use crate::pools::PoolError;
use crate::simulator::SessionSimulator;
use crate::verify::verify_dataset;
use crate::walker::JourneyWalker;
use clickstream_core::{ConfigError, GenerationConfig, GenerationWindow, Product, User};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Golden-ratio increment used to derive independent shard seeds.
const SHARD_SEED_STRIDE: u64 = 0x9E3779B97F4A7C15;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Invalid counts or date window
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A weighted pool could not be built
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// Generated data broke a referential or ordering invariant
    #[error("Generation invariant violated: {0}")]
    InvariantViolation(String),
}

/// Data generator that produces a deterministic dataset.
///
/// Users and products are drawn from a master stream seeded with the run's
/// seed. Sessions are split into `workers` shards, each walked with its own
/// stream derived from the seed and the shard index, and the shard buffers
/// are concatenated in shard order. The same seed and worker count always
/// produce the same dataset, whatever the size of the thread pool.
pub struct DataGenerator {
    config: GenerationConfig,
    window: GenerationWindow,
    pools: EntityPools,
}

impl DataGenerator {
    /// Validate the configuration and build the standard pools.
    ///
    /// Fails before any generation work if the configuration is invalid.
    pub fn new(config: GenerationConfig) -> Result<Self, GeneratorError> {
        let window = config.validate()?;
        let pools = EntityPools::standard()?;
        Ok(Self {
            config,
            window,
            pools,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn window(&self) -> GenerationWindow {
        self.window
    }

    /// Seed of the stream used for shard `index`.
    fn compute_shard_seed(&self, index: usize) -> u64 {
        let base_seed = self.config.seed;
        base_seed.wrapping_add((index as u64 + 1).wrapping_mul(SHARD_SEED_STRIDE))
    }

    /// Number of sessions shard `index` generates.
    fn shard_size(&self, index: usize) -> u64 {
        let workers = self.config.workers as u64;
        let base = self.config.num_sessions / workers;
        let extra = u64::from((index as u64) < self.config.num_sessions % workers);
        base + extra
    }

    /// Generate and verify a complete dataset.
    pub fn generate(&self) -> Result<Dataset, GeneratorError> {
        let started = Instant::now();
        let mut master = StdRng::seed_from_u64(self.config.seed);

        let users = generate_users(
            &mut master,
            &self.pools,
            &self.window,
            self.config.num_users as usize,
        );
        let products =
            generate_products(&mut master, &self.pools, self.config.num_products as usize);
        info!(
            "Generated {} users and {} products",
            users.len(),
            products.len()
        );

        if users.is_empty() || products.is_empty() {
            return Err(GeneratorError::InvariantViolation(
                "sessions need at least one user and one product".to_string(),
            ));
        }

        let shards: Vec<Dataset> = (0..self.config.workers)
            .into_par_iter()
            .map(|index| self.generate_shard(index, &users, &products))
            .collect();

        let mut dataset = Dataset::new();
        dataset.users = users;
        dataset.products = products;
        for shard in shards {
            dataset.merge(shard);
        }

        let summary = dataset.summary();
        info!(
            "Generated {} sessions ({} completed, {} abandoned, {} confirmations) in {:.2}s",
            dataset.sessions.len(),
            summary.completed_sessions,
            summary.abandoned_sessions,
            summary.confirmations,
            started.elapsed().as_secs_f64()
        );
        for (table, count) in &summary.table_counts {
            info!("  {}: {} rows", table.name(), count);
        }

        let report = verify_dataset(&dataset, self.config.session_boundary);
        if !report.is_success() {
            for violation in report.violations.iter().take(10) {
                warn!("Verification failed: {violation}");
            }
            return Err(GeneratorError::InvariantViolation(format!(
                "{} of {} records failed verification",
                report.violations.len(),
                report.checked
            )));
        }
        debug!("Verified {} records", report.checked);

        Ok(dataset)
    }

    /// Walk one shard's sessions into its own dataset.
    fn generate_shard(&self, index: usize, users: &[User], products: &[Product]) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.compute_shard_seed(index));
        let simulator = SessionSimulator::new(&self.pools, users, self.window);
        let walker = JourneyWalker::new(&self.pools, products, self.config.session_boundary);

        let count = self.shard_size(index);
        let mut shard = Dataset::new();
        for _ in 0..count {
            let plan = simulator.plan(&mut rng);
            walker.walk(&mut rng, plan, &mut shard);
        }

        debug!(
            "Shard {} walked {} sessions into {} events",
            index,
            count,
            shard.total_records() - shard.sessions.len()
        );
        shard
    }
}
