//! Weighted pools.
//!
//! A pool is an immutable list of `(value, weight)` pairs with a cumulative
//! weight array. Drawing samples a uniform float in `[0, total)` and
//! binary-searches the cumulative array, so a draw is `O(log n)` and needs
//! nothing but a shared reference.

use rand::Rng;

/// Tolerance for weights summing to 1.0.
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Error type for pool construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoolError {
    /// The pool has no values
    #[error("Pool '{pool}' is empty")]
    Empty { pool: &'static str },

    /// A weight is negative or not finite
    #[error("Pool '{pool}' has invalid weight {weight}")]
    InvalidWeight { pool: &'static str, weight: f64 },

    /// Weights do not sum to 1.0
    #[error("Pool '{pool}' weights sum to {sum}, expected 1.0")]
    NotNormalized { pool: &'static str, sum: f64 },
}

/// An immutable weighted catalog of values.
#[derive(Debug, Clone)]
pub struct WeightedPool<T> {
    name: &'static str,
    values: Vec<T>,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl<T> WeightedPool<T> {
    /// Build a pool from `(value, weight)` pairs.
    ///
    /// Weights must be finite, non-negative and sum to 1.0.
    pub fn new(name: &'static str, entries: Vec<(T, f64)>) -> Result<Self, PoolError> {
        if entries.is_empty() {
            return Err(PoolError::Empty { pool: name });
        }

        let mut values = Vec::with_capacity(entries.len());
        let mut weights = Vec::with_capacity(entries.len());
        let mut cumulative = Vec::with_capacity(entries.len());
        let mut running = 0.0;

        for (value, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PoolError::InvalidWeight { pool: name, weight });
            }
            running += weight;
            values.push(value);
            weights.push(weight);
            cumulative.push(running);
        }

        if (running - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(PoolError::NotNormalized {
                pool: name,
                sum: running,
            });
        }

        Ok(Self {
            name,
            values,
            weights,
            cumulative,
        })
    }

    /// Build a pool where every value is equally likely.
    pub fn uniform(name: &'static str, values: Vec<T>) -> Result<Self, PoolError> {
        if values.is_empty() {
            return Err(PoolError::Empty { pool: name });
        }
        let weight = 1.0 / values.len() as f64;
        Self::new(name, values.into_iter().map(|v| (v, weight)).collect())
    }

    /// Draw a value according to the pool's weights.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let total = self.cumulative[self.cumulative.len() - 1];
        let x = rng.gen::<f64>() * total;
        let idx = self.cumulative.partition_point(|c| *c <= x);
        &self.values[idx.min(self.values.len() - 1)]
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: PartialEq> WeightedPool<T> {
    /// Popularity rank of a value: 0 for the heaviest weight, 1 for the
    /// next, and so on. Ties keep catalog order.
    pub fn rank(&self, value: &T) -> Option<usize> {
        let idx = self.values.iter().position(|v| v == value)?;
        let weight = self.weights[idx];
        let heavier = self
            .weights
            .iter()
            .enumerate()
            .filter(|(i, w)| **w > weight || (**w == weight && *i < idx))
            .count();
        Some(heavier)
    }

    /// Weight of a value, if it is in the pool.
    pub fn weight_of(&self, value: &T) -> Option<f64> {
        let idx = self.values.iter().position(|v| v == value)?;
        Some(self.weights[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn devices() -> WeightedPool<&'static str> {
        WeightedPool::new(
            "devices",
            vec![("desktop", 0.5), ("mobile", 0.4), ("tablet", 0.1)],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let result = WeightedPool::<&str>::new("empty", vec![]);
        assert_eq!(result.unwrap_err(), PoolError::Empty { pool: "empty" });

        let result = WeightedPool::<&str>::uniform("empty", vec![]);
        assert!(matches!(result, Err(PoolError::Empty { .. })));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let result = WeightedPool::new("bad", vec![("a", 0.5), ("b", 0.4)]);
        assert!(matches!(result, Err(PoolError::NotNormalized { .. })));
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let result = WeightedPool::new("bad", vec![("a", 1.5), ("b", -0.5)]);
        assert!(matches!(
            result,
            Err(PoolError::InvalidWeight { weight, .. }) if weight == -0.5
        ));
    }

    #[test]
    fn test_uniform_pool() {
        let pool = WeightedPool::uniform("letters", vec!['a', 'b', 'c']).unwrap();
        assert_eq!(pool.len(), 3);
        assert!((pool.weight_of(&'b').unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_draw_follows_weights() {
        let pool = devices();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<&str, u32> = HashMap::new();

        for _ in 0..20_000 {
            *counts.entry(*pool.draw(&mut rng)).or_default() += 1;
        }

        let share = |k: &str| f64::from(counts[k]) / 20_000.0;
        assert!((share("desktop") - 0.5).abs() < 0.02);
        assert!((share("mobile") - 0.4).abs() < 0.02);
        assert!((share("tablet") - 0.1).abs() < 0.02);
    }

    #[test]
    fn test_zero_weight_is_never_drawn() {
        let pool = WeightedPool::new("z", vec![("never", 0.0), ("always", 1.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(*pool.draw(&mut rng), "always");
        }
    }

    #[test]
    fn test_draw_is_deterministic() {
        let pool = devices();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(pool.draw(&mut rng1), pool.draw(&mut rng2));
        }
    }

    #[test]
    fn test_rank() {
        let pool = WeightedPool::new(
            "browsers",
            vec![
                ("Chrome", 0.6),
                ("Safari", 0.25),
                ("Firefox", 0.1),
                ("Edge", 0.05),
            ],
        )
        .unwrap();
        assert_eq!(pool.rank(&"Chrome"), Some(0));
        assert_eq!(pool.rank(&"Safari"), Some(1));
        assert_eq!(pool.rank(&"Edge"), Some(3));
        assert_eq!(pool.rank(&"Opera"), None);
    }
}
