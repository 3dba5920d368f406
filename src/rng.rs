//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct wraps the `rand` crate's `StdRng` and
//! provides the draws needed by the stochastic operators: uniform values,
//! indices, Bernoulli trials, permutations and normal deviates.
//!
//! Every operator receives the generator explicitly, so a run seeded with
//! [`RandomNumberGenerator::from_seed`] is reproducible.
//!
//! ## Example
//!
//! ```rust
//! use genmoea::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let x = rng.uniform(-1.0, 1.0);
//! assert!((-1.0..1.0).contains(&x));
//!
//! let idx = rng.index(10);
//! assert!(idx < 10);
//! ```

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{GeneticError, Result};

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws one value uniformly from `[from, to)`. Returns `from` for an empty range.
    pub fn uniform(&mut self, from: f64, to: f64) -> f64 {
        if to > from {
            self.rng.gen_range(from..to)
        } else {
            from
        }
    }

    /// Draws a value uniformly from `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws an index uniformly from `0..len`.
    ///
    /// `len` must be positive.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot draw an index from an empty range");
        self.rng.gen_range(0..len)
    }

    /// Returns `true` with probability `p`. Probabilities of 1 or more always succeed.
    pub fn probability(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            true
        } else if p <= 0.0 {
            false
        } else {
            self.rng.gen::<f64>() < p
        }
    }

    /// Returns a random permutation of `0..len`.
    pub fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..len).collect();
        perm.shuffle(&mut self.rng);
        perm
    }

    /// Draws from a normal distribution.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::RandomGeneration` if `std_dev` is negative or not finite.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> Result<f64> {
        let dist = Normal::new(mean, std_dev).map_err(|e| {
            GeneticError::RandomGeneration(format!(
                "Invalid normal distribution (mean {}, std_dev {}): {}",
                mean, std_dev, e
            ))
        })?;
        Ok(dist.sample(&mut self.rng))
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
