//! # BreedStrategy
//!
//! The `BreedStrategy` trait defines the variation policy of a template: how a
//! population produces offspring chromosomes. Offspring come back decoded but
//! unevaluated; the engine evaluates them and hands them to the reinsertion
//! strategy.
pub mod differential;
pub mod genetic;

use std::fmt::Debug;

use crate::{
    encoding::Encoding, error::Result, evolution::context::GenerationContext,
    population::Population, rng::RandomNumberGenerator,
};

/// # BreedStrategy
///
/// Produces offspring from the current population.
pub trait BreedStrategy: Debug + Send + Sync {
    /// Checks once, before the run, that the strategy can operate on `encoding`.
    ///
    /// ## Errors
    ///
    /// Returns `GeneticError::Configuration` for unsupported encodings.
    fn validate(&self, encoding: Encoding) -> Result<()>;

    /// Breeds `count` offspring from `population`.
    ///
    /// ## Parameters
    ///
    /// - `population`: The current, evaluated population with fitness assigned.
    /// - `count`: The number of offspring to produce.
    /// - `context`: The run state of the current generation.
    /// - `rng`: The random number generator used for all stochastic steps.
    ///
    /// ## Returns
    ///
    /// A decoded, unevaluated population of `count` offspring.
    ///
    /// ## Errors
    ///
    /// This method can fail if:
    /// - The population is empty or has no chromosomes
    /// - An operator rejects the chromosomes
    fn breed(
        &self,
        population: &Population,
        count: usize,
        context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population>;
}

pub use differential::DifferentialStrategy;
pub use genetic::{DiversityBoost, GeneticStrategy};
