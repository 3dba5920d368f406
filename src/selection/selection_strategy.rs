use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Trait for index-based selection over a fitness vector.
///
/// Selection strategies choose individuals by their scalar fitness (higher is
/// better) and return row indices into the population, so the caller can build
/// the selected population with [`Population::subset`](crate::population::Population::subset).
/// The same strategies serve mating selection and environmental selection.
///
/// # Examples
///
/// ```
/// use genmoea::selection::{SelectionStrategy, TournamentSelection};
/// use genmoea::rng::RandomNumberGenerator;
/// use genmoea::error::Result;
///
/// fn main() -> Result<()> {
///     let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
///     let mut rng = RandomNumberGenerator::from_seed(3);
///
///     let selection = TournamentSelection::new(2)?;
///     let selected = selection.select(&fitness, 4, &mut rng)?;
///
///     assert_eq!(selected.len(), 4);
///     assert!(selected.iter().all(|&i| i < fitness.len()));
///
///     Ok(())
/// }
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects `num_to_select` individuals by fitness.
    ///
    /// # Arguments
    ///
    /// * `fitness` - One fitness value per individual, higher is better.
    /// * `num_to_select` - The number of indices to return.
    /// * `rng` - Random number generator for stochastic strategies.
    ///
    /// # Returns
    ///
    /// Row indices into the population. Indices may repeat unless a strategy
    /// states otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The fitness vector is empty
    /// - The fitness values are unusable for the strategy (e.g. negative for roulette)
    /// - The strategy constrains `num_to_select` and it is violated
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>>;
}

pub(crate) fn ensure_non_empty(fitness: &[f64]) -> Result<()> {
    if fitness.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    if fitness.iter().any(|f| f.is_nan()) {
        return Err(GeneticError::InvalidNumericValue(
            "NaN fitness value passed to selection".to_string(),
        ));
    }
    Ok(())
}
