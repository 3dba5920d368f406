//! # Reinsertion
//!
//! Environmental selection: how the parents and the evaluated offspring of a
//! generation become the next population. Each algorithm template pairs a
//! [`BreedStrategy`](crate::strategy::BreedStrategy) with one `Reinsertion`.
//!
//! Every implementation leaves the fitness of the returned population ready
//! for the next round of mating selection.
pub mod adaptive_weight;
pub mod elitist;
pub mod nsga2;
pub mod nsga3;
pub mod one_to_one;
pub mod replacement;
pub mod rvea;

use std::fmt::Debug;

use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    operators::scale_fitness,
    pareto::non_dominated_sort,
    population::Population,
    rng::RandomNumberGenerator,
};

pub use adaptive_weight::{adaptive_weight_fitness, AdaptiveWeightReinsertion};
pub use elitist::ElitistReinsertion;
pub use nsga2::{crowded_ranking, CrowdedComparisonReinsertion};
pub use nsga3::ReferencePointReinsertion;
pub use one_to_one::OneToOneReinsertion;
pub use replacement::ReplacementReinsertion;
pub use rvea::ReferenceVectorReinsertion;

/// # Reinsertion
///
/// Environmental selection policy of an algorithm template.
///
/// The engine calls [`Reinsertion::population_size`] and
/// [`Reinsertion::prepare`] once, [`Reinsertion::reinsert`] every generation
/// and [`Reinsertion::finish`] when the run terminates.
pub trait Reinsertion: Debug + Send {
    /// Short template-facing name used in log output.
    fn name(&self) -> &'static str;

    /// Checks once, before the run, that the policy supports the problem.
    ///
    /// ## Errors
    ///
    /// Returns `GeneticError::Configuration` for unsupported objective counts
    /// or encodings.
    fn validate(&self, encoding: Encoding, num_objectives: usize) -> Result<()>;

    /// Working population size for a requested size.
    ///
    /// Reference-set based policies answer with the cardinality of their
    /// reference set, which may differ from `requested`.
    fn population_size(&mut self, requested: usize, _num_objectives: usize) -> Result<usize> {
        Ok(requested)
    }

    /// Assigns fitness (and any other state) for the evaluated initial population.
    fn prepare(&mut self, population: &mut Population, context: &GenerationContext) -> Result<()>;

    /// Builds the next population from the evaluated parents and offspring.
    ///
    /// ## Parameters
    ///
    /// - `parents`: The current population.
    /// - `offspring`: The evaluated offspring of this generation.
    /// - `target`: The configured population size.
    /// - `context`: The run state of the current generation.
    /// - `rng`: The random number generator for stochastic tie-breaking.
    fn reinsert(
        &mut self,
        parents: &Population,
        offspring: &Population,
        target: usize,
        context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population>;

    /// Duplication rate of any state kept across generations (0 when none).
    fn duplication_rate(&self) -> f64 {
        0.0
    }

    /// Solution set returned when the run terminates.
    fn finish(&self, population: &Population, context: &GenerationContext) -> Result<Population>;
}

/// Rejects anything but single-objective problems.
pub(crate) fn require_single_objective(name: &str, num_objectives: usize) -> Result<()> {
    if num_objectives != 1 {
        return Err(GeneticError::Configuration(format!(
            "{} optimises a single objective, the problem has {}",
            name, num_objectives
        )));
    }
    Ok(())
}

pub(crate) fn require_objectives(name: &str, num_objectives: usize, minimum: usize) -> Result<()> {
    if num_objectives < minimum {
        return Err(GeneticError::Configuration(format!(
            "{} needs at least {} objectives, the problem has {}",
            name, minimum, num_objectives
        )));
    }
    Ok(())
}

/// Scaled single-objective fitness written onto `population`.
pub(crate) fn assign_scaled_fitness(population: &mut Population, signs: &[f64]) -> Result<()> {
    let objectives = population.signed_objectives(signs)?;
    let fitness = scale_fitness(&objectives, population.constraint_violations())?;
    population.set_fitness(fitness)
}

/// The best feasible individual of a single-objective population.
///
/// # Errors
///
/// Returns `GeneticError::NoFeasibleSolution` when every individual violates
/// a constraint.
pub fn best_feasible(population: &Population, signs: &[f64]) -> Result<Population> {
    let objectives = population.signed_objectives(signs)?;
    let best = population
        .feasible_indices()
        .into_iter()
        .min_by(|&a, &b| objectives[a][0].total_cmp(&objectives[b][0]))
        .ok_or(GeneticError::NoFeasibleSolution)?;
    population.subset(&[best])
}

/// The feasible members of the first Pareto level.
///
/// An empty population is returned when nothing is feasible.
pub fn feasible_front(population: &Population, signs: &[f64]) -> Result<Population> {
    let feasible = population.feasible_indices();
    if feasible.is_empty() {
        return population.subset(&[]);
    }
    let candidates = population.subset(&feasible)?;
    let objectives = candidates.signed_objectives(signs)?;
    let sorted = non_dominated_sort(&objectives, candidates.constraint_violations(), Some(1))?;
    candidates.subset(&sorted.members(1))
}

/// Fitness from Pareto levels: `1 / level`, unranked individuals score 0.
pub(crate) fn level_fitness(levels: &[usize]) -> Vec<f64> {
    levels
        .iter()
        .map(|&level| {
            if level == 0 || level == crate::pareto::UNRANKED {
                0.0
            } else {
                1.0 / level as f64
            }
        })
        .collect()
}
