use tracing::debug;

use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    pareto::{non_dominated_sort, reference_point_select, uniform_points},
    population::Population,
    rng::RandomNumberGenerator,
};

use super::{feasible_front, level_fitness, require_objectives, Reinsertion};

/// NSGA-III environmental selection against fixed simplex reference points.
///
/// The reference set is generated from the requested population size when the
/// run starts; its cardinality becomes the working population size.
#[derive(Debug, Clone)]
pub struct ReferencePointReinsertion {
    reference_points: Vec<Vec<f64>>,
    randomized_ties: bool,
}

impl Default for ReferencePointReinsertion {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferencePointReinsertion {
    /// Reinsertion with randomly broken niche ties.
    pub fn new() -> Self {
        Self {
            reference_points: Vec::new(),
            randomized_ties: true,
        }
    }

    /// Breaks niche ties by lowest reference-point index instead.
    pub fn with_deterministic_ties(mut self) -> Self {
        self.randomized_ties = false;
        self
    }

    pub fn reference_points(&self) -> &[Vec<f64>] {
        &self.reference_points
    }
}

impl Reinsertion for ReferencePointReinsertion {
    fn name(&self) -> &'static str {
        "nsga3-de"
    }

    fn validate(&self, _encoding: Encoding, num_objectives: usize) -> Result<()> {
        require_objectives(self.name(), num_objectives, 2)
    }

    fn population_size(&mut self, requested: usize, num_objectives: usize) -> Result<usize> {
        self.reference_points = uniform_points(num_objectives, requested)?;
        debug!(
            points = self.reference_points.len(),
            requested, "Generated reference points"
        );
        Ok(self.reference_points.len())
    }

    fn prepare(&mut self, population: &mut Population, context: &GenerationContext) -> Result<()> {
        let objectives = population.signed_objectives(&context.signs)?;
        let sorted = non_dominated_sort(&objectives, population.constraint_violations(), None)?;
        population.set_fitness(level_fitness(&sorted.levels))
    }

    fn reinsert(
        &mut self,
        parents: &Population,
        offspring: &Population,
        target: usize,
        context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        if self.reference_points.is_empty() {
            return Err(GeneticError::Configuration(
                "Reference points have not been generated".to_string(),
            ));
        }
        let mut merged = parents.concat(offspring)?;
        let objectives = merged.signed_objectives(&context.signs)?;
        let sorted = non_dominated_sort(&objectives, merged.constraint_violations(), Some(target))?;
        let chosen = reference_point_select(
            &objectives,
            &sorted,
            target,
            &self.reference_points,
            self.randomized_ties,
            rng,
        )?;
        merged.set_fitness(level_fitness(&sorted.levels))?;
        merged.subset(&chosen)
    }

    fn finish(&self, population: &Population, context: &GenerationContext) -> Result<Population> {
        feasible_front(population, &context.signs)
    }
}
