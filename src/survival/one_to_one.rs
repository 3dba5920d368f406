use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    population::Population,
    rng::RandomNumberGenerator,
    selection::{OneToOneSelection, SelectionStrategy},
};

use super::{assign_scaled_fitness, best_feasible, require_single_objective, Reinsertion};

/// Differential-evolution survivor step: trial `i` replaces target `i` when it
/// is at least as fit.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneToOneReinsertion;

impl OneToOneReinsertion {
    pub fn new() -> Self {
        Self
    }
}

impl Reinsertion for OneToOneReinsertion {
    fn name(&self) -> &'static str {
        "de-rand-1-l"
    }

    fn validate(&self, encoding: Encoding, num_objectives: usize) -> Result<()> {
        require_single_objective(self.name(), num_objectives)?;
        if encoding != Encoding::RealInteger {
            return Err(GeneticError::Configuration(format!(
                "{} needs a real-integer encoding, got {}",
                self.name(),
                encoding
            )));
        }
        Ok(())
    }

    fn prepare(&mut self, population: &mut Population, context: &GenerationContext) -> Result<()> {
        assign_scaled_fitness(population, &context.signs)
    }

    fn reinsert(
        &mut self,
        parents: &Population,
        offspring: &Population,
        target: usize,
        context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        if parents.len() != target || offspring.len() != target {
            return Err(GeneticError::DimensionMismatch(format!(
                "One-to-one survival pairs {} targets with {} trials, {} expected",
                parents.len(),
                offspring.len(),
                target
            )));
        }
        let mut merged = parents.concat(offspring)?;
        assign_scaled_fitness(&mut merged, &context.signs)?;
        let chosen = OneToOneSelection.select(merged.fitness(), target, rng)?;
        merged.subset(&chosen)
    }

    fn finish(&self, population: &Population, context: &GenerationContext) -> Result<Population> {
        best_feasible(population, &context.signs)
    }
}
