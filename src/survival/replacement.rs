use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    population::Population,
    rng::RandomNumberGenerator,
};

use super::{assign_scaled_fitness, best_feasible, require_single_objective, Reinsertion};

/// Generational replacement: the offspring become the next population.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplacementReinsertion;

impl ReplacementReinsertion {
    pub fn new() -> Self {
        Self
    }
}

impl Reinsertion for ReplacementReinsertion {
    fn name(&self) -> &'static str {
        "simple-ga"
    }

    fn validate(&self, _encoding: Encoding, num_objectives: usize) -> Result<()> {
        require_single_objective(self.name(), num_objectives)
    }

    fn prepare(&mut self, population: &mut Population, context: &GenerationContext) -> Result<()> {
        assign_scaled_fitness(population, &context.signs)
    }

    fn reinsert(
        &mut self,
        _parents: &Population,
        offspring: &Population,
        target: usize,
        context: &GenerationContext,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        if offspring.len() != target {
            return Err(GeneticError::DimensionMismatch(format!(
                "Replacement needs {} offspring, got {}",
                target,
                offspring.len()
            )));
        }
        let mut next = offspring.clone();
        assign_scaled_fitness(&mut next, &context.signs)?;
        Ok(next)
    }

    fn finish(&self, population: &Population, context: &GenerationContext) -> Result<Population> {
        best_feasible(population, &context.signs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survival::test_support::evaluated;

    #[test]
    fn test_offspring_replace_parents() {
        let parents = evaluated(&[vec![0.0], vec![1.0]], &[]);
        let offspring = evaluated(&[vec![7.0], vec![3.0]], &[]);
        let ctx = GenerationContext::new(vec![1.0], 10);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut policy = ReplacementReinsertion::new();
        let next = policy.reinsert(&parents, &offspring, 2, &ctx, &mut rng).unwrap();
        assert_eq!(next.objectives(), offspring.objectives());
        assert_eq!(next.fitness(), &[1.0, 2.0]);
        assert!(policy.reinsert(&parents, &offspring, 3, &ctx, &mut rng).is_err());
        assert!(policy.validate(Encoding::RealInteger, 2).is_err());
    }
}
