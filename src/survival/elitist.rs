use crate::{
    encoding::Encoding,
    error::Result,
    evolution::context::GenerationContext,
    population::Population,
    rng::RandomNumberGenerator,
    selection::{ElitistTournamentSelection, SelectionStrategy},
};

use super::{assign_scaled_fitness, best_feasible, require_single_objective, Reinsertion};

/// Strengthened elitism: parents and offspring compete together and the
/// next population is drawn from the merged set by elitist tournament, so the
/// best individual always survives.
#[derive(Debug, Clone, Default)]
pub struct ElitistReinsertion {
    selection: ElitistTournamentSelection,
}

impl ElitistReinsertion {
    pub fn new(tournament_size: usize) -> Result<Self> {
        Ok(Self {
            selection: ElitistTournamentSelection::new(tournament_size)?,
        })
    }
}

impl Reinsertion for ElitistReinsertion {
    fn name(&self) -> &'static str {
        "strengthened-elitist-ga"
    }

    fn validate(&self, _encoding: Encoding, num_objectives: usize) -> Result<()> {
        require_single_objective(self.name(), num_objectives)
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
        let mut merged = parents.concat(offspring)?;
        assign_scaled_fitness(&mut merged, &context.signs)?;
        let chosen = self.selection.select(merged.fitness(), target, rng)?;
        merged.subset(&chosen)
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
    fn test_best_always_survives() {
        let parents = evaluated(&[vec![5.0], vec![6.0], vec![7.0]], &[]);
        let offspring = evaluated(&[vec![-2.0], vec![8.0], vec![9.0]], &[]);
        let ctx = GenerationContext::new(vec![1.0], 10);
        let mut policy = ElitistReinsertion::new(2).unwrap();
        for seed in 0..10 {
            let mut rng = RandomNumberGenerator::from_seed(seed);
            let next = policy.reinsert(&parents, &offspring, 3, &ctx, &mut rng).unwrap();
            assert_eq!(next.len(), 3);
            assert!(next.objectives().contains(&vec![-2.0]));
        }
    }
}
