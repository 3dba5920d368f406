use std::cmp::Ordering;

use crate::{
    encoding::Encoding,
    error::Result,
    evolution::context::GenerationContext,
    pareto::{crowding_distance, non_dominated_sort},
    population::Population,
    rng::RandomNumberGenerator,
};

use super::{feasible_front, require_objectives, Reinsertion};

/// Orders individuals by level ascending, then crowding distance descending.
///
/// Returns the order (best first) and a fitness vector where the best
/// individual scores `n` and the worst scores `1`. Ties keep index order.
///
/// # Example
///
/// ```
/// use genmoea::survival::crowded_ranking;
///
/// let (order, fitness) = crowded_ranking(&[2, 1, 1], &[f64::INFINITY, 0.5, 1.0]);
/// assert_eq!(order, vec![2, 1, 0]);
/// assert_eq!(fitness, vec![1.0, 2.0, 3.0]);
/// ```
pub fn crowded_ranking(levels: &[usize], distances: &[f64]) -> (Vec<usize>, Vec<f64>) {
    let n = levels.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        levels[a]
            .cmp(&levels[b])
            .then_with(|| distances[b].partial_cmp(&distances[a]).unwrap_or(Ordering::Equal))
    });
    let mut fitness = vec![0.0; n];
    for (position, &i) in order.iter().enumerate() {
        fitness[i] = (n - position) as f64;
    }
    (order, fitness)
}

/// NSGA-II environmental selection: non-dominated sorting of the merged
/// population, crowding distance inside each level, and the best `N` by the
/// crowded comparison survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrowdedComparisonReinsertion;

impl CrowdedComparisonReinsertion {
    pub fn new() -> Self {
        Self
    }

    fn rank(population: &Population, signs: &[f64], target: Option<usize>) -> Result<(Vec<usize>, Vec<f64>)> {
        let objectives = population.signed_objectives(signs)?;
        let sorted = non_dominated_sort(&objectives, population.constraint_violations(), target)?;
        let distances = crowding_distance(&objectives, &sorted.levels)?;
        Ok(crowded_ranking(&sorted.levels, &distances))
    }
}

impl Reinsertion for CrowdedComparisonReinsertion {
    fn name(&self) -> &'static str {
        "nsga2"
    }

    fn validate(&self, _encoding: Encoding, num_objectives: usize) -> Result<()> {
        require_objectives(self.name(), num_objectives, 1)
    }

    fn prepare(&mut self, population: &mut Population, context: &GenerationContext) -> Result<()> {
        let (_, fitness) = Self::rank(population, &context.signs, None)?;
        population.set_fitness(fitness)
    }

    fn reinsert(
        &mut self,
        parents: &Population,
        offspring: &Population,
        target: usize,
        context: &GenerationContext,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let mut merged = parents.concat(offspring)?;
        let (order, fitness) = Self::rank(&merged, &context.signs, Some(target))?;
        merged.set_fitness(fitness)?;
        merged.subset(&order[..target.min(order.len())])
    }

    fn finish(&self, population: &Population, context: &GenerationContext) -> Result<Population> {
        feasible_front(population, &context.signs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survival::test_support::evaluated;

    #[test]
    fn test_keeps_front_and_extremes() {
        let parents = evaluated(
            &[vec![1.0, 4.0], vec![2.0, 3.0], vec![5.0, 5.0]],
            &[],
        );
        let offspring = evaluated(
            &[vec![3.0, 2.0], vec![4.0, 1.0], vec![2.5, 2.6]],
            &[],
        );
        let ctx = GenerationContext::new(vec![1.0, 1.0], 10);
        let mut rng = RandomNumberGenerator::from_seed(0);
        let next = CrowdedComparisonReinsertion
            .reinsert(&parents, &offspring, 3, &ctx, &mut rng)
            .unwrap();
        assert_eq!(next.len(), 3);
        assert!(next.objectives().contains(&vec![1.0, 4.0]));
        assert!(next.objectives().contains(&vec![4.0, 1.0]));
        assert!(!next.objectives().contains(&vec![5.0, 5.0]));
        // Best first, fitness carried with the rows.
        assert!(next.fitness().windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_infeasible_ranked_last() {
        let mut pop = evaluated(&[vec![0.0, 0.0], vec![3.0, 3.0]], &[1.0, 0.0]);
        let ctx = GenerationContext::new(vec![1.0, 1.0], 10);
        CrowdedComparisonReinsertion.prepare(&mut pop, &ctx).unwrap();
        assert_eq!(pop.fitness(), &[1.0, 2.0]);
    }
}
