use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    pareto::Archive,
    population::{aggregate_violation, Population},
    rng::RandomNumberGenerator,
    selection::{DuplicationSelection, SelectionStrategy},
};

use super::{require_objectives, Reinsertion};

/// Adaptive-weight fitness of direction-adjusted objective rows.
///
/// With per-objective extremes `zmin`, `zmax` over the whole population, a
/// feasible individual scores `Σ_k (zmax_k - z_k) / (zmax_k - zmin_k)`;
/// objectives without spread contribute nothing. Infeasible individuals score
/// minus their aggregate violation.
///
/// ```
/// use genmoea::survival::adaptive_weight_fitness;
///
/// let objectives = vec![vec![0.0, 2.0], vec![2.0, 0.0], vec![2.0, 2.0]];
/// let fitness = adaptive_weight_fitness(&objectives, &[]);
/// assert_eq!(fitness, vec![1.0, 1.0, 0.0]);
/// ```
pub fn adaptive_weight_fitness(objectives: &[Vec<f64>], constraint_violations: &[Vec<f64>]) -> Vec<f64> {
    let m = objectives.first().map_or(0, Vec::len);
    let mut lower = vec![f64::INFINITY; m];
    let mut upper = vec![f64::NEG_INFINITY; m];
    for row in objectives {
        for (k, &v) in row.iter().enumerate() {
            lower[k] = lower[k].min(v);
            upper[k] = upper[k].max(v);
        }
    }

    objectives
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cv = constraint_violations
                .get(i)
                .map_or(0.0, |r| aggregate_violation(r));
            if cv > 0.0 {
                return -cv;
            }
            row.iter()
                .enumerate()
                .filter(|(k, _)| upper[*k] > lower[*k])
                .map(|(k, &z)| (upper[k] - z) / (upper[k] - lower[k]))
                .sum()
        })
        .collect()
}

/// awGA environmental selection with a bounded non-dominated archive.
///
/// Parents and offspring are merged and scored by [`adaptive_weight_fitness`],
/// the archive absorbs the merged set, and the `N` fittest survive. The
/// archive, stripped of infeasible members, is the solution set of the run.
#[derive(Debug, Clone)]
pub struct AdaptiveWeightReinsertion {
    capacity: Option<usize>,
    archive: Option<Archive>,
}

impl Default for AdaptiveWeightReinsertion {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveWeightReinsertion {
    /// Archive capacity defaults to the population size.
    pub fn new() -> Self {
        Self {
            capacity: None,
            archive: None,
        }
    }

    pub fn with_archive_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn archive(&self) -> Option<&Archive> {
        self.archive.as_ref()
    }

    fn score(population: &mut Population, signs: &[f64]) -> Result<()> {
        let objectives = population.signed_objectives(signs)?;
        let fitness = adaptive_weight_fitness(&objectives, population.constraint_violations());
        population.set_fitness(fitness)
    }
}

impl Reinsertion for AdaptiveWeightReinsertion {
    fn name(&self) -> &'static str {
        "awga"
    }

    fn validate(&self, _encoding: Encoding, num_objectives: usize) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(GeneticError::Configuration(
                "Archive capacity must be positive".to_string(),
            ));
        }
        require_objectives(self.name(), num_objectives, 1)
    }

    fn prepare(&mut self, population: &mut Population, context: &GenerationContext) -> Result<()> {
        Self::score(population, &context.signs)?;
        let mut archive = Archive::new(self.capacity.unwrap_or(population.len()))?;
        archive.update(population, &context.signs)?;
        self.archive = Some(archive);
        Ok(())
    }

    fn reinsert(
        &mut self,
        parents: &Population,
        offspring: &Population,
        target: usize,
        context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let archive = self.archive.as_mut().ok_or_else(|| {
            GeneticError::Configuration("Archive has not been initialised".to_string())
        })?;
        let mut merged = parents.concat(offspring)?;
        Self::score(&mut merged, &context.signs)?;
        archive.update(&merged, &context.signs)?;
        let chosen = DuplicationSelection.select(merged.fitness(), target, rng)?;
        merged.subset(&chosen)
    }

    fn duplication_rate(&self) -> f64 {
        self.archive.as_ref().map_or(0.0, Archive::duplication_rate)
    }

    fn finish(&self, _population: &Population, _context: &GenerationContext) -> Result<Population> {
        let archive = self.archive.as_ref().ok_or_else(|| {
            GeneticError::Configuration("Archive has not been initialised".to_string())
        })?;
        archive.feasible_members()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pareto::{pareto_dominance, Dominance};
    use crate::survival::test_support::evaluated;

    #[test]
    fn test_infeasible_score_negative_violation() {
        let fitness = adaptive_weight_fitness(
            &[vec![0.0, 0.0], vec![1.0, 1.0]],
            &[vec![2.0, -1.0], vec![0.0]],
        );
        assert_eq!(fitness, vec![-2.0, 0.0]);
    }

    #[test]
    fn test_archive_bounded_and_feasible_at_finish() {
        let mut policy = AdaptiveWeightReinsertion::new().with_archive_capacity(2);
        let ctx = GenerationContext::new(vec![1.0, 1.0], 10);
        let mut parents = evaluated(
            &[vec![0.0, 4.0], vec![1.0, 3.0], vec![2.0, 2.0], vec![-1.0, -1.0]],
            &[0.0, 0.0, 0.0, 5.0],
        );
        policy.prepare(&mut parents, &ctx).unwrap();
        assert!(policy.archive().unwrap().len() <= 2);

        let offspring = evaluated(
            &[vec![3.0, 1.0], vec![4.0, 0.0], vec![5.0, 5.0], vec![6.0, 6.0]],
            &[0.0, 0.0, 0.0, 0.0],
        );
        let mut rng = RandomNumberGenerator::from_seed(2);
        let next = policy.reinsert(&parents, &offspring, 4, &ctx, &mut rng).unwrap();
        assert_eq!(next.len(), 4);
        assert!(!next.objectives().contains(&vec![6.0, 6.0]));

        let archive = policy.archive().unwrap().members().unwrap();
        assert!(archive.len() <= 2);
        for a in archive.objectives() {
            for b in archive.objectives() {
                assert_ne!(pareto_dominance(a, b), Dominance::Left);
            }
        }
        let solutions = policy.finish(&next, &ctx).unwrap();
        assert!((0..solutions.len()).all(|i| solutions.is_feasible(i)));
    }
}
