use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{ensure_non_empty, SelectionStrategy};

/// One-to-one survivor selection.
///
/// The fitness vector holds `2n` entries: `n` targets followed by their `n`
/// trial vectors. Slot `i` keeps the trial `i + n` when its fitness is at least
/// the target's, and the target `i` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneToOneSelection;

impl SelectionStrategy for OneToOneSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        ensure_non_empty(fitness)?;
        if fitness.len() != 2 * num_to_select {
            return Err(GeneticError::DimensionMismatch(format!(
                "One-to-one survivor selection needs {} fitness values, got {}",
                2 * num_to_select,
                fitness.len()
            )));
        }
        Ok((0..num_to_select)
            .map(|i| {
                let trial = i + num_to_select;
                if fitness[trial] >= fitness[i] {
                    trial
                } else {
                    i
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairwise_replacement() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let picked = OneToOneSelection
            .select(&[1.0, 5.0, 2.0, 2.0, 4.0, 2.0], 3, &mut rng)
            .unwrap();
        assert_eq!(picked, vec![3, 1, 5]);
    }

    #[test]
    fn test_requires_double_length() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(OneToOneSelection.select(&[1.0, 2.0, 3.0], 2, &mut rng).is_err());
    }
}
