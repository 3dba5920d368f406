use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{ensure_non_empty, SelectionStrategy};

/// Uniform random selection with replacement. Fitness values are ignored
/// beyond their count.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelection;

impl SelectionStrategy for RandomSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        ensure_non_empty(fitness)?;
        Ok((0..num_to_select).map(|_| rng.index(fitness.len())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_population() {
        let mut rng = RandomNumberGenerator::from_seed(21);
        let picked = RandomSelection.select(&[0.0; 4], 400, &mut rng).unwrap();
        for i in 0..4 {
            assert!(picked.contains(&i));
        }
    }
}
