use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{ensure_non_empty, SelectionStrategy};

/// A selection strategy that selects individuals through roulette wheel selection.
///
/// Roulette wheel selection (also known as fitness proportionate selection) selects
/// individuals with probability proportional to their fitness, with replacement.
///
/// This strategy requires all fitness values to be non-negative and at least
/// one of them to be positive.
///
/// # Examples
///
/// ```
/// use genmoea::selection::{RouletteWheelSelection, SelectionStrategy};
/// use genmoea::rng::RandomNumberGenerator;
///
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let selected = RouletteWheelSelection::new()
///     .select(&[0.0, 1.0, 0.0], 5, &mut rng)
///     .unwrap();
///
/// assert_eq!(selected, vec![1; 5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouletteWheelSelection;

impl RouletteWheelSelection {
    pub fn new() -> Self {
        Self
    }

    /// Cumulative selection probabilities, the last one forced to exactly `1.0`.
    fn calculate_probabilities(&self, fitness: &[f64]) -> Result<Vec<f64>> {
        if fitness.iter().any(|&f| f < 0.0) {
            return Err(GeneticError::Configuration(
                "Roulette wheel selection requires non-negative fitness values".to_string(),
            ));
        }

        let sum: f64 = fitness.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(GeneticError::Configuration(
                "Roulette wheel selection requires a positive, finite fitness sum".to_string(),
            ));
        }

        let mut cumulative = 0.0;
        let mut probs: Vec<f64> = fitness
            .iter()
            .map(|&f| {
                cumulative += f / sum;
                cumulative
            })
            .collect();

        // Guard against floating-point drift
        if let Some(last) = probs.last_mut() {
            *last = 1.0;
        }
        Ok(probs)
    }
}

impl SelectionStrategy for RouletteWheelSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        ensure_non_empty(fitness)?;
        let cumulative = self.calculate_probabilities(fitness)?;

        Ok((0..num_to_select)
            .map(|_| {
                let r = rng.unit();
                // First slot whose cumulative probability exceeds r; zero-fitness
                // slots have the same cumulative value as their predecessor.
                cumulative
                    .partition_point(|&c| c <= r)
                    .min(cumulative.len() - 1)
            })
            .collect())
    }
}
