use std::cmp::Ordering;

use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{ensure_non_empty, SelectionStrategy};

/// Deterministic rank-based copy selection.
///
/// Individuals are ranked by fitness (descending, stable on ties) and the top
/// `num_to_select` are copied. When more individuals are requested than exist,
/// the ranking is repeated from the top.
///
/// # Examples
///
/// ```
/// use genmoea::selection::{DuplicationSelection, SelectionStrategy};
/// use genmoea::rng::RandomNumberGenerator;
///
/// let mut rng = RandomNumberGenerator::from_seed(0);
/// let picked = DuplicationSelection.select(&[0.1, 0.7, 0.4], 2, &mut rng).unwrap();
/// assert_eq!(picked, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicationSelection;

/// Indices ordered by fitness, best first. Stable for equal fitness.
pub(crate) fn ranking(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[b].partial_cmp(&fitness[a]).unwrap_or(Ordering::Equal));
    order
}

impl SelectionStrategy for DuplicationSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        ensure_non_empty(fitness)?;
        let order = ranking(fitness);
        Ok(order.iter().copied().cycle().take(num_to_select).collect())
    }
}
