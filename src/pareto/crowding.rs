use std::cmp::Ordering;

use crate::error::{GeneticError, Result};
use crate::pareto::sorting::UNRANKED;

/// Crowding distance of every individual, computed independently within each
/// Pareto level.
///
/// For each objective the members of a level are sorted by that objective; the
/// two boundary members get `f64::INFINITY` and interior members accumulate the
/// gap between their neighbours divided by the objective's range inside the
/// level. Objectives with zero range contribute nothing. Individuals at
/// [`UNRANKED`] are not part of any level and get `0.0`.
///
/// # Errors
///
/// Returns `GeneticError::DimensionMismatch` if `levels` and `objectives`
/// disagree in length.
///
/// # Example
///
/// ```
/// use genmoea::pareto::crowding_distance;
///
/// let objectives = vec![vec![1.0, 4.0], vec![2.0, 3.0], vec![3.0, 2.0], vec![4.0, 1.0]];
/// let distances = crowding_distance(&objectives, &[1, 1, 1, 1]).unwrap();
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[3].is_infinite());
/// assert!((distances[1] - 4.0 / 3.0).abs() < 1e-12);
/// assert_eq!(distances[1], distances[2]);
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>], levels: &[usize]) -> Result<Vec<f64>> {
    if objectives.len() != levels.len() {
        return Err(GeneticError::DimensionMismatch(format!(
            "{} objective rows for {} levels",
            objectives.len(),
            levels.len()
        )));
    }
    let mut distances = vec![0.0; objectives.len()];
    let max_level = levels
        .iter()
        .copied()
        .filter(|&l| l != UNRANKED)
        .max()
        .unwrap_or(0);

    for level in 1..=max_level {
        let members: Vec<usize> = (0..levels.len()).filter(|&i| levels[i] == level).collect();
        for (i, d) in members.iter().zip(level_distances(objectives, &members)) {
            distances[*i] = d;
        }
    }
    Ok(distances)
}

/// Crowding distance for one group of individuals, in the order of `members`.
pub(crate) fn level_distances(objectives: &[Vec<f64>], members: &[usize]) -> Vec<f64> {
    let n = members.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[members[0]].len();
    let mut distances = vec![0.0; n];
    let mut order: Vec<usize> = (0..n).collect();

    for k in 0..m {
        let value = |pos: usize| objectives[members[pos]][k];
        order.sort_by(|&a, &b| value(a).partial_cmp(&value(b)).unwrap_or(Ordering::Equal));

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = value(order[n - 1]) - value(order[0]);
        if range > 0.0 {
            for w in 1..(n - 1) {
                distances[order[w]] += (value(order[w + 1]) - value(order[w - 1])) / range;
            }
        }
    }

    distances
}
