use crate::error::{GeneticError, Result};
use crate::population::aggregate_violation;

/// Scalar fitness from direction-adjusted objectives and constraint violations.
///
/// Feasible individuals score `1 + mean_k (max_k - f_k) / (max_k - min_k)`,
/// with extremes taken over the feasible individuals, so fitness lies in
/// `[1, 2]` and higher is better. Objectives without spread contribute `1`.
/// Infeasible individuals score `1 / (1 + cv)`, strictly below any feasible
/// one and decreasing with the aggregate violation `cv`.
///
/// # Errors
///
/// Returns `GeneticError::DimensionMismatch` if the violation matrix is
/// non-empty and does not have one row per individual.
///
/// # Example
///
/// ```
/// use genmoea::operators::scale_fitness;
///
/// let fitness = scale_fitness(&[vec![1.0], vec![3.0], vec![0.0]], &[vec![0.0], vec![0.0], vec![4.0]]).unwrap();
/// assert_eq!(fitness, vec![2.0, 1.0, 0.2]);
/// ```
pub fn scale_fitness(objectives: &[Vec<f64>], constraint_violations: &[Vec<f64>]) -> Result<Vec<f64>> {
    if !constraint_violations.is_empty() && constraint_violations.len() != objectives.len() {
        return Err(GeneticError::DimensionMismatch(format!(
            "{} constraint rows for {} individuals",
            constraint_violations.len(),
            objectives.len()
        )));
    }
    let violation = |i: usize| {
        constraint_violations
            .get(i)
            .map_or(0.0, |row| aggregate_violation(row))
    };

    let m = objectives.first().map_or(0, Vec::len);
    let mut lower = vec![f64::INFINITY; m];
    let mut upper = vec![f64::NEG_INFINITY; m];
    for (i, row) in objectives.iter().enumerate() {
        if violation(i) > 0.0 {
            continue;
        }
        for (k, &v) in row.iter().enumerate() {
            lower[k] = lower[k].min(v);
            upper[k] = upper[k].max(v);
        }
    }

    Ok(objectives
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cv = violation(i);
            if cv > 0.0 {
                return 1.0 / (1.0 + cv);
            }
            let score: f64 = row
                .iter()
                .enumerate()
                .map(|(k, &v)| {
                    let range = upper[k] - lower[k];
                    if range > 0.0 && range.is_finite() {
                        (upper[k] - v) / range
                    } else {
                        1.0
                    }
                })
                .sum();
            1.0 + score / m.max(1) as f64
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_spread_scores_two() {
        let fitness = scale_fitness(&[vec![3.0], vec![3.0]], &[]).unwrap();
        assert_eq!(fitness, vec![2.0, 2.0]);
    }

    #[test]
    fn test_infeasible_below_feasible() {
        let objs = vec![vec![0.0], vec![10.0], vec![-5.0], vec![-6.0]];
        let cv = vec![vec![0.0], vec![-1.0], vec![0.1], vec![2.0, 1.0]];
        let fitness = scale_fitness(&objs, &cv).unwrap();
        assert_eq!(fitness[0], 2.0);
        assert_eq!(fitness[1], 1.0);
        assert!(fitness[2] < 1.0 && fitness[3] < fitness[2]);
    }

    #[test]
    fn test_row_mismatch() {
        assert!(scale_fitness(&[vec![1.0]], &[vec![], vec![]]).is_err());
    }
}
