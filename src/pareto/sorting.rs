//! Feasibility-aware non-dominated sorting.
//!
//! Individuals are peeled into Pareto levels (1 = non-dominated) with the
//! constrained-dominance rule:
//!
//! 1. a feasible individual dominates any infeasible one,
//! 2. between two infeasible individuals the smaller aggregate violation
//!    (sum of positive entries) dominates,
//! 3. between two feasible individuals ordinary Pareto dominance applies on
//!    direction-adjusted (minimised) objectives.
//!
//! Sorting can stop early once a target number of individuals has been
//! leveled; the last level assigned is the critical level.

use std::cmp::Ordering;

use crate::error::{GeneticError, Result};
use crate::population::aggregate_violation;

/// Level given to individuals left unsorted by an early exit.
pub const UNRANKED: usize = usize::MAX;

/// Outcome of a dominance comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Plain Pareto comparison of two minimised objective vectors.
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Constrained dominance given precomputed aggregate violations.
pub fn constrained_dominance(a: &[f64], a_cv: f64, b: &[f64], b_cv: f64) -> Dominance {
    match (a_cv > 0.0, b_cv > 0.0) {
        (false, false) => pareto_dominance(a, b),
        (false, true) => Dominance::Left,
        (true, false) => Dominance::Right,
        (true, true) => match a_cv.partial_cmp(&b_cv) {
            Some(Ordering::Less) => Dominance::Left,
            Some(Ordering::Greater) => Dominance::Right,
            _ => Dominance::Neither,
        },
    }
}

/// Pareto levels of a set of individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct ParetoLevels {
    /// Level per individual, starting at 1. [`UNRANKED`] for individuals
    /// beyond the critical level when sorting stopped early.
    pub levels: Vec<usize>,
    /// Last level assigned.
    pub critical_level: usize,
}

impl ParetoLevels {
    /// Indices of the individuals at `level`.
    pub fn members(&self, level: usize) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == level)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of the individuals strictly above (better than) the critical level.
    pub fn above_critical(&self) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l < self.critical_level)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Sorts individuals into Pareto levels.
///
/// # Arguments
///
/// * `objectives` - One objective row per individual, already multiplied by
///   the direction signs so that every objective is minimised.
/// * `constraint_violations` - One row per individual, or an empty slice when
///   the problem is unconstrained. A row may itself be empty.
/// * `target` - Stop once at least this many individuals are leveled. `None`
///   levels everyone.
///
/// # Errors
///
/// Returns `GeneticError::EmptyPopulation` for an empty input and
/// `GeneticError::DimensionMismatch` if rows disagree in width or the
/// violation matrix has the wrong number of rows.
///
/// # Example
///
/// ```
/// use genmoea::pareto::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
///     vec![4.0, 4.0], // dominated by (3, 3)
/// ];
/// let sorted = non_dominated_sort(&objectives, &[], None).unwrap();
/// assert_eq!(sorted.levels, vec![1, 1, 1, 2]);
/// assert_eq!(sorted.critical_level, 2);
/// ```
pub fn non_dominated_sort(
    objectives: &[Vec<f64>],
    constraint_violations: &[Vec<f64>],
    target: Option<usize>,
) -> Result<ParetoLevels> {
    let n = objectives.len();
    if n == 0 {
        return Err(GeneticError::EmptyPopulation);
    }
    let m = objectives[0].len();
    if objectives.iter().any(|row| row.len() != m) {
        return Err(GeneticError::DimensionMismatch(
            "All objective rows must have the same length".to_string(),
        ));
    }
    if !constraint_violations.is_empty() && constraint_violations.len() != n {
        return Err(GeneticError::DimensionMismatch(format!(
            "{} constraint rows for {} individuals",
            constraint_violations.len(),
            n
        )));
    }

    let violations: Vec<f64> = if constraint_violations.is_empty() {
        vec![0.0; n]
    } else {
        constraint_violations
            .iter()
            .map(|row| aggregate_violation(row))
            .collect()
    };
    let target = target.unwrap_or(n).min(n);

    let mut domination_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            match constrained_dominance(&objectives[i], violations[i], &objectives[j], violations[j]) {
                Dominance::Left => {
                    dominates[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominates[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let mut levels = vec![UNRANKED; n];
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut level = 0;
    let mut leveled = 0;

    while !current.is_empty() && leveled < target {
        level += 1;
        for &i in &current {
            levels[i] = level;
        }
        leveled += current.len();

        let mut next = Vec::new();
        for &i in &current {
            for &j in &dominates[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        current = next;
    }

    Ok(ParetoLevels {
        levels,
        critical_level: level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutually_non_dominated_line() {
        let objs = vec![
            vec![1.0, 4.0],
            vec![2.0, 3.0],
            vec![3.0, 2.0],
            vec![4.0, 1.0],
        ];
        let sorted = non_dominated_sort(&objs, &[], None).unwrap();
        assert_eq!(sorted.levels, vec![1, 1, 1, 1]);
        assert_eq!(sorted.critical_level, 1);
    }

    #[test]
    fn test_clear_dominance_chain() {
        let objs = vec![vec![3.0, 3.0], vec![1.0, 1.0], vec![2.0, 2.0]];
        let sorted = non_dominated_sort(&objs, &[], None).unwrap();
        assert_eq!(sorted.levels, vec![3, 1, 2]);
        assert_eq!(sorted.critical_level, 3);
    }

    #[test]
    fn test_identical_points_share_level() {
        let objs = vec![vec![2.0, 2.0]; 3];
        let sorted = non_dominated_sort(&objs, &[], None).unwrap();
        assert!(sorted.levels.iter().all(|&l| l == 1));
    }

    #[test]
    fn test_infeasible_never_on_first_level() {
        // The infeasible individual has the best objectives by far.
        let objs = vec![
            vec![0.0, 0.0],
            vec![5.0, 1.0],
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![6.0, 6.0],
        ];
        let cv = vec![vec![2.0], vec![0.0], vec![0.0], vec![0.0], vec![-1.0]];
        let sorted = non_dominated_sort(&objs, &cv, None).unwrap();
        assert_ne!(sorted.levels[0], 1);
        assert_eq!(sorted.levels[1], 1);
        assert_eq!(sorted.levels[4], 2);
        // Feasible individuals always outrank the infeasible one.
        assert!(sorted.levels[0] > sorted.levels[4]);
    }

    #[test]
    fn test_infeasible_ordered_by_violation() {
        let objs = vec![vec![1.0], vec![0.0], vec![2.0]];
        let cv = vec![vec![1.0, 0.5], vec![3.0], vec![0.2, -4.0]];
        let sorted = non_dominated_sort(&objs, &cv, None).unwrap();
        assert_eq!(sorted.levels, vec![2, 3, 1]);
    }

    #[test]
    fn test_early_exit_at_target() {
        let objs = vec![
            vec![1.0, 1.0],
            vec![2.0, 2.0],
            vec![2.5, 1.5],
            vec![3.0, 3.0],
            vec![4.0, 4.0],
        ];
        let sorted = non_dominated_sort(&objs, &[], Some(2)).unwrap();
        assert_eq!(sorted.critical_level, 2);
        assert_eq!(sorted.levels[0], 1);
        assert_eq!(sorted.levels[1], 2);
        assert_eq!(sorted.levels[2], 2);
        assert_eq!(sorted.levels[3], UNRANKED);
        assert_eq!(sorted.levels[4], UNRANKED);
        assert_eq!(sorted.above_critical(), vec![0]);
        assert_eq!(sorted.members(2), vec![1, 2]);
    }

    #[test]
    fn test_levels_respect_dominance() {
        let objs = vec![
            vec![0.3, 0.9],
            vec![0.5, 0.5],
            vec![0.9, 0.2],
            vec![0.6, 0.7],
            vec![0.95, 0.95],
            vec![0.4, 0.95],
        ];
        let sorted = non_dominated_sort(&objs, &[], None).unwrap();
        for i in 0..objs.len() {
            for j in 0..objs.len() {
                if pareto_dominance(&objs[i], &objs[j]) == Dominance::Left {
                    assert!(sorted.levels[i] < sorted.levels[j]);
                }
                if i != j && sorted.levels[i] == sorted.levels[j] {
                    assert_eq!(pareto_dominance(&objs[i], &objs[j]), Dominance::Neither);
                }
            }
        }
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            non_dominated_sort(&[], &[], None),
            Err(GeneticError::EmptyPopulation)
        ));
        let objs = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(non_dominated_sort(&objs, &[], None).is_err());
        let objs = vec![vec![1.0], vec![2.0]];
        assert!(non_dominated_sort(&objs, &[vec![0.0]], None).is_err());
    }
}
