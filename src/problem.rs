//! # Problem
//!
//! The `Problem` trait is the contract between the evolution engine and the
//! objective/constraint evaluation. Implementors describe how many objectives
//! there are, whether each is minimised or maximised, and how to evaluate a
//! decoded individual.
//!
//! Batch evaluation defaults to evaluating rows independently, in parallel
//! with `rayon` once the batch is large enough. Results always come back in
//! input order; the engine never re-aligns them.
//!
//! ## Example
//!
//! ```rust
//! use genmoea::problem::{Evaluation, Problem};
//! use genmoea::error::Result;
//!
//! struct Schaffer;
//!
//! impl Problem for Schaffer {
//!     fn num_objectives(&self) -> usize {
//!         2
//!     }
//!
//!     fn evaluate_individual(&self, phenotype: &[f64]) -> Result<Evaluation> {
//!         let x = phenotype[0];
//!         Ok(Evaluation::unconstrained(vec![x * x, (x - 2.0).powi(2)]))
//!     }
//! }
//!
//! let rows = Schaffer.evaluate(&[vec![0.0], vec![2.0]], 1000).unwrap();
//! assert_eq!(rows[1].objectives, vec![4.0, 0.0]);
//! ```

use rayon::prelude::*;

use crate::error::Result;

/// Optimisation direction of one objective.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

impl Direction {
    /// `+1` for minimisation, `-1` for maximisation. Objectives are multiplied
    /// by the sign before any comparison.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Minimize => 1.0,
            Direction::Maximize => -1.0,
        }
    }
}

/// Objective values and constraint violations of one individual.
///
/// A constraint entry `<= 0` is satisfied; an empty vector means unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub objectives: Vec<f64>,
    pub constraint_violations: Vec<f64>,
}

impl Evaluation {
    pub fn new(objectives: Vec<f64>, constraint_violations: Vec<f64>) -> Self {
        Self {
            objectives,
            constraint_violations,
        }
    }

    pub fn unconstrained(objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            constraint_violations: Vec::new(),
        }
    }
}

/// An optimisation problem evaluated by the engine.
pub trait Problem: Send + Sync {
    /// Number of objectives `M`.
    fn num_objectives(&self) -> usize;

    /// Direction of each objective. Defaults to minimising all of them.
    fn directions(&self) -> Vec<Direction> {
        vec![Direction::Minimize; self.num_objectives()]
    }

    /// Evaluates one decoded individual.
    fn evaluate_individual(&self, phenotype: &[f64]) -> Result<Evaluation>;

    /// Evaluates a batch of decoded individuals, preserving row order.
    ///
    /// The default evaluates rows independently and switches to a parallel
    /// iterator when the batch has at least `parallel_threshold` rows. Override
    /// this for vectorised evaluation; the returned vector must have exactly
    /// one entry per input row.
    fn evaluate(&self, phenotypes: &[Vec<f64>], parallel_threshold: usize) -> Result<Vec<Evaluation>> {
        if phenotypes.len() >= parallel_threshold {
            phenotypes
                .par_iter()
                .map(|row| self.evaluate_individual(row))
                .collect()
        } else {
            phenotypes
                .iter()
                .map(|row| self.evaluate_individual(row))
                .collect()
        }
    }
}

/// Direction signs of a problem, `+1` minimise / `-1` maximise.
pub fn direction_signs<P: Problem + ?Sized>(problem: &P) -> Vec<f64> {
    problem.directions().into_iter().map(Direction::sign).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;

    struct Sphere;

    impl Problem for Sphere {
        fn num_objectives(&self) -> usize {
            1
        }

        fn directions(&self) -> Vec<Direction> {
            vec![Direction::Maximize]
        }

        fn evaluate_individual(&self, phenotype: &[f64]) -> Result<Evaluation> {
            if phenotype.is_empty() {
                return Err(GeneticError::Evaluation("empty phenotype".to_string()));
            }
            Ok(Evaluation::unconstrained(vec![phenotype.iter().map(|x| x * x).sum()]))
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let rows: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64, 1.0]).collect();
        let sequential = Sphere.evaluate(&rows, usize::MAX).unwrap();
        let parallel = Sphere.evaluate(&rows, 1).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(parallel[3].objectives, vec![10.0]);
    }

    #[test]
    fn test_errors_propagate() {
        let rows = vec![vec![1.0], vec![]];
        assert!(Sphere.evaluate(&rows, 1).is_err());
        assert!(Sphere.evaluate(&rows, 100).is_err());
    }

    #[test]
    fn test_direction_signs() {
        assert_eq!(direction_signs(&Sphere), vec![-1.0]);
    }
}
