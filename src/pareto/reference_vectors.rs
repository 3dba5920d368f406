//! Adaptive reference vectors and angle-penalised distance selection.

use std::f64::consts::FRAC_PI_2;

use tracing::warn;

use crate::error::{GeneticError, Result};
use crate::population::aggregate_violation;

const NORM_EPS: f64 = 1e-12;

/// Reference vectors with a cached neighbour angle per vector.
///
/// The base set (usually simplex points) is kept so that the working vectors
/// can be rescaled to the observed objective range. Rescaling invalidates the
/// cached angles.
#[derive(Debug, Clone)]
pub struct ReferenceVectors {
    base: Vec<Vec<f64>>,
    vectors: Vec<Vec<f64>>,
    gamma: Option<Vec<f64>>,
}

impl ReferenceVectors {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for an empty set and
    /// `GeneticError::DimensionMismatch` for rows of different length.
    pub fn new(base: Vec<Vec<f64>>) -> Result<Self> {
        let Some(first) = base.first() else {
            return Err(GeneticError::Configuration(
                "Reference vector set is empty".to_string(),
            ));
        };
        let m = first.len();
        if m == 0 || base.iter().any(|v| v.len() != m) {
            return Err(GeneticError::DimensionMismatch(
                "Reference vectors must be non-empty and of equal length".to_string(),
            ));
        }
        Ok(Self {
            vectors: base.clone(),
            base,
            gamma: None,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }

    /// Rescales the working vectors to the objective range of `objectives`.
    ///
    /// Returns `false` and leaves the vectors untouched when some objective has
    /// a zero or non-finite range.
    pub fn rescale(&mut self, objectives: &[Vec<f64>]) -> bool {
        let Some(first) = objectives.first() else {
            warn!("Skipping reference vector rescale: no objective rows");
            return false;
        };
        let m = first.len();
        let mut lower = vec![f64::INFINITY; m];
        let mut upper = vec![f64::NEG_INFINITY; m];
        for row in objectives {
            for (k, &v) in row.iter().enumerate() {
                lower[k] = lower[k].min(v);
                upper[k] = upper[k].max(v);
            }
        }
        let range: Vec<f64> = upper.iter().zip(&lower).map(|(u, l)| u - l).collect();
        if range.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            warn!(?range, "Skipping reference vector rescale: degenerate objective range");
            return false;
        }

        self.vectors = self
            .base
            .iter()
            .map(|v| v.iter().zip(&range).map(|(c, r)| c * r).collect())
            .collect();
        self.gamma = None;
        true
    }

    fn unit_vectors(&self) -> Vec<Vec<f64>> {
        self.vectors
            .iter()
            .map(|v| {
                let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt().max(NORM_EPS);
                v.iter().map(|c| c / norm).collect()
            })
            .collect()
    }

    /// Smallest angle between each vector and any other vector.
    ///
    /// Computed on first use after construction or rescaling.
    pub fn neighbour_angles(&mut self) -> &[f64] {
        if self.gamma.is_none() {
            let units = self.unit_vectors();
            let angles = (0..units.len())
                .map(|i| {
                    let closest = (0..units.len())
                        .filter(|&j| j != i)
                        .map(|j| cosine(&units[i], &units[j]))
                        .fold(f64::NEG_INFINITY, f64::max);
                    if closest.is_finite() {
                        closest.clamp(-1.0, 1.0).acos().max(NORM_EPS)
                    } else {
                        FRAC_PI_2
                    }
                })
                .collect();
            self.gamma = Some(angles);
        }
        self.gamma.as_deref().unwrap_or(&[])
    }

    /// Angle-penalised distance selection.
    ///
    /// Objectives are translated by their minimum, each individual is
    /// associated with the vector at the smallest angle, and every vector
    /// keeps at most one member: the feasible one with the smallest
    /// `‖f'‖ · (1 + penalty · angle / gamma)`, or, if none of its members is
    /// feasible, the one with the smallest aggregate violation.
    ///
    /// # Arguments
    ///
    /// * `objectives` - Direction-adjusted (minimised) objective rows.
    /// * `constraint_violations` - One row per individual, or empty.
    /// * `penalty` - Angle penalty factor, see [`angle_penalty`].
    ///
    /// # Returns
    ///
    /// Indices of the retained individuals in ascending order.
    pub fn select(
        &mut self,
        objectives: &[Vec<f64>],
        constraint_violations: &[Vec<f64>],
        penalty: f64,
    ) -> Result<Vec<usize>> {
        let Some(first) = objectives.first() else {
            return Err(GeneticError::EmptyPopulation);
        };
        let m = first.len();
        if m != self.vectors[0].len() {
            return Err(GeneticError::DimensionMismatch(format!(
                "{} objectives for reference vectors of dimension {}",
                m,
                self.vectors[0].len()
            )));
        }
        if !constraint_violations.is_empty() && constraint_violations.len() != objectives.len() {
            return Err(GeneticError::DimensionMismatch(
                "Constraint rows do not match objective rows".to_string(),
            ));
        }

        let mut ideal = vec![f64::INFINITY; m];
        for row in objectives {
            for (k, &v) in row.iter().enumerate() {
                ideal[k] = ideal[k].min(v);
            }
        }
        let units = self.unit_vectors();
        let gamma = self.neighbour_angles().to_vec();

        // Best (apd, index) per vector among feasible members, and (cv, index) among infeasible.
        let mut best_feasible: Vec<Option<(f64, usize)>> = vec![None; units.len()];
        let mut best_infeasible: Vec<Option<(f64, usize)>> = vec![None; units.len()];

        for (i, row) in objectives.iter().enumerate() {
            let shifted: Vec<f64> = row.iter().zip(&ideal).map(|(v, z)| v - z).collect();
            let norm = shifted.iter().map(|c| c * c).sum::<f64>().sqrt();
            let direction: Vec<f64> = shifted.iter().map(|c| c / norm.max(NORM_EPS)).collect();

            let (j, cos) = units
                .iter()
                .enumerate()
                .map(|(j, u)| (j, cosine(&direction, u)))
                .fold((0, f64::NEG_INFINITY), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
            let angle = cos.clamp(-1.0, 1.0).acos();

            let cv = constraint_violations
                .get(i)
                .map_or(0.0, |r| aggregate_violation(r));
            if cv > 0.0 {
                if best_infeasible[j].map_or(true, |(b, _)| cv < b) {
                    best_infeasible[j] = Some((cv, i));
                }
            } else {
                let apd = norm * (1.0 + penalty * angle / gamma[j]);
                if best_feasible[j].map_or(true, |(b, _)| apd < b) {
                    best_feasible[j] = Some((apd, i));
                }
            }
        }

        let mut chosen: Vec<usize> = best_feasible
            .into_iter()
            .zip(best_infeasible)
            .filter_map(|(f, inf)| f.or(inf).map(|(_, i)| i))
            .collect();
        chosen.sort_unstable();
        Ok(chosen)
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Angle penalty `M · (generation / max_generations)^alpha`.
pub fn angle_penalty(num_objectives: usize, generation: usize, max_generations: usize, alpha: f64) -> f64 {
    if max_generations == 0 {
        return num_objectives as f64;
    }
    let progress = (generation as f64 / max_generations as f64).min(1.0);
    num_objectives as f64 * progress.powf(alpha)
}
