//! Mutation operators.
//!
//! The mutation probability `pm` is a per-chromosome figure; gene-wise
//! operators spread it as `pm / length` per gene. Real-valued results are
//! always repaired into the field (clipped, integer variables rounded).

use std::fmt;
use std::str::FromStr;

use crate::encoding::{Chromosomes, Encoding, Field};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Named mutation operators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    /// Reverses a random segment of a permutation.
    Inversion,
    /// Flips bits.
    BitFlip,
    /// Polynomial mutation with distribution index `eta`.
    Polynomial { eta: f64 },
    /// Breeder GA mutation: a step of up to half the range, biased towards small steps.
    Breeder,
    /// Redraws genes uniformly inside their bounds.
    Uniform,
    /// Adds normal noise with deviation `magnification * range / 18`.
    Gaussian { magnification: f64 },
    /// Differential mutation `x_r0 + F (x_r1 - x_r2)`; applied through
    /// [`differential`] since it needs base vectors and a scale factor.
    Differential,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Inversion => f.write_str("inversion"),
            Mutation::BitFlip => f.write_str("bit-flip"),
            Mutation::Polynomial { .. } => f.write_str("polynomial"),
            Mutation::Breeder => f.write_str("breeder"),
            Mutation::Uniform => f.write_str("uniform"),
            Mutation::Gaussian { .. } => f.write_str("gaussian"),
            Mutation::Differential => f.write_str("differential"),
        }
    }
}

impl FromStr for Mutation {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inversion" => Ok(Mutation::Inversion),
            "bit-flip" => Ok(Mutation::BitFlip),
            "polynomial" => Ok(Mutation::Polynomial { eta: 20.0 }),
            "breeder" => Ok(Mutation::Breeder),
            "uniform" => Ok(Mutation::Uniform),
            "gaussian" => Ok(Mutation::Gaussian { magnification: 1.0 }),
            "differential" => Ok(Mutation::Differential),
            other => Err(GeneticError::Configuration(format!(
                "Unknown mutation operator '{}'",
                other
            ))),
        }
    }
}

/// Differential-evolution scale factor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleFactor {
    Scalar(f64),
    /// One factor per individual, indexed like the population.
    PerIndividual(Vec<f64>),
}

impl ScaleFactor {
    fn at(&self, i: usize) -> Result<f64> {
        match self {
            ScaleFactor::Scalar(f) => Ok(*f),
            ScaleFactor::PerIndividual(fs) => fs.get(i).copied().ok_or_else(|| {
                GeneticError::DimensionMismatch(format!(
                    "No scale factor for individual {} ({} given)",
                    i,
                    fs.len()
                ))
            }),
        }
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        ScaleFactor::Scalar(0.5)
    }
}

impl Mutation {
    pub fn supports(&self, encoding: Encoding) -> bool {
        match self {
            Mutation::Inversion => encoding == Encoding::Permutation,
            Mutation::BitFlip => encoding == Encoding::BinaryGray,
            _ => encoding == Encoding::RealInteger,
        }
    }

    /// Mutates a chromosome matrix with chromosome-level probability `pm`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for unsupported encodings and for
    /// [`Mutation::Differential`], which is applied through [`differential`].
    pub fn mutate(
        &self,
        chromosomes: &Chromosomes,
        field: &Field,
        pm: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes> {
        if !self.supports(chromosomes.encoding()) {
            return Err(GeneticError::Configuration(format!(
                "Mutation '{}' does not support {} chromosomes",
                self,
                chromosomes.encoding()
            )));
        }
        match (self, chromosomes) {
            (Mutation::Inversion, Chromosomes::Permutation(rows)) => Ok(Chromosomes::Permutation(
                rows.iter().map(|row| inversion(row, pm, rng)).collect(),
            )),
            (Mutation::BitFlip, Chromosomes::Binary(rows)) => Ok(Chromosomes::Binary(
                rows.iter().map(|row| bit_flip(row, pm, rng)).collect(),
            )),
            (Mutation::Differential, _) => Err(GeneticError::Configuration(
                "Differential mutation needs base vectors and a scale factor".to_string(),
            )),
            (_, Chromosomes::Real(rows)) => {
                let (lower, upper) = field.real_bounds().ok_or_else(|| {
                    GeneticError::Configuration("Real mutation needs real bounds".to_string())
                })?;
                let mut out = Vec::with_capacity(rows.len());
                for row in rows {
                    let mut child = row.clone();
                    let gene_pm = pm / row.len().max(1) as f64;
                    for k in 0..child.len() {
                        if rng.probability(gene_pm) {
                            child[k] = self.mutate_gene(child[k], lower[k], upper[k], rng)?;
                        }
                    }
                    field.repair(&mut child);
                    out.push(child);
                }
                Ok(Chromosomes::Real(out))
            }
            _ => Err(GeneticError::Configuration(format!(
                "Mutation '{}' does not match the chromosome layout",
                self
            ))),
        }
    }

    fn mutate_gene(&self, x: f64, lower: f64, upper: f64, rng: &mut RandomNumberGenerator) -> Result<f64> {
        let range = upper - lower;
        let value = match self {
            Mutation::Polynomial { eta } => polynomial(x, lower, upper, *eta, rng),
            Mutation::Breeder => {
                let delta: f64 = (0..16)
                    .filter(|_| rng.probability(1.0 / 16.0))
                    .map(|i| 2f64.powi(-i))
                    .sum();
                let step = 0.5 * range * delta;
                if rng.probability(0.5) {
                    x + step
                } else {
                    x - step
                }
            }
            Mutation::Uniform => rng.uniform(lower, upper),
            Mutation::Gaussian { magnification } => {
                x + rng.normal(0.0, magnification * range / 18.0)?
            }
            _ => x,
        };
        Ok(value.clamp(lower, upper))
    }
}

/// Reverses a random segment with probability `pm`.
pub fn inversion(row: &[usize], pm: f64, rng: &mut RandomNumberGenerator) -> Vec<usize> {
    let mut child = row.to_vec();
    if child.len() < 2 || !rng.probability(pm) {
        return child;
    }
    let x = rng.index(child.len());
    let y = rng.index(child.len());
    let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
    child[lo..=hi].reverse();
    child
}

/// Flips each bit with probability `pm / length`.
pub fn bit_flip(row: &[bool], pm: f64, rng: &mut RandomNumberGenerator) -> Vec<bool> {
    let gene_pm = pm / row.len().max(1) as f64;
    row.iter().map(|&bit| if rng.probability(gene_pm) { !bit } else { bit }).collect()
}

/// Polynomial mutation of one bounded value.
pub fn polynomial(x: f64, lower: f64, upper: f64, eta: f64, rng: &mut RandomNumberGenerator) -> f64 {
    let range = upper - lower;
    if range <= 0.0 {
        return x;
    }
    let u = rng.unit();
    let delta1 = (x - lower) / range;
    let delta2 = (upper - x) / range;
    let delta_q = if u < 0.5 {
        let val = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - delta1).powf(eta + 1.0);
        val.powf(1.0 / (eta + 1.0)) - 1.0
    } else {
        let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - delta2).powf(eta + 1.0);
        1.0 - val.powf(1.0 / (eta + 1.0))
    };
    (x + delta_q * range).clamp(lower, upper)
}

/// Differential mutation of a real chromosome matrix.
///
/// Mutant `i` is `x[base[i]] + F_i (x[r1] - x[r2])` with `r1`, `r2` drawn
/// distinct from each other and from `base[i]` whenever the population allows.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` for non-real chromosomes and
/// `GeneticError::DimensionMismatch` if `base` or a per-individual scale factor
/// does not cover the population.
pub fn differential(
    chromosomes: &Chromosomes,
    field: &Field,
    base: &[usize],
    scale: &ScaleFactor,
    rng: &mut RandomNumberGenerator,
) -> Result<Chromosomes> {
    let Chromosomes::Real(rows) = chromosomes else {
        return Err(GeneticError::Configuration(format!(
            "Differential mutation needs real-valued chromosomes, got {}",
            chromosomes.encoding()
        )));
    };
    let n = rows.len();
    if n == 0 {
        return Err(GeneticError::EmptyPopulation);
    }
    if base.len() != n || base.iter().any(|&b| b >= n) {
        return Err(GeneticError::DimensionMismatch(format!(
            "{} base vectors for a population of {}",
            base.len(),
            n
        )));
    }

    let mut mutants = Vec::with_capacity(n);
    for (i, &r0) in base.iter().enumerate() {
        let f = scale.at(i)?;
        let r1 = draw_distinct(n, &[r0], rng);
        let r2 = draw_distinct(n, &[r0, r1], rng);
        let mut mutant: Vec<f64> = rows[r0]
            .iter()
            .zip(&rows[r1])
            .zip(&rows[r2])
            .map(|((x0, x1), x2)| x0 + f * (x1 - x2))
            .collect();
        field.repair(&mut mutant);
        mutants.push(mutant);
    }
    Ok(Chromosomes::Real(mutants))
}

/// Draws an index in `0..n` avoiding `taken` when enough indices remain.
fn draw_distinct(n: usize, taken: &[usize], rng: &mut RandomNumberGenerator) -> usize {
    let free: Vec<usize> = (0..n).filter(|i| !taken.contains(i)).collect();
    if free.is_empty() {
        rng.index(n)
    } else {
        free[rng.index(free.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inversion_keeps_permutation() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let row = vec![0, 1, 2, 3, 4, 5, 6];
        for _ in 0..20 {
            let mut child = inversion(&row, 1.0, &mut rng);
            child.sort_unstable();
            assert_eq!(child, row);
        }
    }

    #[test]
    fn test_bit_flip_full_probability_on_single_bit() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        assert_eq!(bit_flip(&[true], 1.0, &mut rng), vec![false]);
        assert_eq!(bit_flip(&[true, false], 0.0, &mut rng), vec![true, false]);
    }

    #[test]
    fn test_real_mutations_stay_in_bounds() {
        let field = Field::real_integer(vec![-1.0, 0.0], vec![1.0, 5.0], vec![false, true]).unwrap();
        let chroms = Chromosomes::Real(vec![vec![0.9, 4.0]; 30]);
        let mut rng = RandomNumberGenerator::from_seed(8);
        for op in [
            Mutation::Polynomial { eta: 20.0 },
            Mutation::Breeder,
            Mutation::Uniform,
            Mutation::Gaussian { magnification: 3.0 },
        ] {
            let Chromosomes::Real(rows) = op.mutate(&chroms, &field, 2.0, &mut rng).unwrap() else {
                panic!("expected real chromosomes");
            };
            for row in rows {
                assert!((-1.0..=1.0).contains(&row[0]));
                assert!((0.0..=5.0).contains(&row[1]));
                assert_eq!(row[1], row[1].round());
            }
        }
    }

    #[test]
    fn test_differential_with_zero_scale_copies_base() {
        let field = Field::real(vec![0.0], vec![10.0]).unwrap();
        let chroms = Chromosomes::Real(vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let out = differential(&chroms, &field, &[3, 2, 1, 0], &ScaleFactor::Scalar(0.0), &mut rng)
            .unwrap();
        assert_eq!(out, Chromosomes::Real(vec![vec![4.0], vec![3.0], vec![2.0], vec![1.0]]));
    }

    #[test]
    fn test_differential_checks_inputs() {
        let field = Field::real(vec![0.0], vec![10.0]).unwrap();
        let chroms = Chromosomes::Real(vec![vec![1.0], vec![2.0]]);
        let mut rng = RandomNumberGenerator::from_seed(3);
        assert!(differential(&chroms, &field, &[0], &ScaleFactor::default(), &mut rng).is_err());
        let per = ScaleFactor::PerIndividual(vec![0.5]);
        assert!(differential(&chroms, &field, &[0, 1], &per, &mut rng).is_err());
        let perm = Chromosomes::Permutation(vec![vec![0, 1]]);
        assert!(differential(&perm, &field, &[0], &ScaleFactor::default(), &mut rng).is_err());
    }

    #[test]
    fn test_support_and_parsing() {
        assert!(Mutation::BitFlip.supports(Encoding::BinaryGray));
        assert!(!Mutation::BitFlip.supports(Encoding::RealInteger));
        assert!(Mutation::Breeder.supports(Encoding::RealInteger));
        assert_eq!("bit-flip".parse::<Mutation>().unwrap(), Mutation::BitFlip);
        assert!("mutgau".parse::<Mutation>().is_err());
    }
}
