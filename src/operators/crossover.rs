//! Crossover operators.
//!
//! A chromosome matrix of `N` rows is recombined pairwise: row `i` is paired
//! with row `i + N/2`. In full mode both children are returned (child of the
//! pair `i` lands in rows `i` and `i + N/2`); in half mode only the first child
//! per pair is returned, so the output has `N/2` rows. With an odd `N` the
//! last row is copied through unchanged in full mode.

use std::fmt;
use std::str::FromStr;

use crate::encoding::{Chromosomes, Encoding, Field};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Named crossover operators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossover {
    /// Partially-matched crossover for permutations.
    PartiallyMatched,
    /// Gene-wise swap with probability 0.5.
    Uniform,
    /// Swap of the segment between two cut points.
    TwoPoint,
    /// Differential-evolution exponential crossover; the probability is the
    /// per-gene continuation rate.
    Exponential,
    /// Differential-evolution binomial crossover; the probability is the
    /// per-gene rate.
    Binomial,
    /// Simulated binary crossover with distribution index `eta`.
    SimulatedBinary { eta: f64 },
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crossover::PartiallyMatched => f.write_str("partially-matched"),
            Crossover::Uniform => f.write_str("uniform"),
            Crossover::TwoPoint => f.write_str("two-point"),
            Crossover::Exponential => f.write_str("exponential"),
            Crossover::Binomial => f.write_str("binomial"),
            Crossover::SimulatedBinary { .. } => f.write_str("simulated-binary"),
        }
    }
}

impl FromStr for Crossover {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "partially-matched" | "pmx" => Ok(Crossover::PartiallyMatched),
            "uniform" => Ok(Crossover::Uniform),
            "two-point" => Ok(Crossover::TwoPoint),
            "exponential" => Ok(Crossover::Exponential),
            "binomial" => Ok(Crossover::Binomial),
            "simulated-binary" | "sbx" => Ok(Crossover::SimulatedBinary { eta: 20.0 }),
            other => Err(GeneticError::Configuration(format!(
                "Unknown crossover operator '{}'",
                other
            ))),
        }
    }
}

impl Crossover {
    pub fn supports(&self, encoding: Encoding) -> bool {
        match self {
            Crossover::PartiallyMatched => encoding == Encoding::Permutation,
            Crossover::Uniform | Crossover::TwoPoint => {
                matches!(encoding, Encoding::BinaryGray | Encoding::RealInteger)
            }
            Crossover::Exponential | Crossover::Binomial | Crossover::SimulatedBinary { .. } => {
                encoding == Encoding::RealInteger
            }
        }
    }

    /// Recombines a chromosome matrix.
    ///
    /// For pairwise operators `probability` is the chance a pair is recombined
    /// (`>= 1` always recombines). For the differential-evolution operators it
    /// is the per-gene rate.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the operator does not support the
    /// chromosome encoding.
    pub fn recombine(
        &self,
        chromosomes: &Chromosomes,
        field: &Field,
        probability: f64,
        half: bool,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes> {
        if !self.supports(chromosomes.encoding()) {
            return Err(GeneticError::Configuration(format!(
                "Crossover '{}' does not support {} chromosomes",
                self,
                chromosomes.encoding()
            )));
        }
        let out = match chromosomes {
            Chromosomes::Permutation(rows) => Chromosomes::Permutation(pairwise(
                rows,
                half,
                |a, b, rng| {
                    if rng.probability(probability) {
                        partially_matched(a, b, rng)
                    } else {
                        (a.to_vec(), b.to_vec())
                    }
                },
                rng,
            )),
            Chromosomes::Binary(rows) => Chromosomes::Binary(pairwise(
                rows,
                half,
                |a, b, rng| self.generic_pair(a, b, probability, rng),
                rng,
            )),
            Chromosomes::Real(rows) => {
                let mut children = match self {
                    Crossover::SimulatedBinary { eta } => {
                        let (lower, upper) = field.real_bounds().ok_or_else(|| {
                            GeneticError::Configuration(
                                "Simulated binary crossover needs real bounds".to_string(),
                            )
                        })?;
                        pairwise(
                            rows,
                            half,
                            |a, b, rng| {
                                if rng.probability(probability) {
                                    simulated_binary(a, b, *eta, lower, upper, rng)
                                } else {
                                    (a.to_vec(), b.to_vec())
                                }
                            },
                            rng,
                        )
                    }
                    _ => pairwise(rows, half, |a, b, rng| self.generic_pair(a, b, probability, rng), rng),
                };
                for row in &mut children {
                    field.repair(row);
                }
                Chromosomes::Real(children)
            }
        };
        Ok(out)
    }

    fn generic_pair<T: Clone>(
        &self,
        a: &[T],
        b: &[T],
        probability: f64,
        rng: &mut RandomNumberGenerator,
    ) -> (Vec<T>, Vec<T>) {
        match self {
            Crossover::Binomial => (
                binomial(a, b, probability, rng),
                binomial(b, a, probability, rng),
            ),
            Crossover::Exponential => (
                exponential(a, b, probability, rng),
                exponential(b, a, probability, rng),
            ),
            _ if !rng.probability(probability) => (a.to_vec(), b.to_vec()),
            Crossover::TwoPoint => two_point(a, b, rng),
            _ => uniform(a, b, rng),
        }
    }
}

/// Applies `cross` to the pairs `(i, i + N/2)` and lays out the children.
fn pairwise<T, F>(rows: &[Vec<T>], half: bool, mut cross: F, rng: &mut RandomNumberGenerator) -> Vec<Vec<T>>
where
    T: Clone,
    F: FnMut(&[T], &[T], &mut RandomNumberGenerator) -> (Vec<T>, Vec<T>),
{
    let pairs = rows.len() / 2;
    let mut first = Vec::with_capacity(pairs);
    let mut second = Vec::with_capacity(pairs);
    for i in 0..pairs {
        let (c1, c2) = cross(rows[i].as_slice(), rows[i + pairs].as_slice(), rng);
        first.push(c1);
        second.push(c2);
    }
    if half {
        return first;
    }
    first.extend(second);
    if rows.len() % 2 == 1 {
        first.push(rows[rows.len() - 1].clone());
    }
    first
}

/// Swaps each gene with probability 0.5.
pub fn uniform<T: Clone>(a: &[T], b: &[T], rng: &mut RandomNumberGenerator) -> (Vec<T>, Vec<T>) {
    let mut c1 = a.to_vec();
    let mut c2 = b.to_vec();
    for k in 0..a.len() {
        if rng.probability(0.5) {
            std::mem::swap(&mut c1[k], &mut c2[k]);
        }
    }
    (c1, c2)
}

/// Swaps the genes in `[lo, hi)` for two random cut points.
pub fn two_point<T: Clone>(a: &[T], b: &[T], rng: &mut RandomNumberGenerator) -> (Vec<T>, Vec<T>) {
    let n = a.len();
    let mut c1 = a.to_vec();
    let mut c2 = b.to_vec();
    if n < 2 {
        return (c1, c2);
    }
    let x = rng.index(n + 1);
    let y = rng.index(n + 1);
    let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
    c1[lo..hi].clone_from_slice(&b[lo..hi]);
    c2[lo..hi].clone_from_slice(&a[lo..hi]);
    (c1, c2)
}

/// Child of `target` taking each gene from `donor` with probability `rate`.
/// At least one gene always comes from the donor.
pub fn binomial<T: Clone>(target: &[T], donor: &[T], rate: f64, rng: &mut RandomNumberGenerator) -> Vec<T> {
    let n = target.len();
    if n == 0 {
        return Vec::new();
    }
    let forced = rng.index(n);
    (0..n)
        .map(|k| {
            if k == forced || rng.probability(rate) {
                donor[k].clone()
            } else {
                target[k].clone()
            }
        })
        .collect()
}

/// Child of `target` taking a circular run of genes from `donor`, starting at a
/// random gene and continuing while a draw is below `rate`.
pub fn exponential<T: Clone>(
    target: &[T],
    donor: &[T],
    rate: f64,
    rng: &mut RandomNumberGenerator,
) -> Vec<T> {
    let n = target.len();
    let mut child = target.to_vec();
    if n == 0 {
        return child;
    }
    let start = rng.index(n);
    let mut copied = 0;
    loop {
        let k = (start + copied) % n;
        child[k] = donor[k].clone();
        copied += 1;
        if copied >= n || !rng.probability(rate) {
            break;
        }
    }
    child
}

/// Partially-matched crossover of two permutations.
pub fn partially_matched(a: &[usize], b: &[usize], rng: &mut RandomNumberGenerator) -> (Vec<usize>, Vec<usize>) {
    let n = a.len();
    if n < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let x = rng.index(n);
    let y = rng.index(n);
    let (lo, hi) = if x <= y { (x, y + 1) } else { (y, x + 1) };
    (pmx_child(a, b, lo, hi), pmx_child(b, a, lo, hi))
}

/// Child carrying `donor[lo..hi]`, the rest from `base` with conflicts resolved
/// through the segment mapping.
fn pmx_child(base: &[usize], donor: &[usize], lo: usize, hi: usize) -> Vec<usize> {
    let n = base.len();
    // Position of each value inside the donor segment.
    let mut segment_pos = vec![usize::MAX; n];
    for k in lo..hi {
        segment_pos[donor[k]] = k;
    }
    let mut child = base.to_vec();
    child[lo..hi].copy_from_slice(&donor[lo..hi]);
    for k in (0..lo).chain(hi..n) {
        let mut value = base[k];
        while segment_pos[value] != usize::MAX {
            value = base[segment_pos[value]];
        }
        child[k] = value;
    }
    child
}

/// Simulated binary crossover of two real vectors, clipped to bounds.
pub fn simulated_binary(
    a: &[f64],
    b: &[f64],
    eta: f64,
    lower: &[f64],
    upper: &[f64],
    rng: &mut RandomNumberGenerator,
) -> (Vec<f64>, Vec<f64>) {
    let mut c1 = a.to_vec();
    let mut c2 = b.to_vec();
    for k in 0..a.len() {
        if !rng.probability(0.5) {
            continue;
        }
        let u = rng.unit();
        let beta = if u <= 0.5 {
            (2.0 * u).powf(1.0 / (eta + 1.0))
        } else {
            (1.0 / (2.0 * (1.0 - u))).powf(1.0 / (eta + 1.0))
        };
        c1[k] = (0.5 * ((1.0 + beta) * a[k] + (1.0 - beta) * b[k])).clamp(lower[k], upper[k]);
        c2[k] = (0.5 * ((1.0 - beta) * a[k] + (1.0 + beta) * b[k])).clamp(lower[k], upper[k]);
    }
    (c1, c2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(row: &[usize]) -> bool {
        let mut sorted = row.to_vec();
        sorted.sort_unstable();
        sorted == (0..row.len()).collect::<Vec<_>>()
    }

    #[test]
    fn test_pmx_keeps_permutations() {
        let mut rng = RandomNumberGenerator::from_seed(13);
        for _ in 0..50 {
            let a = rng.permutation(9);
            let b = rng.permutation(9);
            let (c1, c2) = partially_matched(&a, &b, &mut rng);
            assert!(is_permutation(&c1));
            assert!(is_permutation(&c2));
        }
    }

    #[test]
    fn test_pmx_fixed_segment() {
        let a = vec![0, 1, 2, 3, 4, 5];
        let b = vec![3, 4, 5, 0, 1, 2];
        // Segment [1, 3): child takes b[1..3] = [4, 5].
        let child = pmx_child(&a, &b, 1, 3);
        assert_eq!(child, vec![0, 4, 5, 3, 1, 2]);
    }

    #[test]
    fn test_two_point_conserves_genes_per_position() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let a = vec![true; 10];
        let b = vec![false; 10];
        let (c1, c2) = two_point(&a, &b, &mut rng);
        for k in 0..10 {
            assert_ne!(c1[k], c2[k]);
        }
    }

    #[test]
    fn test_binomial_takes_at_least_one_donor_gene() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let child = binomial(&[0.0; 5], &[1.0; 5], 0.0, &mut rng);
        assert_eq!(child.iter().filter(|&&g| g == 1.0).count(), 1);
    }

    #[test]
    fn test_exponential_full_rate_copies_donor() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let child = exponential(&[0.0; 5], &[1.0; 5], 1.0, &mut rng);
        assert_eq!(child, vec![1.0; 5]);
    }

    #[test]
    fn test_half_mode_and_pairing() {
        let field = Field::real(vec![0.0; 3], vec![10.0; 3]).unwrap();
        let chroms = Chromosomes::Real(vec![vec![1.0; 3], vec![2.0; 3], vec![7.0; 3], vec![8.0; 3]]);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let Chromosomes::Real(rows) = Crossover::Binomial
            .recombine(&chroms, &field, 1.0, true, &mut rng)
            .unwrap()
        else {
            panic!("expected real chromosomes");
        };
        // Rate 1 takes every gene from the partner row i + N/2.
        assert_eq!(rows, vec![vec![7.0; 3], vec![8.0; 3]]);
    }

    #[test]
    fn test_odd_rows_and_no_crossover() {
        let field = Field::binary(vec![2], vec![0.0], vec![3.0], false).unwrap();
        let chroms = Chromosomes::Binary(vec![vec![true, true], vec![false, false], vec![true, false]]);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let out = Crossover::Uniform
            .recombine(&chroms, &field, 0.0, false, &mut rng)
            .unwrap();
        assert_eq!(out, chroms);
    }

    #[test]
    fn test_encoding_support() {
        assert!(Crossover::PartiallyMatched.supports(Encoding::Permutation));
        assert!(!Crossover::PartiallyMatched.supports(Encoding::RealInteger));
        assert!(!Crossover::SimulatedBinary { eta: 20.0 }.supports(Encoding::BinaryGray));
        let field = Field::permutation(3).unwrap();
        let chroms = Chromosomes::Permutation(vec![vec![0, 1, 2], vec![2, 1, 0]]);
        let mut rng = RandomNumberGenerator::from_seed(1);
        assert!(Crossover::Uniform
            .recombine(&chroms, &field, 1.0, false, &mut rng)
            .is_err());
    }

    #[test]
    fn test_sbx_respects_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(10);
        let (c1, c2) = simulated_binary(&[0.0, 1.0], &[1.0, 0.0], 2.0, &[0.0, 0.0], &[1.0, 1.0], &mut rng);
        for v in c1.iter().chain(&c2) {
            assert!((0.0..=1.0).contains(v));
        }
    }
}
