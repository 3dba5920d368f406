//! # Encodings
//!
//! A population's chromosomes use one of three encodings:
//!
//! - [`Encoding::BinaryGray`]: bit strings, decoded per variable to a real
//!   value inside its bounds, optionally through gray code.
//! - [`Encoding::RealInteger`]: the chromosome is the decision vector; some
//!   variables may be integer-valued.
//! - [`Encoding::Permutation`]: the chromosome is a permutation of `0..n`.
//!
//! The [`Field`] carries the bounds and layout for an encoding, and the
//! encoding tag is derived from it. [`Chromosomes`] stores one row per
//! individual with a gene type matching the encoding.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// The encoding category of a population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    BinaryGray,
    RealInteger,
    Permutation,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::BinaryGray => "binary-gray",
            Encoding::RealInteger => "real-integer",
            Encoding::Permutation => "permutation",
        };
        f.write_str(name)
    }
}

impl FromStr for Encoding {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "binary-gray" | "binary" => Ok(Encoding::BinaryGray),
            "real-integer" | "real" => Ok(Encoding::RealInteger),
            "permutation" => Ok(Encoding::Permutation),
            other => Err(GeneticError::Configuration(format!(
                "Unknown encoding '{}'",
                other
            ))),
        }
    }
}

/// Decision-variable layout and bounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Each variable occupies `lengths[k]` bits and decodes into `[lower[k], upper[k]]`.
    BinaryGray {
        lengths: Vec<usize>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        gray: bool,
    },
    /// Variables live in `[lower[k], upper[k]]`; `integer[k]` rounds variable `k`.
    RealInteger {
        lower: Vec<f64>,
        upper: Vec<f64>,
        integer: Vec<bool>,
    },
    /// Chromosomes are permutations of `0..size`.
    Permutation { size: usize },
}

impl Field {
    /// Creates a binary/gray field.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the vectors disagree in length, a
    /// variable has zero bits, or a lower bound exceeds its upper bound.
    pub fn binary(lengths: Vec<usize>, lower: Vec<f64>, upper: Vec<f64>, gray: bool) -> Result<Self> {
        if lengths.is_empty() || lengths.len() != lower.len() || lower.len() != upper.len() {
            return Err(GeneticError::Configuration(format!(
                "Binary field needs equally sized, non-empty lengths ({}), lower ({}) and upper ({})",
                lengths.len(),
                lower.len(),
                upper.len()
            )));
        }
        if lengths.iter().any(|&l| l == 0 || l > 52) {
            return Err(GeneticError::Configuration(
                "Binary variables must use between 1 and 52 bits".to_string(),
            ));
        }
        check_bounds(&lower, &upper)?;
        Ok(Field::BinaryGray {
            lengths,
            lower,
            upper,
            gray,
        })
    }

    /// Creates a real/integer field with all variables continuous.
    pub fn real(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        let integer = vec![false; lower.len()];
        Self::real_integer(lower, upper, integer)
    }

    /// Creates a real/integer field.
    pub fn real_integer(lower: Vec<f64>, upper: Vec<f64>, integer: Vec<bool>) -> Result<Self> {
        if lower.is_empty() || lower.len() != upper.len() || upper.len() != integer.len() {
            return Err(GeneticError::Configuration(format!(
                "Real field needs equally sized, non-empty lower ({}), upper ({}) and integer ({})",
                lower.len(),
                upper.len(),
                integer.len()
            )));
        }
        check_bounds(&lower, &upper)?;
        for (k, _) in integer.iter().enumerate().filter(|(_, &is_integer)| is_integer) {
            if lower[k].ceil() > upper[k].floor() {
                return Err(GeneticError::Configuration(format!(
                    "Integer variable {} has no integer in [{}, {}]",
                    k, lower[k], upper[k]
                )));
            }
        }
        Ok(Field::RealInteger {
            lower,
            upper,
            integer,
        })
    }

    /// Creates a permutation field over `0..size`.
    pub fn permutation(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(GeneticError::Configuration(
                "Permutation field needs at least two elements".to_string(),
            ));
        }
        Ok(Field::Permutation { size })
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Field::BinaryGray { .. } => Encoding::BinaryGray,
            Field::RealInteger { .. } => Encoding::RealInteger,
            Field::Permutation { .. } => Encoding::Permutation,
        }
    }

    /// Number of decision variables after decoding.
    pub fn num_variables(&self) -> usize {
        match self {
            Field::BinaryGray { lengths, .. } => lengths.len(),
            Field::RealInteger { lower, .. } => lower.len(),
            Field::Permutation { size } => *size,
        }
    }

    /// Number of genes in a chromosome.
    pub fn chromosome_length(&self) -> usize {
        match self {
            Field::BinaryGray { lengths, .. } => lengths.iter().sum(),
            Field::RealInteger { lower, .. } => lower.len(),
            Field::Permutation { size } => *size,
        }
    }

    /// Clips real genes to their bounds and rounds integer variables.
    ///
    /// Does nothing for other encodings.
    pub fn repair(&self, genes: &mut [f64]) {
        if let Field::RealInteger {
            lower,
            upper,
            integer,
        } = self
        {
            for (k, gene) in genes.iter_mut().enumerate() {
                let mut value = gene.clamp(lower[k], upper[k]);
                if integer[k] {
                    value = value.round().clamp(lower[k].ceil(), upper[k].floor());
                }
                *gene = value;
            }
        }
    }

    /// Real bounds per gene, if the field is real-valued.
    pub fn real_bounds(&self) -> Option<(&[f64], &[f64])> {
        match self {
            Field::RealInteger { lower, upper, .. } => Some((lower, upper)),
            _ => None,
        }
    }
}

fn check_bounds(lower: &[f64], upper: &[f64]) -> Result<()> {
    for (k, (lo, hi)) in lower.iter().zip(upper).enumerate() {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(GeneticError::Configuration(format!(
                "Invalid bounds for variable {}: [{}, {}]",
                k, lo, hi
            )));
        }
    }
    Ok(())
}

/// Chromosome matrix, one row per individual.
#[derive(Debug, Clone, PartialEq)]
pub enum Chromosomes {
    Binary(Vec<Vec<bool>>),
    Real(Vec<Vec<f64>>),
    Permutation(Vec<Vec<usize>>),
}

impl Chromosomes {
    /// Creates `size` random chromosomes for the given field.
    pub fn random(field: &Field, size: usize, rng: &mut RandomNumberGenerator) -> Self {
        match field {
            Field::BinaryGray { .. } => {
                let len = field.chromosome_length();
                Chromosomes::Binary(
                    (0..size)
                        .map(|_| (0..len).map(|_| rng.probability(0.5)).collect())
                        .collect(),
                )
            }
            Field::RealInteger { lower, upper, .. } => Chromosomes::Real(
                (0..size)
                    .map(|_| {
                        let mut genes: Vec<f64> = lower
                            .iter()
                            .zip(upper)
                            .map(|(&lo, &hi)| rng.uniform(lo, hi))
                            .collect();
                        field.repair(&mut genes);
                        genes
                    })
                    .collect(),
            ),
            Field::Permutation { size: n } => {
                Chromosomes::Permutation((0..size).map(|_| rng.permutation(*n)).collect())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Chromosomes::Binary(rows) => rows.len(),
            Chromosomes::Real(rows) => rows.len(),
            Chromosomes::Permutation(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Chromosomes::Binary(_) => Encoding::BinaryGray,
            Chromosomes::Real(_) => Encoding::RealInteger,
            Chromosomes::Permutation(_) => Encoding::Permutation,
        }
    }

    /// Checks that every row matches the field's encoding and chromosome length.
    pub fn validate(&self, field: &Field) -> Result<()> {
        if self.encoding() != field.encoding() {
            return Err(GeneticError::Configuration(format!(
                "Chromosomes are {} but the field is {}",
                self.encoding(),
                field.encoding()
            )));
        }
        let expected = field.chromosome_length();
        let lengths: Vec<usize> = match self {
            Chromosomes::Binary(rows) => rows.iter().map(Vec::len).collect(),
            Chromosomes::Real(rows) => rows.iter().map(Vec::len).collect(),
            Chromosomes::Permutation(rows) => rows.iter().map(Vec::len).collect(),
        };
        if let Some((row, len)) = lengths.iter().enumerate().find(|(_, &l)| l != expected) {
            return Err(GeneticError::DimensionMismatch(format!(
                "Chromosome {} has {} genes, expected {}",
                row, len, expected
            )));
        }
        Ok(())
    }

    /// Returns the rows at `indices`, in order. Indices may repeat.
    pub fn subset(&self, indices: &[usize]) -> Self {
        match self {
            Chromosomes::Binary(rows) => {
                Chromosomes::Binary(indices.iter().map(|&i| rows[i].clone()).collect())
            }
            Chromosomes::Real(rows) => {
                Chromosomes::Real(indices.iter().map(|&i| rows[i].clone()).collect())
            }
            Chromosomes::Permutation(rows) => {
                Chromosomes::Permutation(indices.iter().map(|&i| rows[i].clone()).collect())
            }
        }
    }

    /// Stacks `other` below `self`.
    pub fn concat(&self, other: &Chromosomes) -> Result<Self> {
        match (self, other) {
            (Chromosomes::Binary(a), Chromosomes::Binary(b)) => {
                Ok(Chromosomes::Binary(a.iter().chain(b).cloned().collect()))
            }
            (Chromosomes::Real(a), Chromosomes::Real(b)) => {
                Ok(Chromosomes::Real(a.iter().chain(b).cloned().collect()))
            }
            (Chromosomes::Permutation(a), Chromosomes::Permutation(b)) => {
                Ok(Chromosomes::Permutation(a.iter().chain(b).cloned().collect()))
            }
            _ => Err(GeneticError::IncompatiblePopulations(format!(
                "Cannot concatenate {} and {} chromosomes",
                self.encoding(),
                other.encoding()
            ))),
        }
    }

    /// Number of distinct rows.
    pub fn unique_rows(&self) -> usize {
        match self {
            Chromosomes::Binary(rows) => rows.iter().collect::<HashSet<_>>().len(),
            Chromosomes::Permutation(rows) => rows.iter().collect::<HashSet<_>>().len(),
            Chromosomes::Real(rows) => rows
                .iter()
                .map(|row| row.iter().map(|g| g.to_bits()).collect::<Vec<u64>>())
                .collect::<HashSet<_>>()
                .len(),
        }
    }

    /// Decodes every row into decision variables.
    pub fn decode(&self, field: &Field) -> Result<Vec<Vec<f64>>> {
        self.validate(field)?;
        match (self, field) {
            (
                Chromosomes::Binary(rows),
                Field::BinaryGray {
                    lengths,
                    lower,
                    upper,
                    gray,
                },
            ) => Ok(rows
                .iter()
                .map(|row| decode_bits(row, lengths, lower, upper, *gray))
                .collect()),
            (Chromosomes::Real(rows), _) => Ok(rows.clone()),
            (Chromosomes::Permutation(rows), _) => Ok(rows
                .iter()
                .map(|row| row.iter().map(|&g| g as f64).collect())
                .collect()),
            _ => Err(GeneticError::Configuration(
                "Chromosome encoding does not match field".to_string(),
            )),
        }
    }
}

fn decode_bits(row: &[bool], lengths: &[usize], lower: &[f64], upper: &[f64], gray: bool) -> Vec<f64> {
    let mut offset = 0;
    lengths
        .iter()
        .enumerate()
        .map(|(k, &len)| {
            let bits = &row[offset..offset + len];
            offset += len;
            let mut value: u64 = 0;
            let mut previous = false;
            for &bit in bits {
                // Gray to binary: each binary bit is the xor of all gray bits so far.
                let b = if gray { previous ^ bit } else { bit };
                previous = b;
                value = (value << 1) | u64::from(b);
            }
            let max = ((1u64 << len) - 1) as f64;
            lower[k] + (upper[k] - lower[k]) * value as f64 / max
        })
        .collect()
}
