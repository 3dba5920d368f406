//! # Operators
//!
//! Variation operators and fitness scaling, addressed through explicit enums
//! instead of string names. [`OperatorSet`] bundles a selection, crossover and
//! mutation choice and checks them against the population encoding once, at
//! construction.
pub mod crossover;
pub mod mutation;
pub mod scaling;

pub use crossover::Crossover;
pub use mutation::{Mutation, ScaleFactor};
pub use scaling::scale_fitness;

use crate::encoding::Encoding;
use crate::error::{GeneticError, Result};
use crate::selection::Selection;

/// A validated (selection, crossover, mutation) triple for one encoding.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorSet {
    selection: Selection,
    crossover: Crossover,
    mutation: Mutation,
    encoding: Encoding,
}

impl OperatorSet {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the crossover or mutation does
    /// not support `encoding`, or the selection parameters are invalid.
    /// [`Mutation::Differential`] is rejected: it needs base vectors and is
    /// only reachable through the differential strategy.
    ///
    /// ```
    /// use genmoea::encoding::Encoding;
    /// use genmoea::operators::{Crossover, Mutation, OperatorSet};
    /// use genmoea::selection::Selection;
    ///
    /// assert!(OperatorSet::new(
    ///     Selection::Tournament(2),
    ///     Crossover::PartiallyMatched,
    ///     Mutation::Inversion,
    ///     Encoding::Permutation,
    /// )
    /// .is_ok());
    /// assert!(OperatorSet::new(
    ///     Selection::Tournament(2),
    ///     Crossover::PartiallyMatched,
    ///     Mutation::Inversion,
    ///     Encoding::RealInteger,
    /// )
    /// .is_err());
    /// ```
    pub fn new(
        selection: Selection,
        crossover: Crossover,
        mutation: Mutation,
        encoding: Encoding,
    ) -> Result<Self> {
        selection.validate()?;
        if !crossover.supports(encoding) {
            return Err(GeneticError::Configuration(format!(
                "Crossover '{}' is not available for {} encoding",
                crossover, encoding
            )));
        }
        if matches!(mutation, Mutation::Differential) {
            return Err(GeneticError::Configuration(
                "Differential mutation needs base vectors and a scale factor".to_string(),
            ));
        }
        if !mutation.supports(encoding) {
            return Err(GeneticError::Configuration(format!(
                "Mutation '{}' is not available for {} encoding",
                mutation, encoding
            )));
        }
        Ok(Self {
            selection,
            crossover,
            mutation,
            encoding,
        })
    }

    /// Default operators of the generational GA family for an encoding:
    /// partially-matched + inversion, uniform + bit-flip, or simulated binary +
    /// polynomial.
    pub fn defaults_for(selection: Selection, encoding: Encoding) -> Result<Self> {
        let (crossover, mutation) = match encoding {
            Encoding::Permutation => (Crossover::PartiallyMatched, Mutation::Inversion),
            Encoding::BinaryGray => (Crossover::Uniform, Mutation::BitFlip),
            Encoding::RealInteger => (
                Crossover::SimulatedBinary { eta: 20.0 },
                Mutation::Polynomial { eta: 20.0 },
            ),
        };
        Self::new(selection, crossover, mutation, encoding)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn crossover(&self) -> Crossover {
        self.crossover
    }

    pub fn mutation(&self) -> Mutation {
        self.mutation
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_encoding() {
        for encoding in [Encoding::Permutation, Encoding::BinaryGray, Encoding::RealInteger] {
            let set = OperatorSet::defaults_for(Selection::Tournament(2), encoding).unwrap();
            assert_eq!(set.encoding(), encoding);
        }
    }

    #[test]
    fn test_rejects_bit_flip_on_real() {
        let result = OperatorSet::new(
            Selection::RouletteWheel,
            Crossover::TwoPoint,
            Mutation::BitFlip,
            Encoding::RealInteger,
        );
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_rejects_differential_mutation() {
        let result = OperatorSet::new(
            Selection::Tournament(2),
            Crossover::SimulatedBinary { eta: 20.0 },
            Mutation::Differential,
            Encoding::RealInteger,
        );
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }
}
