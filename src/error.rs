//! # Error Types
//!
//! This module defines the error type shared by every component of the crate:
//! population handling, operators, environmental selection and the
//! generational loop.
//!
//! Configuration problems are reported when an engine or an operator set is
//! constructed, so a misconfigured run never starts. Errors raised while
//! evaluating a population are propagated unchanged and abort the run.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genmoea::error::{GeneticError, Result};
//!
//! fn check_size(size: usize) -> Result<usize> {
//!     if size == 0 {
//!         return Err(GeneticError::EmptyPopulation);
//!     }
//!     Ok(size)
//! }
//!
//! assert!(check_size(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genmoea::error::{GeneticError, OptionExt};
//!
//! fn best(fitness: &[f64]) -> genmoea::error::Result<f64> {
//!     fitness.iter().cloned().reduce(f64::max).ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur while running an evolutionary algorithm.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// An invalid configuration was provided, e.g. an operator that does not
    /// support the population's encoding.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The problem collaborator failed or returned malformed results.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// An empty population was encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Matrix shapes disagree (rows, objective count, chromosome length).
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Two populations cannot be combined.
    #[error("Incompatible populations: {0}")]
    IncompatiblePopulations(String),

    /// An operation needed objective values that have not been computed yet.
    #[error("Population has not been evaluated")]
    NotEvaluated,

    /// NaN values were encountered.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// A random number generation failed.
    #[error("Random generation error: {0}")]
    RandomGeneration(String),

    /// A single-objective run finished without a feasible individual.
    #[error("No feasible solution found")]
    NoFeasibleSolution,
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_ext() {
        let none: Option<u8> = None;
        assert!(matches!(
            none.ok_or_else_genetic(|| GeneticError::EmptyPopulation),
            Err(GeneticError::EmptyPopulation)
        ));
        assert_eq!(Some(3).ok_or_else_genetic(|| GeneticError::NotEvaluated).unwrap(), 3);
    }

    #[test]
    fn test_display_messages() {
        let err = GeneticError::Configuration("bad operator".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad operator");
        assert_eq!(
            GeneticError::NoFeasibleSolution.to_string(),
            "No feasible solution found"
        );
    }
}
