//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the run-level configuration of an
//! evolution engine: termination budgets, logging, the working population
//! size and evaluation parallelism.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use genmoea::evolution::options::{EvolutionOptions, LogLevel};
//!
//! // Custom budgets through the builder
//! let options = EvolutionOptions::builder()
//!     .max_generations(250)
//!     .max_time(Duration::from_secs(30))
//!     .log_level(LogLevel::Minimal)
//!     .build();
//! assert_eq!(options.get_max_generations(), 250);
//!
//! // Defaults
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_max_generations(), 100);
//! ```
//!
//! ## Fields
//!
//! - `max_generations`: The generation budget, counting the initial population.
//! - `max_evaluations`: Optional cap on objective evaluations.
//! - `max_time`: Optional wall-clock budget.
//! - `population_size`: Optional override of the initial population size.
//! - `log_level`: The logging level, represented by the `LogLevel` enum.
//! - `parallel_threshold`: The batch size at which evaluation runs in parallel.
//! - `max_forget_count`: Consecutive generations without a feasible individual
//!   tolerated before the run stops.

use std::time::Duration;

/// Logging detail of the evolution loop.
///
/// - `Verbose`: Per-generation statistics at `debug` level.
/// - `Minimal`: One `info` line per generation.
/// - `None`: Only run start and finish.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Verbose,
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    max_generations: usize,
    max_evaluations: Option<usize>,
    max_time: Option<Duration>,
    population_size: Option<usize>,
    log_level: LogLevel,
    /// Minimum batch size evaluated in parallel
    parallel_threshold: usize,
    max_forget_count: usize,
}

impl EvolutionOptions {
    pub fn new(max_generations: usize, log_level: LogLevel) -> Self {
        Self {
            max_generations,
            log_level,
            ..Self::default()
        }
    }

    pub fn get_max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn get_max_evaluations(&self) -> Option<usize> {
        self.max_evaluations
    }

    pub fn get_max_time(&self) -> Option<Duration> {
        self.max_time
    }

    pub fn get_population_size(&self) -> Option<usize> {
        self.population_size
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Returns the minimum batch size evaluated in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_max_forget_count(&self) -> usize {
        self.max_forget_count
    }

    /// Sets the generation budget.
    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.max_generations = max_generations;
    }

    /// Sets the evaluation budget.
    pub fn set_max_evaluations(&mut self, max_evaluations: Option<usize>) {
        self.max_evaluations = max_evaluations;
    }

    /// Sets the wall-clock budget.
    pub fn set_max_time(&mut self, max_time: Option<Duration>) {
        self.max_time = max_time;
    }

    /// Overrides the initial population size.
    pub fn set_population_size(&mut self, population_size: Option<usize>) {
        self.population_size = population_size;
    }

    /// Sets the log level.
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Sets the parallel threshold.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn set_max_forget_count(&mut self, count: usize) {
        self.max_forget_count = count;
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use genmoea::evolution::options::{EvolutionOptions, LogLevel};
    ///
    /// let options = EvolutionOptions::builder()
    ///     .max_generations(200)
    ///     .max_evaluations(10_000)
    ///     .population_size(50)
    ///     .parallel_threshold(500)
    ///     .build();
    /// assert_eq!(options.get_population_size(), Some(50));
    /// ```
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            max_generations: 100,
            max_evaluations: None,
            max_time: None,
            population_size: None,
            log_level: LogLevel::None,
            parallel_threshold: 1000,
            max_forget_count: 1000,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    max_generations: Option<usize>,
    max_evaluations: Option<usize>,
    max_time: Option<Duration>,
    population_size: Option<usize>,
    log_level: Option<LogLevel>,
    parallel_threshold: Option<usize>,
    max_forget_count: Option<usize>,
}

impl EvolutionOptionsBuilder {
    /// Sets the generation budget.
    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    /// Sets the evaluation budget.
    pub fn max_evaluations(mut self, value: usize) -> Self {
        self.max_evaluations = Some(value);
        self
    }

    /// Sets the wall-clock budget.
    pub fn max_time(mut self, value: Duration) -> Self {
        self.max_time = Some(value);
        self
    }

    /// Overrides the initial population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn max_forget_count(mut self, value: usize) -> Self {
        self.max_forget_count = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();
        EvolutionOptions {
            max_generations: self.max_generations.unwrap_or(defaults.max_generations),
            max_evaluations: self.max_evaluations,
            max_time: self.max_time,
            population_size: self.population_size,
            log_level: self.log_level.unwrap_or(defaults.log_level),
            parallel_threshold: self.parallel_threshold.unwrap_or(defaults.parallel_threshold),
            max_forget_count: self.max_forget_count.unwrap_or(defaults.max_forget_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fills_defaults() {
        let options = EvolutionOptions::builder().max_forget_count(3).build();
        assert_eq!(options.get_max_generations(), 100);
        assert_eq!(options.get_max_forget_count(), 3);
        assert_eq!(options.get_parallel_threshold(), 1000);
        assert_eq!(options.get_log_level(), LogLevel::None);
        assert!(options.get_max_time().is_none());
    }

    #[test]
    fn test_setters() {
        let mut options = EvolutionOptions::new(10, LogLevel::Verbose);
        options.set_max_evaluations(Some(500));
        options.set_population_size(Some(12));
        assert_eq!(options.get_max_evaluations(), Some(500));
        assert_eq!(options.get_population_size(), Some(12));
        assert_eq!(options.get_log_level(), LogLevel::Verbose);
    }
}
