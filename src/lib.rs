pub mod encoding;
pub mod error;
pub mod evolution;
pub mod operators;
pub mod pareto;
pub mod population;
pub mod problem;
pub mod rng;
pub mod selection;
pub mod strategy;
pub mod survival;

// Re-export commonly used types for convenience
pub use encoding::{Chromosomes, Encoding, Field};
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{
    EvolutionEngine, EvolutionEngineBuilder, EvolutionOptions, EvolutionResult, LogLevel, Template,
};
pub use population::Population;
pub use problem::{Direction, Evaluation, Problem};
pub use rng::RandomNumberGenerator;
