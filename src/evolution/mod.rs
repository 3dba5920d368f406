pub mod builder;
pub mod context;
pub mod launcher;
pub mod options;
pub mod templates;
pub mod termination;

pub use builder::EvolutionEngineBuilder;
pub use context::GenerationContext;
pub use launcher::{EvolutionEngine, EvolutionResult, GenerationStats};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
pub use templates::Template;
pub use termination::{BudgetTermination, Termination, TerminationState};
