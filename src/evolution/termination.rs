//! # Termination
//!
//! Termination is polled once per generation boundary, after the current
//! population has been recorded. A generation that is already running always
//! completes.

use std::fmt::Debug;
use std::time::Duration;

use super::{context::GenerationContext, options::EvolutionOptions};

/// Progress snapshot handed to a [`Termination`] controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminationState {
    /// Counted generations so far, starting at 0 for the initial population.
    pub generation: usize,
    pub evaluations: usize,
    pub elapsed: Duration,
    /// Consecutive generations without any feasible individual.
    pub forget_count: usize,
}

impl TerminationState {
    pub fn new(context: &GenerationContext, elapsed: Duration, forget_count: usize) -> Self {
        Self {
            generation: context.generation,
            evaluations: context.evaluations,
            elapsed,
            forget_count,
        }
    }
}

/// Decides whether the evolution loop stops.
pub trait Termination: Debug + Send {
    fn should_stop(&self, state: &TerminationState) -> bool;
}

/// Stops on the first exhausted budget.
///
/// The generation budget counts the initial population, so a budget of `G`
/// breeds `G - 1` generations of offspring. Generations without a feasible
/// individual are "forgotten": they do not advance the generation counter,
/// and `max_forget_count` consecutive ones end the run.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetTermination {
    pub max_generations: usize,
    pub max_evaluations: Option<usize>,
    pub max_time: Option<Duration>,
    pub max_forget_count: usize,
}

impl BudgetTermination {
    pub fn from_options(options: &EvolutionOptions) -> Self {
        Self {
            max_generations: options.get_max_generations(),
            max_evaluations: options.get_max_evaluations(),
            max_time: options.get_max_time(),
            max_forget_count: options.get_max_forget_count(),
        }
    }
}

impl Termination for BudgetTermination {
    fn should_stop(&self, state: &TerminationState) -> bool {
        state.generation + 1 >= self.max_generations
            || state.forget_count >= self.max_forget_count
            || self
                .max_evaluations
                .map_or(false, |budget| state.evaluations >= budget)
            || self.max_time.map_or(false, |budget| state.elapsed >= budget)
    }
}
