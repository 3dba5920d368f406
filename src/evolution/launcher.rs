use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{
    context::GenerationContext,
    options::{EvolutionOptions, LogLevel},
    termination::{BudgetTermination, Termination, TerminationState},
};
use crate::{
    error::{GeneticError, OptionExt, Result},
    population::Population,
    problem::{direction_signs, Problem},
    rng::RandomNumberGenerator,
    strategy::BreedStrategy,
    survival::Reinsertion,
};

/// Summary of one counted generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub evaluations: usize,
    /// Number of feasible individuals in the population.
    pub feasible: usize,
    /// Highest selection fitness among the feasible individuals.
    pub best_fitness: f64,
    /// Objective vector of that individual, in the problem's own directions.
    pub best_objectives: Vec<f64>,
}

impl GenerationStats {
    /// Statistics of `population`, or `None` if no individual is feasible.
    fn collect(population: &Population, context: &GenerationContext) -> Option<Self> {
        let feasible = population.feasible_indices();
        let best = feasible
            .iter()
            .copied()
            .max_by(|&a, &b| population.fitness()[a].total_cmp(&population.fitness()[b]))?;
        Some(Self {
            generation: context.generation,
            evaluations: context.evaluations,
            feasible: feasible.len(),
            best_fitness: population.fitness()[best],
            best_objectives: population.objectives()[best].clone(),
        })
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The last population.
    pub population: Population,
    /// Best feasible individual (single objective) or feasible non-dominated set.
    pub solutions: Population,
    /// One record per counted generation, starting with the initial population.
    pub trace: Vec<GenerationStats>,
    /// Objective evaluations performed, `N + g·K` for `g` bred generations.
    pub evaluations: usize,
    /// Generations of offspring bred.
    pub generations: usize,
    pub elapsed: Duration,
}

/// # EvolutionEngine
///
/// One generational loop shared by every algorithm template. It owns the
/// problem and the initial population, and is composed from a
/// [`BreedStrategy`] (variation), a [`Reinsertion`] (environmental selection)
/// and a [`Termination`] controller.
///
/// Each generation runs to completion: offspring are bred, evaluated as one
/// batch, and reinserted before termination is polled again.
#[derive(Debug)]
pub struct EvolutionEngine<P: Problem> {
    problem: P,
    population: Population,
    breed: Box<dyn BreedStrategy>,
    reinsertion: Box<dyn Reinsertion>,
    termination: Box<dyn Termination>,
    options: EvolutionOptions,
}

impl<P: Problem> EvolutionEngine<P> {
    /// Creates an engine after validating the configuration.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem evaluated by the engine.
    /// * `population` - The initial population; chromosomes may be absent.
    /// * `breed` - The variation policy.
    /// * `reinsertion` - The environmental selection policy.
    /// * `termination` - Optional controller, defaults to the budgets in `options`.
    /// * `options` - Run-level options.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the strategies do not support the
    /// population's encoding or the problem's objective count, if the problem
    /// declares no objectives or a mismatching number of directions, or if the
    /// budgets or population size are zero.
    pub fn new(
        problem: P,
        population: Population,
        breed: Box<dyn BreedStrategy>,
        reinsertion: Box<dyn Reinsertion>,
        termination: Option<Box<dyn Termination>>,
        options: EvolutionOptions,
    ) -> Result<Self> {
        let m = problem.num_objectives();
        if m == 0 {
            return Err(GeneticError::Configuration(
                "Problem must declare at least one objective".to_string(),
            ));
        }
        if problem.directions().len() != m {
            return Err(GeneticError::Configuration(format!(
                "Problem declares {} objectives but {} directions",
                m,
                problem.directions().len()
            )));
        }
        if options.get_max_generations() == 0 {
            return Err(GeneticError::Configuration(
                "Generation budget cannot be zero".to_string(),
            ));
        }
        if options.get_population_size().unwrap_or(population.len()) == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if let Some(chromosomes) = population.chromosomes() {
            chromosomes.validate(population.field())?;
        }
        breed.validate(population.encoding())?;
        reinsertion.validate(population.encoding(), m)?;

        let termination =
            termination.unwrap_or_else(|| Box::new(BudgetTermination::from_options(&options)));
        Ok(Self {
            problem,
            population,
            breed,
            reinsertion,
            termination,
            options,
        })
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Runs the evolution until the termination controller stops it.
    ///
    /// # Returns
    ///
    /// The final population, the solution set chosen by the reinsertion
    /// policy, and the run record.
    ///
    /// # Errors
    ///
    /// Any evaluation or operator error aborts the run immediately without a
    /// partial result. Single-objective templates return
    /// `GeneticError::NoFeasibleSolution` if the last population has no
    /// feasible individual.
    pub fn run(&mut self, rng: &mut RandomNumberGenerator) -> Result<EvolutionResult> {
        let start = Instant::now();
        let signs = direction_signs(&self.problem);
        let num_objectives = signs.len();

        let mut population = self.population.clone();
        let requested = self.options.get_population_size().unwrap_or(population.len());
        let size = self.reinsertion.population_size(requested, num_objectives)?;
        if size == 0 {
            return Err(GeneticError::EmptyPopulation);
        }
        if size != requested {
            warn!(
                requested,
                size, "Population resized to the reference set cardinality"
            );
        }
        if population.chromosomes().is_none() || population.len() != size {
            population.init_chromosomes(Some(size), rng)?;
        }

        let mut context = GenerationContext::new(signs, self.options.get_max_generations());
        info!(
            template = self.reinsertion.name(),
            population = size,
            objectives = num_objectives,
            encoding = %population.encoding(),
            "Starting evolution"
        );

        context.evaluations += self.evaluate(&mut population)?;
        self.reinsertion.prepare(&mut population, &context)?;

        let mut trace = Vec::new();
        let mut forget_count = 0;
        let mut bred = 0;
        loop {
            let counted = match GenerationStats::collect(&population, &context) {
                Some(stats) => {
                    forget_count = 0;
                    self.log_generation(&stats);
                    trace.push(stats);
                    true
                }
                None => {
                    forget_count += 1;
                    warn!(
                        generation = context.generation,
                        forget_count, "No feasible individual, generation forgotten"
                    );
                    false
                }
            };

            let state = TerminationState::new(&context, start.elapsed(), forget_count);
            if self.termination.should_stop(&state) {
                break;
            }
            if counted {
                context.generation += 1;
            }

            context.duplication_rate = self.reinsertion.duplication_rate();
            let mut offspring = self.breed.breed(&population, size, &context, rng)?;
            context.evaluations += self.evaluate(&mut offspring)?;
            population = self
                .reinsertion
                .reinsert(&population, &offspring, size, &context, rng)?;
            bred += 1;
        }

        let solutions = self.reinsertion.finish(&population, &context)?;
        let elapsed = start.elapsed();
        info!(
            generations = bred,
            evaluations = context.evaluations,
            solutions = solutions.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Evolution finished"
        );

        Ok(EvolutionResult {
            population,
            solutions,
            trace,
            evaluations: context.evaluations,
            generations: bred,
            elapsed,
        })
    }

    /// Evaluates `population` in one batch and writes the rows back.
    ///
    /// Returns the number of evaluations performed.
    fn evaluate(&self, population: &mut Population) -> Result<usize> {
        let rows = self
            .problem
            .evaluate(population.phenotypes(), self.options.get_parallel_threshold())?;
        if rows.len() != population.len() {
            return Err(GeneticError::Evaluation(format!(
                "Problem returned {} rows for {} individuals",
                rows.len(),
                population.len()
            )));
        }
        let m = self.problem.num_objectives();
        let mut objectives = Vec::with_capacity(rows.len());
        let mut violations = Vec::with_capacity(rows.len());
        for row in rows {
            if row.objectives.len() != m {
                return Err(GeneticError::Evaluation(format!(
                    "Expected {} objectives, got {}",
                    m,
                    row.objectives.len()
                )));
            }
            objectives.push(row.objectives);
            violations.push(row.constraint_violations);
        }
        population.set_evaluation(objectives, violations)?;
        Ok(population.len())
    }

    fn log_generation(&self, stats: &GenerationStats) {
        match self.options.get_log_level() {
            LogLevel::Minimal => info!(generation = stats.generation, "Generation complete"),
            LogLevel::Verbose => debug!(
                generation = stats.generation,
                evaluations = stats.evaluations,
                feasible = stats.feasible,
                best_fitness = stats.best_fitness,
                best_objectives = ?stats.best_objectives,
                "Generation complete"
            ),
            LogLevel::None => {}
        }
    }
}

/// Convenience accessor for single-objective results.
impl EvolutionResult {
    /// Objective vector of the first solution.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::NoFeasibleSolution` if the solution set is empty.
    pub fn best_objectives(&self) -> Result<&[f64]> {
        self.solutions
            .objectives()
            .first()
            .map(Vec::as_slice)
            .ok_or_else_genetic(|| GeneticError::NoFeasibleSolution)
    }
}
