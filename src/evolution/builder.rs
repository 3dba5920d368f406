use crate::{
    error::{GeneticError, Result},
    population::Population,
    problem::Problem,
    strategy::BreedStrategy,
    survival::Reinsertion,
};

use super::{launcher::EvolutionEngine, options::EvolutionOptions, termination::Termination};

/// Assembles an [`EvolutionEngine`] from its parts.
///
/// The problem, population, breed strategy and reinsertion are required;
/// options default to [`EvolutionOptions::default`] and termination to the
/// budgets in the options.
pub struct EvolutionEngineBuilder<P: Problem> {
    problem: Option<P>,
    population: Option<Population>,
    breed_strategy: Option<Box<dyn BreedStrategy>>,
    reinsertion: Option<Box<dyn Reinsertion>>,
    termination: Option<Box<dyn Termination>>,
    options: Option<EvolutionOptions>,
}

impl<P: Problem> EvolutionEngineBuilder<P> {
    pub fn new() -> Self {
        Self {
            problem: None,
            population: None,
            breed_strategy: None,
            reinsertion: None,
            termination: None,
            options: None,
        }
    }

    pub fn with_problem(mut self, problem: P) -> Self {
        self.problem = Some(problem);
        self
    }

    pub fn with_population(mut self, population: Population) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_breed_strategy<B: BreedStrategy + 'static>(mut self, breed_strategy: B) -> Self {
        self.breed_strategy = Some(Box::new(breed_strategy));
        self
    }

    pub fn with_reinsertion<R: Reinsertion + 'static>(mut self, reinsertion: R) -> Self {
        self.reinsertion = Some(Box::new(reinsertion));
        self
    }

    pub fn with_termination<T: Termination + 'static>(mut self, termination: T) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn build(self) -> Result<EvolutionEngine<P>> {
        let problem = self
            .problem
            .ok_or_else(|| GeneticError::Configuration("Problem not specified".to_string()))?;

        let population = self
            .population
            .ok_or_else(|| GeneticError::Configuration("Population not specified".to_string()))?;

        let breed_strategy = self.breed_strategy.ok_or_else(|| {
            GeneticError::Configuration("Breeding strategy not specified".to_string())
        })?;

        let reinsertion = self.reinsertion.ok_or_else(|| {
            GeneticError::Configuration("Reinsertion strategy not specified".to_string())
        })?;

        EvolutionEngine::new(
            problem,
            population,
            breed_strategy,
            reinsertion,
            self.termination,
            self.options.unwrap_or_default(),
        )
    }
}

impl<P: Problem> Default for EvolutionEngineBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
