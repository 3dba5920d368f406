use tracing::debug;

use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    operators::{Mutation, OperatorSet},
    population::Population,
    rng::RandomNumberGenerator,
    selection::SelectionStrategy,
};

use super::BreedStrategy;

/// Extra Gaussian mutation applied when the population lacks diversity.
///
/// Triggers when the duplication rate reported in the generation context
/// exceeds `threshold`. Only real-valued chromosomes are perturbed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityBoost {
    threshold: f64,
    magnification: f64,
}

impl DiversityBoost {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` unless `threshold` lies in
    /// `[0, 1]` and `magnification` is positive and finite.
    pub fn new(threshold: f64, magnification: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) || !(magnification.is_finite() && magnification > 0.0) {
            return Err(GeneticError::Configuration(format!(
                "Invalid diversity boost (threshold {}, magnification {})",
                threshold, magnification
            )));
        }
        Ok(Self {
            threshold,
            magnification,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn magnification(&self) -> f64 {
        self.magnification
    }
}

impl Default for DiversityBoost {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            magnification: 3.0,
        }
    }
}

/// # GeneticStrategy
///
/// Classic generational variation: mating selection, crossover, then mutation.
///
/// Probabilities of `1.0` or more always apply the operator. The mutation
/// probability is per chromosome and spread over its genes by gene-wise
/// operators.
#[derive(Debug, Clone)]
pub struct GeneticStrategy {
    operators: OperatorSet,
    crossover_probability: f64,
    mutation_probability: f64,
    boost: Option<DiversityBoost>,
}

impl GeneticStrategy {
    pub fn new(operators: OperatorSet, crossover_probability: f64, mutation_probability: f64) -> Result<Self> {
        if !(crossover_probability >= 0.0 && mutation_probability >= 0.0) {
            return Err(GeneticError::Configuration(format!(
                "Probabilities must be non-negative (crossover {}, mutation {})",
                crossover_probability, mutation_probability
            )));
        }
        Ok(Self {
            operators,
            crossover_probability,
            mutation_probability,
            boost: None,
        })
    }

    pub fn with_diversity_boost(mut self, boost: DiversityBoost) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn operators(&self) -> &OperatorSet {
        &self.operators
    }

    pub fn diversity_boost(&self) -> Option<DiversityBoost> {
        self.boost
    }
}

impl BreedStrategy for GeneticStrategy {
    fn validate(&self, encoding: Encoding) -> Result<()> {
        if encoding != self.operators.encoding() {
            return Err(GeneticError::Configuration(format!(
                "Operators were configured for {} but the population is {}",
                self.operators.encoding(),
                encoding
            )));
        }
        Ok(())
    }

    fn breed(
        &self,
        population: &Population,
        count: usize,
        context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        let field = population.field();
        let selected = self
            .operators
            .selection()
            .select(population.fitness(), count, rng)?;
        let parents = population.subset(&selected)?;
        let chromosomes = parents.chromosomes().ok_or_else(|| {
            GeneticError::Configuration("Parents have no chromosomes".to_string())
        })?;

        let recombined =
            self.operators
                .crossover()
                .recombine(chromosomes, field, self.crossover_probability, false, rng)?;
        let mut offspring =
            self.operators
                .mutation()
                .mutate(&recombined, field, self.mutation_probability, rng)?;

        if let Some(boost) = self.boost {
            if population.encoding() == Encoding::RealInteger
                && context.duplication_rate > boost.threshold
            {
                debug!(
                    duplication_rate = context.duplication_rate,
                    "Applying magnified Gaussian mutation"
                );
                offspring = Mutation::Gaussian {
                    magnification: boost.magnification,
                }
                .mutate(&offspring, field, self.mutation_probability, rng)?;
            }
        }

        Population::from_chromosomes(field.clone(), offspring)
    }
}
