use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    operators::{mutation::differential, Crossover, ScaleFactor},
    population::Population,
    rng::RandomNumberGenerator,
    selection::{Selection, SelectionStrategy},
};

use super::BreedStrategy;

/// # DifferentialStrategy
///
/// Differential-evolution variation on real-valued populations.
///
/// Every target vector `x_i` gets a trial vector: a base vector `x_r0` chosen by
/// `base_selection`, a mutant `x_r0 + F (x_r1 - x_r2)`, then a binomial or
/// exponential crossover of the target with the mutant at rate
/// `crossover_rate`. One trial is produced per target, in target order, so a
/// one-to-one survivor step can compare trial `i` with target `i`.
#[derive(Debug, Clone)]
pub struct DifferentialStrategy {
    base_selection: Selection,
    crossover: Crossover,
    scale: ScaleFactor,
    crossover_rate: f64,
}

impl DifferentialStrategy {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `crossover` is not binomial or
    /// exponential, or the selection parameters are invalid.
    pub fn new(
        base_selection: Selection,
        crossover: Crossover,
        scale: ScaleFactor,
        crossover_rate: f64,
    ) -> Result<Self> {
        base_selection.validate()?;
        if !matches!(crossover, Crossover::Binomial | Crossover::Exponential) {
            return Err(GeneticError::Configuration(format!(
                "Differential evolution uses binomial or exponential crossover, not '{}'",
                crossover
            )));
        }
        if !(0.0..=1.0).contains(&crossover_rate) {
            return Err(GeneticError::Configuration(format!(
                "Crossover rate must lie in [0, 1], got {}",
                crossover_rate
            )));
        }
        Ok(Self {
            base_selection,
            crossover,
            scale,
            crossover_rate,
        })
    }

    pub fn scale(&self) -> &ScaleFactor {
        &self.scale
    }

    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }
}

impl BreedStrategy for DifferentialStrategy {
    fn validate(&self, encoding: Encoding) -> Result<()> {
        if encoding != Encoding::RealInteger {
            return Err(GeneticError::Configuration(format!(
                "Differential evolution needs a real-integer encoding, got {}",
                encoding
            )));
        }
        Ok(())
    }

    fn breed(
        &self,
        population: &Population,
        count: usize,
        _context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        if count != population.len() {
            return Err(GeneticError::DimensionMismatch(format!(
                "Differential evolution breeds one trial per target ({}), {} requested",
                population.len(),
                count
            )));
        }
        let field = population.field();
        let targets = population.chromosomes().ok_or_else(|| {
            GeneticError::Configuration("Population has no chromosomes".to_string())
        })?;

        let base = self
            .base_selection
            .select(population.fitness(), count, rng)?;
        let mutants = differential(targets, field, &base, &self.scale, rng)?;

        // Row i pairs with row i + N: target with its mutant.
        let pairs = targets.concat(&mutants)?;
        let trials = self
            .crossover
            .recombine(&pairs, field, self.crossover_rate, true, rng)?;

        Population::from_chromosomes(field.clone(), trials)
    }
}
