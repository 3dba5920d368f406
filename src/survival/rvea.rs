use tracing::debug;

use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    evolution::context::GenerationContext,
    pareto::{angle_penalty, uniform_points, ReferenceVectors},
    population::Population,
    rng::RandomNumberGenerator,
};

use super::{feasible_front, require_objectives, Reinsertion};

/// RVEA environmental selection with angle-penalised distance.
///
/// The merged population keeps at most one individual per reference vector,
/// so the next population may be smaller than the configured size. The
/// vectors are rescaled to the observed objective range every
/// `ceil(rescale_fraction * max_generations)` generations.
#[derive(Debug, Clone)]
pub struct ReferenceVectorReinsertion {
    alpha: f64,
    rescale_fraction: f64,
    vectors: Option<ReferenceVectors>,
}

impl Default for ReferenceVectorReinsertion {
    fn default() -> Self {
        Self {
            alpha: 2.0,
            rescale_fraction: 0.1,
            vectors: None,
        }
    }
}

impl ReferenceVectorReinsertion {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for a negative `alpha` or a
    /// rescale fraction outside `(0, 1]`.
    pub fn new(alpha: f64, rescale_fraction: f64) -> Result<Self> {
        if !(alpha >= 0.0) || !(rescale_fraction > 0.0 && rescale_fraction <= 1.0) {
            return Err(GeneticError::Configuration(format!(
                "Invalid RVEA parameters: alpha {}, rescale fraction {}",
                alpha, rescale_fraction
            )));
        }
        Ok(Self {
            alpha,
            rescale_fraction,
            vectors: None,
        })
    }

    pub fn reference_vectors(&self) -> Option<&ReferenceVectors> {
        self.vectors.as_ref()
    }

    fn rescale_period(&self, max_generations: usize) -> usize {
        ((self.rescale_fraction * max_generations as f64).ceil() as usize).max(1)
    }
}

impl Reinsertion for ReferenceVectorReinsertion {
    fn name(&self) -> &'static str {
        "rvea"
    }

    fn validate(&self, _encoding: Encoding, num_objectives: usize) -> Result<()> {
        require_objectives(self.name(), num_objectives, 2)
    }

    fn population_size(&mut self, requested: usize, num_objectives: usize) -> Result<usize> {
        let vectors = ReferenceVectors::new(uniform_points(num_objectives, requested)?)?;
        let size = vectors.len();
        self.vectors = Some(vectors);
        Ok(size)
    }

    fn prepare(&mut self, _population: &mut Population, _context: &GenerationContext) -> Result<()> {
        Ok(())
    }

    fn reinsert(
        &mut self,
        parents: &Population,
        offspring: &Population,
        _target: usize,
        context: &GenerationContext,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let period = self.rescale_period(context.max_generations);
        let vectors = self.vectors.as_mut().ok_or_else(|| {
            GeneticError::Configuration("Reference vectors have not been generated".to_string())
        })?;

        let merged = parents.concat(offspring)?;
        let objectives = merged.signed_objectives(&context.signs)?;
        let penalty = angle_penalty(
            context.num_objectives(),
            context.generation,
            context.max_generations,
            self.alpha,
        );
        let chosen = vectors.select(&objectives, merged.constraint_violations(), penalty)?;
        let next = merged.subset(&chosen)?;

        if context.generation % period == 0 {
            let observed = next.signed_objectives(&context.signs)?;
            if vectors.rescale(&observed) {
                debug!(generation = context.generation, "Rescaled reference vectors");
            }
        }
        Ok(next)
    }

    fn finish(&self, population: &Population, context: &GenerationContext) -> Result<Population> {
        feasible_front(population, &context.signs)
    }
}
