//! # Population
//!
//! A `Population` stores individuals row-wise in parallel arrays: chromosomes,
//! decoded phenotypes, objective values, constraint violations and a scalar
//! fitness used for selection.
//!
//! The algorithms never mutate a population in place; every step produces a
//! new one through [`Population::subset`], [`Population::concat`] or a fresh
//! offspring population. Only the evaluation write-back
//! ([`Population::set_evaluation`]) and fitness assignment change an existing
//! instance.
//!
//! An individual is feasible when every constraint-violation entry is `<= 0`.
//!
//! ## Example
//!
//! ```rust
//! use genmoea::encoding::Field;
//! use genmoea::population::Population;
//! use genmoea::rng::RandomNumberGenerator;
//!
//! let field = Field::real(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
//! let mut population = Population::new(field, 10);
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! population.init_chromosomes(None, &mut rng).unwrap();
//!
//! assert_eq!(population.len(), 10);
//! assert_eq!(population.phenotypes().len(), 10);
//! assert!(!population.is_evaluated());
//! ```

use crate::encoding::{Chromosomes, Encoding, Field};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    field: Field,
    size: usize,
    chromosomes: Option<Chromosomes>,
    phenotypes: Vec<Vec<f64>>,
    objectives: Vec<Vec<f64>>,
    constraint_violations: Vec<Vec<f64>>,
    fitness: Vec<f64>,
}

impl Population {
    /// Creates an uninitialised population of nominal size `size`.
    ///
    /// Chromosomes are created later by [`Population::init_chromosomes`],
    /// usually by the evolution engine.
    pub fn new(field: Field, size: usize) -> Self {
        Self {
            field,
            size,
            chromosomes: None,
            phenotypes: Vec::new(),
            objectives: Vec::new(),
            constraint_violations: Vec::new(),
            fitness: vec![1.0; size],
        }
    }

    /// Creates an unevaluated population from existing chromosomes and decodes them.
    pub fn from_chromosomes(field: Field, chromosomes: Chromosomes) -> Result<Self> {
        let phenotypes = chromosomes.decode(&field)?;
        let size = chromosomes.len();
        Ok(Self {
            field,
            size,
            chromosomes: Some(chromosomes),
            phenotypes,
            objectives: Vec::new(),
            constraint_violations: Vec::new(),
            fitness: vec![1.0; size],
        })
    }

    /// Randomly initialises the chromosomes, optionally resizing the population first.
    ///
    /// Objective values are discarded, fitness is reset and phenotypes are decoded.
    pub fn init_chromosomes(
        &mut self,
        size: Option<usize>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        if let Some(size) = size {
            self.size = size;
        }
        if self.size == 0 {
            return Err(GeneticError::EmptyPopulation);
        }
        let chromosomes = Chromosomes::random(&self.field, self.size, rng);
        self.phenotypes = chromosomes.decode(&self.field)?;
        self.chromosomes = Some(chromosomes);
        self.objectives.clear();
        self.constraint_violations.clear();
        self.fitness = vec![1.0; self.size];
        Ok(())
    }

    /// Re-decodes phenotypes from the current chromosomes.
    pub fn decode(&mut self) -> Result<()> {
        let chromosomes = self.chromosomes.as_ref().ok_or_else(|| {
            GeneticError::Configuration("Chromosomes have not been initialised".to_string())
        })?;
        self.phenotypes = chromosomes.decode(&self.field)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn encoding(&self) -> Encoding {
        self.field.encoding()
    }

    pub fn chromosomes(&self) -> Option<&Chromosomes> {
        self.chromosomes.as_ref()
    }

    pub fn phenotypes(&self) -> &[Vec<f64>] {
        &self.phenotypes
    }

    /// Objective rows. Empty until the population has been evaluated.
    pub fn objectives(&self) -> &[Vec<f64>] {
        &self.objectives
    }

    pub fn constraint_violations(&self) -> &[Vec<f64>] {
        &self.constraint_violations
    }

    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.size > 0 && self.objectives.len() == self.size
    }

    /// Number of objectives, if evaluated.
    pub fn num_objectives(&self) -> Option<usize> {
        self.objectives.first().map(Vec::len)
    }

    /// Writes objective and constraint-violation rows computed for this population.
    ///
    /// Rows must be in the same order as the phenotypes. Fitness is reset.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Evaluation` if a matrix has the wrong number of
    /// rows or the objective rows disagree in width, and
    /// `GeneticError::InvalidNumericValue` if an objective is NaN.
    pub fn set_evaluation(
        &mut self,
        objectives: Vec<Vec<f64>>,
        constraint_violations: Vec<Vec<f64>>,
    ) -> Result<()> {
        if objectives.len() != self.size || constraint_violations.len() != self.size {
            return Err(GeneticError::Evaluation(format!(
                "Expected {} rows, got {} objective rows and {} constraint rows",
                self.size,
                objectives.len(),
                constraint_violations.len()
            )));
        }
        let width = objectives.first().map_or(0, Vec::len);
        if width == 0 || objectives.iter().any(|row| row.len() != width) {
            return Err(GeneticError::Evaluation(
                "Objective rows must be non-empty and of equal width".to_string(),
            ));
        }
        if objectives.iter().flatten().any(|v| v.is_nan()) {
            return Err(GeneticError::InvalidNumericValue(
                "NaN objective value returned by evaluation".to_string(),
            ));
        }
        self.objectives = objectives;
        self.constraint_violations = constraint_violations;
        self.fitness = vec![1.0; self.size];
        Ok(())
    }

    /// Replaces the fitness vector.
    pub fn set_fitness(&mut self, fitness: Vec<f64>) -> Result<()> {
        if fitness.len() != self.size {
            return Err(GeneticError::DimensionMismatch(format!(
                "Fitness vector length ({}) doesn't match population size ({})",
                fitness.len(),
                self.size
            )));
        }
        self.fitness = fitness;
        Ok(())
    }

    /// Objective rows multiplied by the direction signs, so that every
    /// objective is minimised.
    pub fn signed_objectives(&self, signs: &[f64]) -> Result<Vec<Vec<f64>>> {
        if !self.is_evaluated() {
            return Err(GeneticError::NotEvaluated);
        }
        if self.objectives[0].len() != signs.len() {
            return Err(GeneticError::DimensionMismatch(format!(
                "{} direction signs for {} objectives",
                signs.len(),
                self.objectives[0].len()
            )));
        }
        Ok(self
            .objectives
            .iter()
            .map(|row| row.iter().zip(signs).map(|(v, s)| v * s).collect())
            .collect())
    }

    pub fn is_feasible(&self, index: usize) -> bool {
        self.constraint_violations
            .get(index)
            .map_or(true, |row| row.iter().all(|&cv| cv <= 0.0))
    }

    /// Sum of the positive constraint-violation entries of an individual.
    pub fn aggregate_violation(&self, index: usize) -> f64 {
        self.constraint_violations
            .get(index)
            .map_or(0.0, |row| aggregate_violation(row))
    }

    pub fn feasible_indices(&self) -> Vec<usize> {
        (0..self.size).filter(|&i| self.is_feasible(i)).collect()
    }

    /// Fraction of duplicated chromosome rows: `1 - unique / len`.
    pub fn duplication_rate(&self) -> f64 {
        match &self.chromosomes {
            Some(chromosomes) if !chromosomes.is_empty() => {
                1.0 - chromosomes.unique_rows() as f64 / chromosomes.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Returns a new population made of the rows at `indices`, in order.
    ///
    /// Fitness values travel with their rows.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.size) {
            return Err(GeneticError::DimensionMismatch(format!(
                "Index {} out of range for population of {}",
                bad, self.size
            )));
        }
        let pick = |rows: &[Vec<f64>]| -> Vec<Vec<f64>> {
            if rows.is_empty() {
                Vec::new()
            } else {
                indices.iter().map(|&i| rows[i].clone()).collect()
            }
        };
        Ok(Self {
            field: self.field.clone(),
            size: indices.len(),
            chromosomes: self.chromosomes.as_ref().map(|c| c.subset(indices)),
            phenotypes: pick(&self.phenotypes),
            objectives: pick(&self.objectives),
            constraint_violations: pick(&self.constraint_violations),
            fitness: indices.iter().map(|&i| self.fitness[i]).collect(),
        })
    }

    /// Concatenates two populations into a new one of combined size.
    ///
    /// Fitness is reset on the result.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::IncompatiblePopulations` if the fields differ,
    /// either side has no chromosomes, or only one side has been evaluated.
    pub fn concat(&self, other: &Population) -> Result<Self> {
        if self.field != other.field {
            return Err(GeneticError::IncompatiblePopulations(
                "Populations have different fields".to_string(),
            ));
        }
        let (Some(a), Some(b)) = (&self.chromosomes, &other.chromosomes) else {
            return Err(GeneticError::IncompatiblePopulations(
                "Cannot concatenate populations without chromosomes".to_string(),
            ));
        };
        if self.is_evaluated() != other.is_evaluated() {
            return Err(GeneticError::IncompatiblePopulations(
                "Cannot concatenate an evaluated population with an unevaluated one".to_string(),
            ));
        }
        let stack = |x: &[Vec<f64>], y: &[Vec<f64>]| -> Vec<Vec<f64>> {
            x.iter().chain(y).cloned().collect()
        };
        let size = self.size + other.size;
        Ok(Self {
            field: self.field.clone(),
            size,
            chromosomes: Some(a.concat(b)?),
            phenotypes: stack(&self.phenotypes, &other.phenotypes),
            objectives: stack(&self.objectives, &other.objectives),
            constraint_violations: stack(&self.constraint_violations, &other.constraint_violations),
            fitness: vec![1.0; size],
        })
    }
}

/// Sum of the positive entries of a constraint-violation row.
pub fn aggregate_violation(row: &[f64]) -> f64 {
    row.iter().filter(|&&cv| cv > 0.0).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluated(values: &[(f64, f64)], cv: &[f64]) -> Population {
        let field = Field::real(vec![0.0], vec![10.0]).unwrap();
        let chroms = Chromosomes::Real(values.iter().map(|&(x, _)| vec![x]).collect());
        let mut pop = Population::from_chromosomes(field, chroms).unwrap();
        pop.set_evaluation(
            values.iter().map(|&(a, b)| vec![a, b]).collect(),
            cv.iter().map(|&c| vec![c]).collect(),
        )
        .unwrap();
        pop
    }

    #[test]
    fn test_concat_and_subset() {
        let a = evaluated(&[(1.0, 2.0), (2.0, 1.0)], &[0.0, 0.0]);
        let b = evaluated(&[(3.0, 3.0)], &[1.5]);
        let merged = a.concat(&b).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.objectives()[2], vec![3.0, 3.0]);
        assert!(!merged.is_feasible(2));
        assert_eq!(merged.feasible_indices(), vec![0, 1]);

        let picked = merged.subset(&[2, 0, 0]).unwrap();
        assert_eq!(picked.len(), 3);
        assert_eq!(picked.phenotypes()[0], vec![3.0]);
        assert_eq!(picked.aggregate_violation(0), 1.5);
    }

    #[test]
    fn test_concat_does_not_alias() {
        let a = evaluated(&[(1.0, 2.0)], &[0.0]);
        let b = evaluated(&[(3.0, 4.0)], &[0.0]);
        let mut merged = a.concat(&b).unwrap();
        merged.set_fitness(vec![5.0, 6.0]).unwrap();
        assert_eq!(a.fitness(), &[1.0]);
        assert_eq!(b.fitness(), &[1.0]);
    }

    #[test]
    fn test_concat_rejects_different_fields() {
        let a = evaluated(&[(1.0, 2.0)], &[0.0]);
        let field = Field::real(vec![0.0], vec![5.0]).unwrap();
        let mut b = Population::from_chromosomes(field, Chromosomes::Real(vec![vec![1.0]])).unwrap();
        b.set_evaluation(vec![vec![1.0, 1.0]], vec![vec![]]).unwrap();
        assert!(matches!(
            a.concat(&b),
            Err(GeneticError::IncompatiblePopulations(_))
        ));
    }

    #[test]
    fn test_set_evaluation_checks_rows() {
        let field = Field::real(vec![0.0], vec![1.0]).unwrap();
        let mut pop =
            Population::from_chromosomes(field, Chromosomes::Real(vec![vec![0.5], vec![0.2]]))
                .unwrap();
        let result = pop.set_evaluation(vec![vec![1.0]], vec![vec![], vec![]]);
        assert!(matches!(result, Err(GeneticError::Evaluation(_))));
        let result = pop.set_evaluation(vec![vec![1.0], vec![f64::NAN]], vec![vec![], vec![]]);
        assert!(matches!(result, Err(GeneticError::InvalidNumericValue(_))));
    }

    #[test]
    fn test_init_resizes() {
        let field = Field::permutation(5).unwrap();
        let mut pop = Population::new(field, 4);
        let mut rng = RandomNumberGenerator::from_seed(2);
        pop.init_chromosomes(Some(7), &mut rng).unwrap();
        assert_eq!(pop.len(), 7);
        assert_eq!(pop.fitness().len(), 7);
        assert_eq!(pop.phenotypes()[0].len(), 5);
    }

    #[test]
    fn test_signed_objectives_and_duplication_rate() {
        let pop = evaluated(&[(1.0, 2.0), (1.0, 2.0)], &[0.0, 0.0]);
        let signed = pop.signed_objectives(&[1.0, -1.0]).unwrap();
        assert_eq!(signed[0], vec![1.0, -2.0]);
        assert!((pop.duplication_rate() - 0.5).abs() < 1e-12);
        assert!(pop.signed_objectives(&[1.0]).is_err());
    }
}
