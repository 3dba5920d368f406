//! # Algorithm templates
//!
//! Ready-made engine configurations. Every template is one [`EvolutionEngine`]
//! with a specific breed strategy, operator choice and reinsertion policy.
//!
//! ## Example
//!
//! ```rust
//! use genmoea::encoding::Field;
//! use genmoea::evolution::{EvolutionOptions, Template};
//! use genmoea::population::Population;
//! use genmoea::problem::{Evaluation, Problem};
//! use genmoea::rng::RandomNumberGenerator;
//! use genmoea::error::Result;
//!
//! struct Schaffer;
//!
//! impl Problem for Schaffer {
//!     fn num_objectives(&self) -> usize {
//!         2
//!     }
//!
//!     fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
//!         Ok(Evaluation::unconstrained(vec![x[0] * x[0], (x[0] - 2.0).powi(2)]))
//!     }
//! }
//!
//! let field = Field::real(vec![-5.0], vec![5.0]).unwrap();
//! let population = Population::new(field, 20);
//! let options = EvolutionOptions::builder().max_generations(10).build();
//! let mut engine = Template::Nsga2.build(Schaffer, population, options).unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let result = engine.run(&mut rng).unwrap();
//! assert_eq!(result.evaluations, 20 + 9 * 20);
//! assert!(!result.solutions.is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{
    encoding::Encoding,
    error::{GeneticError, Result},
    operators::{Crossover, Mutation, OperatorSet, ScaleFactor},
    population::Population,
    problem::Problem,
    selection::Selection,
    strategy::{BreedStrategy, DifferentialStrategy, DiversityBoost, GeneticStrategy},
    survival::{
        AdaptiveWeightReinsertion, CrowdedComparisonReinsertion, ElitistReinsertion,
        OneToOneReinsertion, ReferencePointReinsertion, ReferenceVectorReinsertion, Reinsertion,
        ReplacementReinsertion,
    },
};

use super::{launcher::EvolutionEngine, options::EvolutionOptions};

/// The algorithm templates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Simple GA: roulette selection, offspring replace parents.
    SimpleGa,
    /// Strengthened-elitist GA: parents and offspring compete by elitist tournament.
    StrengthenedElitistGa,
    /// DE/rand/1/L: differential mutation, exponential crossover, one-to-one survival.
    DifferentialEvolution,
    /// NSGA-II with crowded comparison.
    Nsga2,
    /// NSGA-III survival with differential-evolution variation.
    Nsga3De,
    /// Reference-vector guided evolution.
    Rvea,
    /// Adaptive-weight GA with a bounded non-dominated archive.
    AwGa,
}

impl Template {
    pub const ALL: [Template; 7] = [
        Template::SimpleGa,
        Template::StrengthenedElitistGa,
        Template::DifferentialEvolution,
        Template::Nsga2,
        Template::Nsga3De,
        Template::Rvea,
        Template::AwGa,
    ];

    pub fn is_multi_objective(self) -> bool {
        matches!(
            self,
            Template::Nsga2 | Template::Nsga3De | Template::Rvea | Template::AwGa
        )
    }

    /// Builds an engine for `problem` starting from `population`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` when the template does not support
    /// the population's encoding (differential variants need real-integer
    /// encodings) or the problem's objective count.
    pub fn build<P: Problem>(
        self,
        problem: P,
        population: Population,
        options: EvolutionOptions,
    ) -> Result<EvolutionEngine<P>> {
        let encoding = population.encoding();
        let breed = self.breed_strategy(encoding)?;
        let reinsertion = self.reinsertion();
        EvolutionEngine::new(problem, population, breed, reinsertion, None, options)
    }

    fn breed_strategy(self, encoding: Encoding) -> Result<Box<dyn BreedStrategy>> {
        let strategy: Box<dyn BreedStrategy> = match self {
            Template::SimpleGa => Box::new(GeneticStrategy::new(
                classic_operators(Selection::RouletteWheel, encoding)?,
                1.0,
                1.0,
            )?),
            Template::StrengthenedElitistGa => Box::new(GeneticStrategy::new(
                classic_operators(Selection::ElitistTournament(2), encoding)?,
                1.0,
                1.0,
            )?),
            Template::Nsga2 => Box::new(GeneticStrategy::new(
                OperatorSet::defaults_for(Selection::Tournament(2), encoding)?,
                1.0,
                1.0,
            )?),
            Template::Rvea => Box::new(GeneticStrategy::new(
                OperatorSet::defaults_for(Selection::Random, encoding)?,
                1.0,
                1.0,
            )?),
            Template::AwGa => {
                let operators = match encoding {
                    Encoding::RealInteger => OperatorSet::new(
                        Selection::Tournament(2),
                        Crossover::Uniform,
                        Mutation::Uniform,
                        encoding,
                    )?,
                    _ => OperatorSet::defaults_for(Selection::Tournament(2), encoding)?,
                };
                Box::new(
                    GeneticStrategy::new(operators, 1.0, 1.0)?
                        .with_diversity_boost(DiversityBoost::default()),
                )
            }
            Template::DifferentialEvolution => Box::new(DifferentialStrategy::new(
                Selection::RouletteWheel,
                Crossover::Exponential,
                ScaleFactor::Scalar(0.5),
                0.5,
            )?),
            Template::Nsga3De => Box::new(DifferentialStrategy::new(
                Selection::Tournament(2),
                Crossover::Binomial,
                ScaleFactor::Scalar(0.5),
                0.2,
            )?),
        };
        Ok(strategy)
    }

    fn reinsertion(self) -> Box<dyn Reinsertion> {
        match self {
            Template::SimpleGa => Box::new(ReplacementReinsertion::new()),
            Template::StrengthenedElitistGa => Box::new(ElitistReinsertion::default()),
            Template::DifferentialEvolution => Box::new(OneToOneReinsertion::new()),
            Template::Nsga2 => Box::new(CrowdedComparisonReinsertion::new()),
            Template::Nsga3De => Box::new(ReferencePointReinsertion::new()),
            Template::Rvea => Box::new(ReferenceVectorReinsertion::default()),
            Template::AwGa => Box::new(AdaptiveWeightReinsertion::new()),
        }
    }
}

/// Operators of the simple and elitist GAs: two-point crossover with bit-flip
/// or breeder mutation on arrays, PMX with inversion on permutations.
fn classic_operators(selection: Selection, encoding: Encoding) -> Result<OperatorSet> {
    let (crossover, mutation) = match encoding {
        Encoding::Permutation => (Crossover::PartiallyMatched, Mutation::Inversion),
        Encoding::BinaryGray => (Crossover::TwoPoint, Mutation::BitFlip),
        Encoding::RealInteger => (Crossover::TwoPoint, Mutation::Breeder),
    };
    OperatorSet::new(selection, crossover, mutation, encoding)
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Template::SimpleGa => "simple-ga",
            Template::StrengthenedElitistGa => "strengthened-elitist-ga",
            Template::DifferentialEvolution => "de-rand-1-l",
            Template::Nsga2 => "nsga2",
            Template::Nsga3De => "nsga3-de",
            Template::Rvea => "rvea",
            Template::AwGa => "awga",
        };
        f.write_str(name)
    }
}

impl FromStr for Template {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        Template::ALL
            .into_iter()
            .find(|template| template.to_string() == s)
            .ok_or_else(|| GeneticError::Configuration(format!("Unknown template '{}'", s)))
    }
}
