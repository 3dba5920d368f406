//! # Selection
//!
//! Index-based selection strategies over a fitness vector (higher is better),
//! and the [`Selection`] registry naming them.
pub mod elitist;
pub mod random;
pub mod rank;
pub mod roulette;
pub mod selection_strategy;
pub mod survivor;
pub mod tournament;

use std::fmt;
use std::str::FromStr;

pub use elitist::ElitistTournamentSelection;
pub use random::RandomSelection;
pub use rank::DuplicationSelection;
pub use roulette::RouletteWheelSelection;
pub use selection_strategy::SelectionStrategy;
pub use survivor::OneToOneSelection;
pub use tournament::TournamentSelection;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Named selection policies.
///
/// Parsed from kebab-case names; tournament variants accept an optional size
/// suffix (`"tournament:3"`), defaulting to 2.
///
/// ```
/// use genmoea::selection::Selection;
///
/// let s: Selection = "elitist-tournament:4".parse().unwrap();
/// assert_eq!(s, Selection::ElitistTournament(4));
/// assert_eq!(s.to_string(), "elitist-tournament:4");
/// assert!("rws".parse::<Selection>().is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    RouletteWheel,
    Tournament(usize),
    ElitistTournament(usize),
    Random,
    Duplication,
    OneToOne,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::RouletteWheel => f.write_str("roulette"),
            Selection::Tournament(k) => write!(f, "tournament:{}", k),
            Selection::ElitistTournament(k) => write!(f, "elitist-tournament:{}", k),
            Selection::Random => f.write_str("random"),
            Selection::Duplication => f.write_str("duplication"),
            Selection::OneToOne => f.write_str("one-to-one"),
        }
    }
}

impl FromStr for Selection {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, size) = match s.split_once(':') {
            Some((name, size)) => {
                let size = size.parse::<usize>().map_err(|_| {
                    GeneticError::Configuration(format!("Invalid tournament size in '{}'", s))
                })?;
                (name, Some(size))
            }
            None => (s, None),
        };
        let selection = match (name, size) {
            ("roulette", None) => Selection::RouletteWheel,
            ("tournament", k) => Selection::Tournament(k.unwrap_or(2)),
            ("elitist-tournament", k) => Selection::ElitistTournament(k.unwrap_or(2)),
            ("random", None) => Selection::Random,
            ("duplication", None) => Selection::Duplication,
            ("one-to-one", None) => Selection::OneToOne,
            _ => {
                return Err(GeneticError::Configuration(format!(
                    "Unknown selection operator '{}'",
                    s
                )))
            }
        };
        selection.validate()?;
        Ok(selection)
    }
}

impl Selection {
    /// Checks the parameters of the policy.
    pub fn validate(&self) -> Result<()> {
        match self {
            Selection::Tournament(k) | Selection::ElitistTournament(k) if *k == 0 => Err(
                GeneticError::Configuration("Tournament size must be at least 1".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

impl SelectionStrategy for Selection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        match self {
            Selection::RouletteWheel => RouletteWheelSelection.select(fitness, num_to_select, rng),
            Selection::Tournament(k) => {
                TournamentSelection::new(*k)?.select(fitness, num_to_select, rng)
            }
            Selection::ElitistTournament(k) => {
                ElitistTournamentSelection::new(*k)?.select(fitness, num_to_select, rng)
            }
            Selection::Random => RandomSelection.select(fitness, num_to_select, rng),
            Selection::Duplication => DuplicationSelection.select(fitness, num_to_select, rng),
            Selection::OneToOne => OneToOneSelection.select(fitness, num_to_select, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("roulette".parse::<Selection>().unwrap(), Selection::RouletteWheel);
        assert_eq!("tournament".parse::<Selection>().unwrap(), Selection::Tournament(2));
        assert_eq!("one-to-one".parse::<Selection>().unwrap(), Selection::OneToOne);
        assert!("tournament:0".parse::<Selection>().is_err());
        assert!("tournament:x".parse::<Selection>().is_err());
        assert!("random:3".parse::<Selection>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for s in [
            Selection::RouletteWheel,
            Selection::Tournament(3),
            Selection::ElitistTournament(2),
            Selection::Random,
            Selection::Duplication,
            Selection::OneToOne,
        ] {
            assert_eq!(s.to_string().parse::<Selection>().unwrap(), s);
        }
    }

    #[test]
    fn test_dispatch() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let picked = Selection::Duplication
            .select(&[0.5, 0.9], 1, &mut rng)
            .unwrap();
        assert_eq!(picked, vec![1]);
    }
}
