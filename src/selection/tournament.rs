use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{ensure_non_empty, SelectionStrategy};

/// A selection strategy that selects individuals through tournament selection.
///
/// Tournament selection works by randomly drawing a small group of individuals
/// (the tournament size) and then choosing the best one from that group. This process
/// is repeated until the desired number of individuals are selected.
///
/// Tournament selection provides a balance between exploration and exploitation:
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
///
/// Participants are drawn with replacement, so the same individual can win
/// several tournaments.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy with the specified tournament size.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament over `candidates` and returns the winner's index.
    ///
    /// Ties go to the participant drawn first.
    pub(crate) fn run_tournament(
        &self,
        fitness: &[f64],
        candidates: &[usize],
        rng: &mut RandomNumberGenerator,
    ) -> usize {
        let mut best = candidates[rng.index(candidates.len())];
        for _ in 1..self.tournament_size {
            let challenger = candidates[rng.index(candidates.len())];
            if fitness[challenger] > fitness[best] {
                best = challenger;
            }
        }
        best
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 2 }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        ensure_non_empty(fitness)?;
        let everyone: Vec<usize> = (0..fitness.len()).collect();
        Ok((0..num_to_select)
            .map(|_| self.run_tournament(fitness, &everyone, rng))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_size_zero() {
        assert!(TournamentSelection::new(0).is_err());
    }

    #[test]
    fn test_worst_never_wins_large_tournament_against_itself() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let fitness = vec![1.0, 5.0];
        let selection = TournamentSelection::new(2).unwrap();
        let picks = selection.select(&fitness, 500, &mut rng).unwrap();
        // Index 0 wins only when both draws are index 0 (probability 1/4).
        let zeros = picks.iter().filter(|&&i| i == 0).count();
        assert!(zeros < 200);
        assert!(picks.iter().all(|&i| i < 2));
    }

    #[test]
    fn test_single_individual() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let picks = TournamentSelection::default()
            .select(&[0.3], 3, &mut rng)
            .unwrap();
        assert_eq!(picks, vec![0, 0, 0]);
    }
}
