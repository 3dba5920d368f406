use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{ensure_non_empty, SelectionStrategy};
use crate::selection::tournament::TournamentSelection;

/// Tournament selection that always keeps the best individual.
///
/// The individual with the highest fitness (lowest index on ties) is selected
/// first; the remaining slots are filled by ordinary tournaments.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct ElitistTournamentSelection {
    tournament: TournamentSelection,
}

impl ElitistTournamentSelection {
    pub fn new(tournament_size: usize) -> Result<Self> {
        Ok(Self {
            tournament: TournamentSelection::new(tournament_size)?,
        })
    }
}

/// Index of the highest fitness, lowest index on ties.
pub(crate) fn best_index(fitness: &[f64]) -> usize {
    fitness
        .iter()
        .enumerate()
        .fold(0, |best, (i, &f)| if f > fitness[best] { i } else { best })
}

impl SelectionStrategy for ElitistTournamentSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        ensure_non_empty(fitness)?;
        if num_to_select == 0 {
            return Ok(Vec::new());
        }
        let everyone: Vec<usize> = (0..fitness.len()).collect();
        let mut selected = Vec::with_capacity(num_to_select);
        selected.push(best_index(fitness));
        selected.extend(
            (1..num_to_select).map(|_| self.tournament.run_tournament(fitness, &everyone, rng)),
        );
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_is_always_selected() {
        let fitness = vec![0.2, 0.9, 0.4, 0.9, 0.1];
        for seed in 0..20 {
            let mut rng = RandomNumberGenerator::from_seed(seed);
            let selected = ElitistTournamentSelection::new(2)
                .unwrap()
                .select(&fitness, 5, &mut rng)
                .unwrap();
            assert_eq!(selected[0], 1);
            assert_eq!(selected.len(), 5);
        }
    }

    #[test]
    fn test_zero_requested() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let selected = ElitistTournamentSelection::default()
            .select(&[1.0], 0, &mut rng)
            .unwrap();
        assert!(selected.is_empty());
    }
}
