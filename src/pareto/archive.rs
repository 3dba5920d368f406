//! Bounded non-dominated archive.
//!
//! The archive lives next to the evolving population and never takes part in
//! mating. Each update merges new candidates, keeps only the first Pareto level
//! and, while it is over capacity, removes the most crowded member.

use crate::error::{GeneticError, Result};
use crate::pareto::crowding::level_distances;
use crate::pareto::sorting::non_dominated_sort;
use crate::population::Population;

/// Merges `candidates` into `existing` and returns the bounded non-dominated set.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` for a zero `max_size`,
/// `GeneticError::NotEvaluated` if the candidates carry no objectives, and
/// propagates concatenation errors for incompatible populations.
pub fn update_archive(
    candidates: &Population,
    signs: &[f64],
    max_size: usize,
    existing: Option<&Population>,
) -> Result<Population> {
    if max_size == 0 {
        return Err(GeneticError::Configuration(
            "Archive capacity must be positive".to_string(),
        ));
    }
    let merged = match existing {
        Some(archive) if !archive.is_empty() => archive.concat(candidates)?,
        _ => candidates.clone(),
    };
    let objectives = merged.signed_objectives(signs)?;
    let sorted = non_dominated_sort(&objectives, merged.constraint_violations(), Some(1))?;
    let mut kept = sorted.members(1);

    while kept.len() > max_size {
        let distances = level_distances(&objectives, &kept);
        let most_crowded = distances
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        kept.remove(most_crowded);
    }

    merged.subset(&kept)
}

/// A size-bounded non-dominated set maintained across generations.
#[derive(Debug, Clone)]
pub struct Archive {
    max_size: usize,
    members: Option<Population>,
}

impl Archive {
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(GeneticError::Configuration(
                "Archive capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            max_size,
            members: None,
        })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn members(&self) -> Option<&Population> {
        self.members.as_ref()
    }

    pub fn len(&self) -> usize {
        self.members.as_ref().map_or(0, Population::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merges evaluated candidates into the archive.
    pub fn update(&mut self, candidates: &Population, signs: &[f64]) -> Result<()> {
        let updated = update_archive(candidates, signs, self.max_size, self.members.as_ref())?;
        self.members = Some(updated);
        Ok(())
    }

    /// Fraction of duplicated genotypes among the members.
    pub fn duplication_rate(&self) -> f64 {
        self.members
            .as_ref()
            .map_or(0.0, Population::duplication_rate)
    }

    /// Final result: the members without any infeasible individual.
    pub fn feasible_members(&self) -> Result<Population> {
        let members = self.members.as_ref().ok_or(GeneticError::EmptyPopulation)?;
        members.subset(&members.feasible_indices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Chromosomes, Field};
    use crate::pareto::sorting::{pareto_dominance, Dominance};

    fn population(points: &[(f64, f64)], cv: &[f64]) -> Population {
        let field = Field::real(vec![0.0, 0.0], vec![10.0, 10.0]).unwrap();
        let chroms = Chromosomes::Real(points.iter().map(|&(a, b)| vec![a, b]).collect());
        let mut pop = Population::from_chromosomes(field, chroms).unwrap();
        pop.set_evaluation(
            points.iter().map(|&(a, b)| vec![a, b]).collect(),
            cv.iter().map(|&c| vec![c]).collect(),
        )
        .unwrap();
        pop
    }

    #[test]
    fn test_keeps_only_first_level() {
        let pop = population(&[(1.0, 4.0), (2.0, 2.0), (3.0, 3.0), (4.0, 1.0)], &[0.0; 4]);
        let archive = update_archive(&pop, &[1.0, 1.0], 10, None).unwrap();
        assert_eq!(archive.len(), 3);
        let objs = archive.objectives();
        for a in objs {
            for b in objs {
                assert_ne!(pareto_dominance(a, b), Dominance::Left);
            }
        }
    }

    #[test]
    fn test_truncates_most_crowded_first() {
        let pop = population(
            &[(0.0, 10.0), (4.9, 5.1), (5.0, 5.0), (5.1, 4.9), (10.0, 0.0)],
            &[0.0; 5],
        );
        let archive = update_archive(&pop, &[1.0, 1.0], 3, None).unwrap();
        assert_eq!(archive.len(), 3);
        let objs = archive.objectives();
        assert!(objs.contains(&vec![0.0, 10.0]));
        assert!(objs.contains(&vec![10.0, 0.0]));
    }

    #[test]
    fn test_merges_across_updates() {
        let mut archive = Archive::new(4).unwrap();
        archive
            .update(&population(&[(3.0, 3.0), (5.0, 5.0)], &[0.0, 0.0]), &[1.0, 1.0])
            .unwrap();
        assert_eq!(archive.len(), 1);
        archive
            .update(&population(&[(1.0, 4.0), (4.0, 1.0), (2.0, 2.0)], &[0.0; 3]), &[1.0, 1.0])
            .unwrap();
        // (2, 2) dominates (3, 3).
        assert_eq!(archive.len(), 3);
        assert!(archive.len() <= archive.max_size());
    }

    #[test]
    fn test_feasible_members_strip_infeasible() {
        // Only infeasible candidates: the least violating one survives the update.
        let mut archive = Archive::new(5).unwrap();
        archive
            .update(&population(&[(1.0, 1.0), (2.0, 2.0)], &[0.5, 2.0]), &[1.0, 1.0])
            .unwrap();
        assert_eq!(archive.len(), 1);
        assert!(archive.feasible_members().unwrap().is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Archive::new(0).is_err());
        let pop = population(&[(1.0, 1.0)], &[0.0]);
        assert!(update_archive(&pop, &[1.0, 1.0], 0, None).is_err());
    }
}
