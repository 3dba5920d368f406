use genmoea::{
    encoding::{Chromosomes, Field},
    error::Result,
    evolution::{EvolutionOptions, Template},
    pareto::{pareto_dominance, Archive, Dominance},
    population::Population,
    problem::{Evaluation, Problem},
    rng::RandomNumberGenerator,
};

/// Binh and Korn with its two constraints expressed as violations.
struct BinhKorn;

impl Problem for BinhKorn {
    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate_individual(&self, v: &[f64]) -> Result<Evaluation> {
        let (x, y) = (v[0], v[1]);
        let f1 = 4.0 * x * x + 4.0 * y * y;
        let f2 = (x - 5.0).powi(2) + (y - 5.0).powi(2);
        let g1 = (x - 5.0).powi(2) + y * y - 25.0;
        let g2 = 7.7 - (x - 8.0).powi(2) - (y + 3.0).powi(2);
        Ok(Evaluation::new(vec![f1, f2], vec![g1, g2]))
    }
}

fn evaluated(points: &[(f64, f64)], cv: &[f64]) -> Population {
    let field = Field::real(vec![-10.0, -10.0], vec![10.0, 10.0]).unwrap();
    let rows: Vec<Vec<f64>> = points.iter().map(|&(a, b)| vec![a, b]).collect();
    let mut pop = Population::from_chromosomes(field, Chromosomes::Real(rows.clone())).unwrap();
    pop.set_evaluation(rows, cv.iter().map(|&c| vec![c]).collect())
        .unwrap();
    pop
}

#[test]
fn test_awga_returns_feasible_bounded_front() {
    let field = Field::real(vec![0.0, 0.0], vec![5.0, 3.0]).unwrap();
    let population = Population::new(field, 24);
    let options = EvolutionOptions::builder().max_generations(25).build();
    let mut engine = Template::AwGa.build(BinhKorn, population, options).unwrap();
    let result = engine.run(&mut RandomNumberGenerator::from_seed(17)).unwrap();

    assert_eq!(result.population.len(), 24);
    assert!(!result.solutions.is_empty());
    assert!(result.solutions.len() <= 24);
    for i in 0..result.solutions.len() {
        assert!(result.solutions.is_feasible(i));
    }
    for a in result.solutions.objectives() {
        for b in result.solutions.objectives() {
            assert_ne!(pareto_dominance(a, b), Dominance::Left);
        }
    }
}

#[test]
fn test_archive_across_updates() {
    let signs = [1.0, 1.0];
    let mut archive = Archive::new(3).unwrap();
    archive
        .update(&evaluated(&[(1.0, 5.0), (2.0, 4.0), (6.0, 6.0)], &[0.0, 0.0, 0.0]), &signs)
        .unwrap();
    assert_eq!(archive.len(), 2);

    archive
        .update(
            &evaluated(
                &[(3.0, 3.0), (4.0, 2.0), (5.0, 1.0), (0.0, 0.0)],
                &[0.0, 0.0, 0.0, 4.0],
            ),
            &signs,
        )
        .unwrap();
    assert_eq!(archive.len(), 3);
    let members = archive.members().unwrap();
    // Boundary members of the front are never the most crowded.
    assert!(members.objectives().contains(&vec![1.0, 5.0]));
    assert!(members.objectives().contains(&vec![5.0, 1.0]));
    assert_eq!(archive.feasible_members().unwrap().len(), 3);
}

#[test]
fn test_archive_duplication_rate() {
    let mut archive = Archive::new(4).unwrap();
    archive
        .update(&evaluated(&[(1.0, 2.0), (1.0, 2.0), (2.0, 1.0), (2.0, 1.0)], &[0.0; 4]), &[1.0, 1.0])
        .unwrap();
    assert!((archive.duplication_rate() - 0.5).abs() < 1e-12);
    assert!(Archive::new(0).is_err());
}
