use std::sync::atomic::{AtomicUsize, Ordering};

use genmoea::{
    encoding::{Encoding, Field},
    error::{GeneticError, Result},
    evolution::{
        EvolutionEngineBuilder, EvolutionOptions, LogLevel, Template, Termination,
        TerminationState,
    },
    operators::OperatorSet,
    population::Population,
    problem::{Direction, Evaluation, Problem},
    rng::RandomNumberGenerator,
    selection::Selection,
    strategy::GeneticStrategy,
    survival::CrowdedComparisonReinsertion,
};

struct TwoParabolas;

impl Problem for TwoParabolas {
    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
        Ok(Evaluation::unconstrained(vec![
            x[0] * x[0],
            (x[0] - 1.0).powi(2),
        ]))
    }
}

/// Declares two objectives but only ever returns one.
struct ShortRows;

impl Problem for ShortRows {
    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
        Ok(Evaluation::unconstrained(vec![x[0]]))
    }
}

/// Evaluates the first `budget` individuals, then fails.
struct FailsAfter {
    budget: usize,
    calls: AtomicUsize,
}

impl Problem for FailsAfter {
    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.budget {
            return Err(GeneticError::Evaluation("simulator crashed".to_string()));
        }
        Ok(Evaluation::unconstrained(vec![x[0], -x[0]]))
    }
}

struct NanObjective;

impl Problem for NanObjective {
    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
        Ok(Evaluation::unconstrained(vec![x[0], f64::NAN]))
    }
}

struct MismatchedDirections;

impl Problem for MismatchedDirections {
    fn num_objectives(&self) -> usize {
        2
    }

    fn directions(&self) -> Vec<Direction> {
        vec![Direction::Maximize]
    }

    fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
        Ok(Evaluation::unconstrained(vec![x[0], -x[0]]))
    }
}

#[derive(Debug)]
struct StopAtGeneration(usize);

impl Termination for StopAtGeneration {
    fn should_stop(&self, state: &TerminationState) -> bool {
        state.generation >= self.0
    }
}

fn real_field() -> Field {
    Field::real(vec![-2.0], vec![2.0]).unwrap()
}

fn nsga2_strategy() -> GeneticStrategy {
    let operators = OperatorSet::defaults_for(Selection::Tournament(2), Encoding::RealInteger).unwrap();
    GeneticStrategy::new(operators, 1.0, 1.0).unwrap()
}

#[test]
fn test_builder_reports_missing_parts() {
    let missing_problem = EvolutionEngineBuilder::<TwoParabolas>::new()
        .with_population(Population::new(real_field(), 4))
        .with_breed_strategy(nsga2_strategy())
        .with_reinsertion(CrowdedComparisonReinsertion::new())
        .build();
    assert!(matches!(missing_problem, Err(GeneticError::Configuration(_))));

    let missing_reinsertion = EvolutionEngineBuilder::new()
        .with_problem(TwoParabolas)
        .with_population(Population::new(real_field(), 4))
        .with_breed_strategy(nsga2_strategy())
        .build();
    match missing_reinsertion {
        Err(GeneticError::Configuration(message)) => assert!(message.contains("Reinsertion")),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_custom_termination() {
    let mut engine = EvolutionEngineBuilder::new()
        .with_problem(TwoParabolas)
        .with_population(Population::new(real_field(), 10))
        .with_breed_strategy(nsga2_strategy())
        .with_reinsertion(CrowdedComparisonReinsertion::new())
        .with_termination(StopAtGeneration(3))
        .build()
        .unwrap();
    let result = engine.run(&mut RandomNumberGenerator::from_seed(6)).unwrap();

    assert_eq!(result.generations, 3);
    assert_eq!(result.trace.len(), 4);
    assert_eq!(result.evaluations, 40);
}

#[test]
fn test_evaluation_budget_finishes_running_generation() {
    let options = EvolutionOptions::builder()
        .max_generations(100)
        .max_evaluations(35)
        .build();
    let mut engine = Template::Nsga2
        .build(TwoParabolas, Population::new(real_field(), 10), options)
        .unwrap();
    let result = engine.run(&mut RandomNumberGenerator::from_seed(2)).unwrap();

    // 10 + 10 + 10 < 35, the third offspring batch overshoots the budget.
    assert_eq!(result.evaluations, 40);
    assert_eq!(result.generations, 3);
}

#[test]
fn test_population_size_option_overrides_population() {
    let options = EvolutionOptions::builder()
        .max_generations(3)
        .population_size(8)
        .build();
    let mut engine = Template::Nsga2
        .build(TwoParabolas, Population::new(real_field(), 4), options)
        .unwrap();
    let result = engine.run(&mut RandomNumberGenerator::from_seed(4)).unwrap();
    assert_eq!(result.population.len(), 8);
    assert_eq!(result.evaluations, 8 + 2 * 8);
}

#[test]
fn test_differential_templates_reject_permutations() {
    for template in [Template::DifferentialEvolution, Template::Nsga3De] {
        let field = Field::permutation(5).unwrap();
        let options = EvolutionOptions::default();
        let result = if template.is_multi_objective() {
            template.build(TwoParabolas, Population::new(field, 6), options).map(|_| ())
        } else {
            struct First;
            impl Problem for First {
                fn num_objectives(&self) -> usize {
                    1
                }
                fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
                    Ok(Evaluation::unconstrained(vec![x[0]]))
                }
            }
            template.build(First, Population::new(field, 6), options).map(|_| ())
        };
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }
}

#[test]
fn test_malformed_evaluation_aborts_run() {
    let mut engine = Template::Nsga2
        .build(ShortRows, Population::new(real_field(), 6), EvolutionOptions::default())
        .unwrap();
    let result = engine.run(&mut RandomNumberGenerator::from_seed(0));
    assert!(matches!(result, Err(GeneticError::Evaluation(_))));
}

#[test]
fn test_problem_error_aborts_run() {
    let problem = FailsAfter {
        budget: 6,
        calls: AtomicUsize::new(0),
    };
    let mut engine = Template::Nsga2
        .build(problem, Population::new(real_field(), 6), EvolutionOptions::default())
        .unwrap();
    // The initial population evaluates, the first offspring batch fails.
    match engine.run(&mut RandomNumberGenerator::from_seed(3)) {
        Err(GeneticError::Evaluation(message)) => assert_eq!(message, "simulator crashed"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_nan_objective_aborts_run() {
    let mut engine = Template::Nsga2
        .build(NanObjective, Population::new(real_field(), 6), EvolutionOptions::default())
        .unwrap();
    let result = engine.run(&mut RandomNumberGenerator::from_seed(0));
    assert!(matches!(result, Err(GeneticError::InvalidNumericValue(_))));
}

#[test]
fn test_direction_count_must_match_objectives() {
    let result = Template::Nsga2.build(
        MismatchedDirections,
        Population::new(real_field(), 6),
        EvolutionOptions::default(),
    );
    assert!(matches!(result, Err(GeneticError::Configuration(_))));
}

#[test]
fn test_zero_generation_budget_rejected() {
    let options = EvolutionOptions::builder().max_generations(0).build();
    let result = Template::Nsga2.build(TwoParabolas, Population::new(real_field(), 6), options);
    assert!(matches!(result, Err(GeneticError::Configuration(_))));
}

#[test]
fn test_verbose_logging_run() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
    let options = EvolutionOptions::builder()
        .max_generations(4)
        .log_level(LogLevel::Verbose)
        .build();
    let mut engine = Template::Nsga2
        .build(TwoParabolas, Population::new(real_field(), 8), options)
        .unwrap();
    let result = engine.run(&mut RandomNumberGenerator::from_seed(9)).unwrap();
    assert_eq!(result.generations, 3);
    assert_eq!(result.trace.len(), 4);
}
