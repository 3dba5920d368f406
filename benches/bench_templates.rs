use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use genmoea::{
    encoding::Field,
    error::Result,
    evolution::{EvolutionOptions, LogLevel, Template},
    population::Population,
    problem::{Evaluation, Problem},
    rng::RandomNumberGenerator,
};

/// ZDT1; the Pareto front is `f2 = 1 - sqrt(f1)`.
struct Zdt1;

impl Problem for Zdt1 {
    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate_individual(&self, x: &[f64]) -> Result<Evaluation> {
        let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (x.len() - 1) as f64;
        let f1 = x[0];
        let f2 = g * (1.0 - (f1 / g).sqrt());
        Ok(Evaluation::unconstrained(vec![f1, f2]))
    }
}

fn bench_templates(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");
    group.sample_size(10);

    for template in [Template::Nsga2, Template::AwGa].iter() {
        for size in [20, 100].iter() {
            let options = EvolutionOptions::new(20, LogLevel::None);

            group.bench_with_input(
                BenchmarkId::new(template.to_string(), size),
                &options,
                |b, options| {
                    b.iter(|| {
                        let field = Field::real(vec![0.0; 10], vec![1.0; 10]).unwrap();
                        let mut engine = template
                            .build(Zdt1, Population::new(field, *size), options.clone())
                            .unwrap();
                        let result = engine.run(black_box(&mut RandomNumberGenerator::from_seed(1)));
                        assert!(result.is_ok());
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_templates);
criterion_main!(benches);
