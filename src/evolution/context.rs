/// Read-only view of the run state handed to breeding and reinsertion
/// strategies each generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationContext {
    /// Counted generations so far, starting at 0.
    pub generation: usize,
    /// Generation budget of the run, used by schedules such as the RVEA angle penalty.
    pub max_generations: usize,
    /// Evaluations performed so far.
    pub evaluations: usize,
    /// Direction signs, `+1` minimise / `-1` maximise.
    pub signs: Vec<f64>,
    /// Duplication rate reported by the reinsertion strategy (archive genotypes), if any.
    pub duplication_rate: f64,
}

impl GenerationContext {
    pub fn new(signs: Vec<f64>, max_generations: usize) -> Self {
        Self {
            generation: 0,
            max_generations,
            evaluations: 0,
            signs,
            duplication_rate: 0.0,
        }
    }

    pub fn num_objectives(&self) -> usize {
        self.signs.len()
    }
}
