//! Reference points on the unit simplex and niche-count-balanced selection.
//!
//! Individuals above the critical level always survive. The critical level
//! fills the remaining slots niche by niche: objectives are normalised
//! (ideal-point translation, hyperplane intercepts through the ASF extreme
//! points), every candidate is associated with the reference direction at the
//! smallest perpendicular distance, and the least crowded direction receives
//! its closest unselected candidate until no slot is left.

use crate::error::{GeneticError, Result};
use crate::pareto::sorting::ParetoLevels;
use crate::rng::RandomNumberGenerator;

const MIN_COORDINATE: f64 = 1e-6;
const INTERCEPT_EPS: f64 = 1e-10;

/// Number of ways to choose `k` items out of `n`, saturating on overflow.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: usize = 1;
    for i in 0..k {
        acc = match acc.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return usize::MAX,
        };
    }
    acc
}

/// Every non-negative integer vector of length `m` summing to `h`, scaled by `1/h`.
fn simplex_lattice(m: usize, h: usize) -> Vec<Vec<f64>> {
    fn fill(prefix: &mut Vec<usize>, remaining: usize, slots: usize, h: usize, out: &mut Vec<Vec<f64>>) {
        if slots == 1 {
            prefix.push(remaining);
            out.push(prefix.iter().map(|&c| c as f64 / h as f64).collect());
            prefix.pop();
            return;
        }
        for c in (0..=remaining).rev() {
            prefix.push(c);
            fill(prefix, remaining - c, slots - 1, h, out);
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    fill(&mut Vec::with_capacity(m), h, m, h, &mut out);
    out
}

/// Generates uniformly spread points on the unit simplex.
///
/// Uses the largest Das–Dennis lattice whose cardinality `C(H+M-1, M-1)` does
/// not exceed `n`. When the lattice is coarser than the number of objectives
/// (`H < M`) an inner layer, shrunk towards the centroid, is added as long as
/// the total stays within `n`. Coordinates below `1e-6` are lifted to `1e-6`.
///
/// The returned cardinality defines the working population size. It is at
/// most `n` unless `n < m`, where the `m` simplex vertices are still returned.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` if `m` or `n` is zero.
pub fn uniform_points(m: usize, n: usize) -> Result<Vec<Vec<f64>>> {
    if m == 0 || n == 0 {
        return Err(GeneticError::Configuration(format!(
            "Cannot create reference points for {} objectives and {} individuals",
            m, n
        )));
    }
    if m == 1 {
        return Ok(vec![vec![1.0]]);
    }

    let mut h1 = 1;
    while binomial(h1 + m, m - 1) <= n {
        h1 += 1;
    }
    let mut points = simplex_lattice(m, h1);

    if h1 < m {
        let outer = points.len();
        let mut h2 = 0;
        while outer + binomial(h2 + m, m - 1) <= n {
            h2 += 1;
        }
        if h2 > 0 {
            let shift = 1.0 / (2.0 * m as f64);
            points.extend(
                simplex_lattice(m, h2)
                    .into_iter()
                    .map(|p| p.into_iter().map(|c| c / 2.0 + shift).collect::<Vec<f64>>()),
            );
        }
    }

    for point in &mut points {
        for c in point.iter_mut() {
            if *c < MIN_COORDINATE {
                *c = MIN_COORDINATE;
            }
        }
    }
    Ok(points)
}

/// Distance from `point` to the line through the origin along `direction`.
pub fn perpendicular_distance(point: &[f64], direction: &[f64]) -> f64 {
    let dot: f64 = point.iter().zip(direction).map(|(p, d)| p * d).sum();
    let norm_sq: f64 = direction.iter().map(|d| d * d).sum();
    if norm_sq <= f64::MIN_POSITIVE {
        return f64::INFINITY;
    }
    let scale = dot / norm_sq;
    point
        .iter()
        .zip(direction)
        .map(|(p, d)| (p - scale * d).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Achievement scalarising function of a translated point along axis `axis`.
fn asf(point: &[f64], axis: usize) -> f64 {
    point
        .iter()
        .enumerate()
        .map(|(k, &v)| if k == axis { v } else { v / MIN_COORDINATE })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Solves `a x = b` by Gaussian elimination with partial pivoting.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < INTERCEPT_EPS {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Normalises the rows at `members` for reference-point association.
///
/// Rows are translated by the ideal point of the members, then divided by the
/// axis intercepts of the hyperplane through the ASF extreme points. When the
/// hyperplane is degenerate (singular system, non-positive or non-finite
/// intercepts) the per-objective `max - ideal` is used instead, and a zero
/// range falls back to `1`.
pub fn normalize(objectives: &[Vec<f64>], members: &[usize]) -> Vec<Vec<f64>> {
    if members.is_empty() {
        return Vec::new();
    }
    let m = objectives[members[0]].len();
    let mut ideal = vec![f64::INFINITY; m];
    for &i in members {
        for (k, &v) in objectives[i].iter().enumerate() {
            ideal[k] = ideal[k].min(v);
        }
    }
    let translated: Vec<Vec<f64>> = members
        .iter()
        .map(|&i| objectives[i].iter().zip(&ideal).map(|(v, z)| v - z).collect())
        .collect();

    let extremes: Vec<Vec<f64>> = (0..m)
        .map(|axis| {
            translated
                .iter()
                .min_by(|a, b| asf(a, axis).total_cmp(&asf(b, axis)))
                .cloned()
                .unwrap_or_else(|| vec![0.0; m])
        })
        .collect();

    let fallback: Vec<f64> = (0..m)
        .map(|k| {
            let span = translated.iter().map(|row| row[k]).fold(0.0, f64::max);
            if span > INTERCEPT_EPS {
                span
            } else {
                1.0
            }
        })
        .collect();

    let intercepts = solve_linear(extremes, vec![1.0; m])
        .map(|w| w.into_iter().map(|wk| 1.0 / wk).collect::<Vec<f64>>())
        .filter(|a| a.iter().all(|&v| v.is_finite() && v > INTERCEPT_EPS))
        .unwrap_or(fallback);

    translated
        .into_iter()
        .map(|row| row.iter().zip(&intercepts).map(|(v, a)| v / a).collect())
        .collect()
}

/// Selects `target` individuals by Pareto level and reference-point niching.
///
/// # Arguments
///
/// * `objectives` - Direction-adjusted (minimised) objective rows.
/// * `levels` - Output of [`non_dominated_sort`](crate::pareto::non_dominated_sort)
///   for the same rows, typically with `target` as the early-exit count.
/// * `target` - Number of survivors.
/// * `reference_points` - Reference directions, e.g. from [`uniform_points`].
/// * `randomized_ties` - Break ties between equally crowded reference points
///   randomly instead of by lowest index.
///
/// # Returns
///
/// The surviving indices in ascending order. At most `target` are returned;
/// fewer only when the leveled individuals run out.
///
/// # Errors
///
/// Returns `GeneticError::DimensionMismatch` if the inputs disagree in size.
pub fn reference_point_select(
    objectives: &[Vec<f64>],
    levels: &ParetoLevels,
    target: usize,
    reference_points: &[Vec<f64>],
    randomized_ties: bool,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<usize>> {
    if objectives.len() != levels.levels.len() {
        return Err(GeneticError::DimensionMismatch(format!(
            "{} objective rows for {} levels",
            objectives.len(),
            levels.levels.len()
        )));
    }
    if reference_points.is_empty() {
        return Err(GeneticError::Configuration(
            "Reference point set is empty".to_string(),
        ));
    }
    if let Some(first) = objectives.first() {
        if reference_points.iter().any(|p| p.len() != first.len()) {
            return Err(GeneticError::DimensionMismatch(
                "Reference points and objectives differ in dimension".to_string(),
            ));
        }
    }

    let mut chosen = levels.above_critical();
    if chosen.len() >= target {
        chosen.truncate(target);
        return Ok(chosen);
    }
    let critical = levels.members(levels.critical_level);
    if chosen.len() + critical.len() <= target {
        chosen.extend(critical);
        chosen.sort_unstable();
        return Ok(chosen);
    }

    let considered: Vec<usize> = chosen.iter().chain(&critical).copied().collect();
    let normalized = normalize(objectives, &considered);

    // Association of every considered row: (reference point, distance).
    let associations: Vec<(usize, f64)> = normalized
        .iter()
        .map(|row| {
            reference_points
                .iter()
                .enumerate()
                .map(|(j, p)| (j, perpendicular_distance(row, p)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .unwrap_or((0, f64::INFINITY))
        })
        .collect();

    let mut niche_count = vec![0usize; reference_points.len()];
    for &(j, _) in &associations[..chosen.len()] {
        niche_count[j] += 1;
    }

    // Critical-level candidates per reference point, closest first.
    let mut candidates: Vec<Vec<(usize, f64)>> = vec![Vec::new(); reference_points.len()];
    for (offset, &idx) in critical.iter().enumerate() {
        let (j, d) = associations[chosen.len() + offset];
        candidates[j].push((idx, d));
    }
    for list in &mut candidates {
        list.sort_by(|a, b| b.1.total_cmp(&a.1));
    }

    let mut exhausted = vec![false; reference_points.len()];
    while chosen.len() < target {
        let open: Vec<usize> = (0..reference_points.len())
            .filter(|&j| !exhausted[j])
            .collect();
        let Some(min_count) = open.iter().map(|&j| niche_count[j]).min() else {
            break;
        };
        let tied: Vec<usize> = open.into_iter().filter(|&j| niche_count[j] == min_count).collect();
        let j = if randomized_ties {
            tied[rng.index(tied.len())]
        } else {
            tied[0]
        };

        match candidates[j].pop() {
            Some((idx, _)) => {
                chosen.push(idx);
                niche_count[j] += 1;
            }
            None => exhausted[j] = true,
        }
    }

    chosen.sort_unstable();
    Ok(chosen)
}
