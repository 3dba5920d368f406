//! # Pareto machinery
//!
//! Environmental-selection building blocks shared by the multi-objective
//! templates: feasibility-aware non-dominated sorting, crowding distance,
//! reference-point niching, angle-penalised reference-vector selection and the
//! bounded non-dominated archive.
//!
//! All functions expect direction-adjusted objectives, i.e. rows already
//! multiplied by the problem's direction signs so that every objective is
//! minimised.
pub mod archive;
pub mod crowding;
pub mod reference_points;
pub mod reference_vectors;
pub mod sorting;

pub use archive::{update_archive, Archive};
pub use crowding::crowding_distance;
pub use reference_points::{normalize, perpendicular_distance, reference_point_select, uniform_points};
pub use reference_vectors::{angle_penalty, ReferenceVectors};
pub use sorting::{
    constrained_dominance, non_dominated_sort, pareto_dominance, Dominance, ParetoLevels, UNRANKED,
};
