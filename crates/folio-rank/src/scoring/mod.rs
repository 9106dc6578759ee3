//! Score aggregation engine.
//!
//! Converts per-criterion ratings (each with its own scale, weight, and
//! inverse semantics) into a single normalized project score. Every surface
//! that shows or stores a score (live previews, the project rescore flow, the
//! batch recompute driver) routes through [`compute_overall_score`] or its
//! map-based adapter [`compute_preview_score`], so call sites cannot drift
//! apart on what a project is "worth".

mod aggregate;
mod domain;
mod error;
mod normalize;
mod preview;

pub use aggregate::compute_overall_score;
pub use domain::{CriterionId, CriterionScore, CriterionSpec, ScoreOptions};
pub use error::ScoringError;
pub use normalize::{normalized_fraction, weighted_score};
pub use preview::compute_preview_score;
