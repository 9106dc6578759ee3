/// Calculation failures that must surface at the point of use instead of
/// degrading into a NaN that renders like a real score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("criterion '{key}' has an unusable scale ({scale_min}..{scale_max})")]
    InvalidScale {
        key: String,
        scale_min: f64,
        scale_max: f64,
    },
    #[error("criterion '{key}' has a negative weight ({weight})")]
    NegativeWeight { key: String, weight: f64 },
}
