use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for criteria as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriterionId(pub String);

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only snapshot of one evaluation dimension from the active criteria
/// version. Never mutated by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub id: CriterionId,
    /// Human-readable key used by UI forms and stored score rows.
    pub key: String,
    /// Relative importance. Weights need not sum to any fixed total; the
    /// aggregate divides by the total weight actually used.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// When true a lower raw value is better and the scale is flipped before
    /// weighting (cost, risk, complexity).
    #[serde(default)]
    pub is_inverse: bool,
    #[serde(default)]
    pub scale_min: f64,
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
}

fn default_weight() -> f64 {
    1.0
}

fn default_scale_max() -> f64 {
    10.0
}

impl CriterionSpec {
    /// Spec with the default weight and 0..10 scale, keyed by `key`.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            id: CriterionId(key.clone()),
            key,
            weight: default_weight(),
            is_inverse: false,
            scale_min: 0.0,
            scale_max: default_scale_max(),
        }
    }

    /// Substitute spec for a raw score whose criterion definition is missing
    /// (e.g. deleted from the active version after scores were saved).
    pub fn fallback(key: &str, scale_max: f64) -> Self {
        Self {
            scale_max,
            ..Self::new(key)
        }
    }
}

/// One observation entering the aggregate: a raw rating plus the criterion
/// metadata it was recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub raw: f64,
    pub spec: CriterionSpec,
}

/// Output shaping for an aggregate calculation.
///
/// The internal `[0, 1]` fraction is rescaled to `[output_min, output_max]`
/// when `normalize_output` is set, then rounded to `decimal_places` digits
/// (capped at 12, past the precision an f64 score carries anyway).
/// Defaults match the dashboard surfaces (0..10, two decimals); committee
/// review screens use [`ScoreOptions::committee`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOptions {
    #[serde(default = "default_normalize_output")]
    pub normalize_output: bool,
    #[serde(default)]
    pub output_min: f64,
    #[serde(default = "default_output_max")]
    pub output_max: f64,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

fn default_normalize_output() -> bool {
    true
}

fn default_output_max() -> f64 {
    10.0
}

fn default_decimal_places() -> u32 {
    2
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            normalize_output: true,
            output_min: 0.0,
            output_max: 10.0,
            decimal_places: 2,
        }
    }
}

impl ScoreOptions {
    /// The 1..5 output range used by committee review screens.
    pub fn committee() -> Self {
        Self {
            output_min: 1.0,
            output_max: 5.0,
            ..Self::default()
        }
    }

    /// Scale ceiling assumed for scores whose criterion definition is gone.
    pub(crate) fn fallback_scale_max(&self) -> f64 {
        if self.normalize_output {
            self.output_max
        } else {
            default_output_max()
        }
    }
}
