use tracing::warn;

use super::domain::CriterionSpec;
use super::error::ScoringError;

/// Map a raw score onto a dimensionless `[0, 1]` fraction of its scale.
///
/// Inverse criteria flip the scale so that lower raw values normalize
/// higher. A degenerate scale (`scale_max <= scale_min`) is a configuration
/// error and fails loudly rather than producing NaN. Raw values outside the
/// scale are clamped to the nearest bound and logged.
pub fn normalized_fraction(raw: f64, spec: &CriterionSpec) -> Result<f64, ScoringError> {
    if spec.scale_max <= spec.scale_min {
        return Err(ScoringError::InvalidScale {
            key: spec.key.clone(),
            scale_min: spec.scale_min,
            scale_max: spec.scale_max,
        });
    }

    if raw < spec.scale_min || raw > spec.scale_max {
        warn!(
            criterion = %spec.key,
            raw,
            scale_min = spec.scale_min,
            scale_max = spec.scale_max,
            "raw score outside criterion scale, clamping"
        );
    }

    let fraction = ((raw - spec.scale_min) / (spec.scale_max - spec.scale_min)).clamp(0.0, 1.0);

    if spec.is_inverse {
        Ok(1.0 - fraction)
    } else {
        Ok(fraction)
    }
}

/// Weighted contribution of a single raw score: normalized fraction times
/// the criterion weight. Weight zero is a valid way to exclude a criterion
/// without removing it; negative weights are a caller error.
pub fn weighted_score(raw: f64, spec: &CriterionSpec) -> Result<f64, ScoringError> {
    if spec.weight < 0.0 {
        return Err(ScoringError::NegativeWeight {
            key: spec.key.clone(),
            weight: spec.weight,
        });
    }

    Ok(normalized_fraction(raw, spec)? * spec.weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_identity_on_the_unit_scale() {
        let spec = CriterionSpec {
            scale_min: 0.0,
            scale_max: 1.0,
            ..CriterionSpec::new("fit")
        };
        assert_eq!(normalized_fraction(0.25, &spec).expect("valid scale"), 0.25);
    }

    #[test]
    fn fraction_accounts_for_shifted_scales() {
        let spec = CriterionSpec {
            scale_min: 1.0,
            scale_max: 5.0,
            ..CriterionSpec::new("fit")
        };
        assert_eq!(normalized_fraction(3.0, &spec).expect("valid scale"), 0.5);
    }

    #[test]
    fn inverse_criterion_flips_the_scale() {
        let spec = CriterionSpec {
            is_inverse: true,
            ..CriterionSpec::new("risk")
        };
        assert_eq!(normalized_fraction(2.0, &spec).expect("valid scale"), 0.8);
    }

    #[test]
    fn out_of_range_raw_values_clamp_to_the_scale() {
        let spec = CriterionSpec::new("fit");
        assert_eq!(normalized_fraction(14.0, &spec).expect("valid scale"), 1.0);
        assert_eq!(normalized_fraction(-3.0, &spec).expect("valid scale"), 0.0);
    }

    #[test]
    fn degenerate_scale_is_a_configuration_error() {
        let spec = CriterionSpec {
            scale_min: 5.0,
            scale_max: 5.0,
            ..CriterionSpec::new("fit")
        };
        match normalized_fraction(5.0, &spec) {
            Err(ScoringError::InvalidScale { key, .. }) => assert_eq!(key, "fit"),
            other => panic!("expected invalid scale error, got {other:?}"),
        }
    }

    #[test]
    fn negative_weight_is_rejected() {
        let spec = CriterionSpec {
            weight: -1.0,
            ..CriterionSpec::new("fit")
        };
        assert!(matches!(
            weighted_score(5.0, &spec),
            Err(ScoringError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn weight_scales_the_fraction() {
        let spec = CriterionSpec {
            weight: 2.0,
            ..CriterionSpec::new("revenue")
        };
        assert_eq!(weighted_score(8.0, &spec).expect("valid scale"), 1.6);
    }
}
