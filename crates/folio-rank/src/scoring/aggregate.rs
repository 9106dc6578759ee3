use super::domain::{CriterionScore, ScoreOptions};
use super::error::ScoringError;
use super::normalize::weighted_score;

/// Combine a set of per-criterion observations into one project-level score.
///
/// An empty input set is the valid "nothing scored yet" state and yields 0
/// regardless of the options. A criterion with weight 0 contributes to
/// neither the numerator nor the denominator. The only error condition is a
/// malformed [`CriterionSpec`](super::CriterionSpec), which is raised to the
/// caller instead of leaking NaN into a displayed or stored value.
pub fn compute_overall_score(
    scores: &[CriterionScore],
    options: &ScoreOptions,
) -> Result<f64, ScoringError> {
    if scores.is_empty() {
        return Ok(0.0);
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for score in scores {
        weighted_sum += weighted_score(score.raw, &score.spec)?;
        total_weight += score.spec.weight;
    }

    let fraction = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    let value = if options.normalize_output {
        options.output_min + fraction * (options.output_max - options.output_min)
    } else {
        fraction
    };

    Ok(round_to(value, options.decimal_places))
}

/// Largest honored rounding precision. f64 cannot distinguish digits this
/// far out, and a larger power-of-ten shift overflows to infinity, which
/// would turn the rounding division into NaN.
const MAX_DECIMAL_PLACES: u32 = 12;

/// Decimal rounding, half away from zero (`f64::round` semantics). Requests
/// beyond [`MAX_DECIMAL_PLACES`] digits are capped there; `decimal_places`
/// arrives unvalidated from request payloads.
fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places.min(MAX_DECIMAL_PLACES) as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::super::domain::CriterionSpec;
    use super::*;

    fn score(raw: f64, spec: CriterionSpec) -> CriterionScore {
        CriterionScore { raw, spec }
    }

    fn revenue_and_risk(revenue: f64, risk: f64) -> Vec<CriterionScore> {
        vec![
            score(
                revenue,
                CriterionSpec {
                    weight: 2.0,
                    ..CriterionSpec::new("revenue")
                },
            ),
            score(
                risk,
                CriterionSpec {
                    is_inverse: true,
                    ..CriterionSpec::new("risk")
                },
            ),
        ]
    }

    #[test]
    fn empty_input_scores_zero_for_any_options() {
        assert_eq!(
            compute_overall_score(&[], &ScoreOptions::default()).expect("empty is valid"),
            0.0
        );
        assert_eq!(
            compute_overall_score(&[], &ScoreOptions::committee()).expect("empty is valid"),
            0.0
        );
    }

    #[test]
    fn weighted_inverse_mix_aggregates_to_the_expected_dashboard_score() {
        // revenue 8/10 normalizes to 0.8; inverse risk 2/10 also to 0.8;
        // (0.8*2 + 0.8*1) / 3 = 0.8 -> 8.00 on the 0..10 range.
        let result = compute_overall_score(&revenue_and_risk(8.0, 2.0), &ScoreOptions::default())
            .expect("valid criteria");
        assert_eq!(result, 8.0);
    }

    #[test]
    fn midpoint_scores_aggregate_to_the_midpoint() {
        let result = compute_overall_score(&revenue_and_risk(5.0, 5.0), &ScoreOptions::default())
            .expect("valid criteria");
        assert_eq!(result, 5.0);
    }

    #[test]
    fn single_criterion_on_a_matching_range_is_the_identity() {
        let scores = vec![score(7.0, CriterionSpec::new("fit"))];
        let result =
            compute_overall_score(&scores, &ScoreOptions::default()).expect("valid criteria");
        assert_eq!(result, 7.0);
    }

    #[test]
    fn single_inverse_criterion_mirrors_the_scale() {
        let scores = vec![score(
            7.0,
            CriterionSpec {
                is_inverse: true,
                ..CriterionSpec::new("risk")
            },
        )];
        let result =
            compute_overall_score(&scores, &ScoreOptions::default()).expect("valid criteria");
        assert_eq!(result, 3.0);
    }

    #[test]
    fn committee_range_rescales_the_fraction() {
        let scores = vec![score(10.0, CriterionSpec::new("fit"))];
        let result =
            compute_overall_score(&scores, &ScoreOptions::committee()).expect("valid criteria");
        assert_eq!(result, 5.0);
    }

    #[test]
    fn weight_zero_excludes_a_criterion_even_with_wild_raw_values() {
        let baseline = compute_overall_score(&revenue_and_risk(8.0, 2.0), &ScoreOptions::default())
            .expect("valid criteria");

        let mut scores = revenue_and_risk(8.0, 2.0);
        scores.push(score(
            9999.0,
            CriterionSpec {
                weight: 0.0,
                ..CriterionSpec::new("ignored")
            },
        ));
        let with_excluded =
            compute_overall_score(&scores, &ScoreOptions::default()).expect("valid criteria");

        assert_eq!(baseline, with_excluded);
    }

    #[test]
    fn all_weights_zero_degrades_to_zero_not_nan() {
        let scores = vec![score(
            7.0,
            CriterionSpec {
                weight: 0.0,
                ..CriterionSpec::new("fit")
            },
        )];
        assert_eq!(
            compute_overall_score(&scores, &ScoreOptions::default()).expect("valid criteria"),
            0.0
        );
    }

    #[test]
    fn uniformly_scaling_weights_leaves_the_aggregate_unchanged() {
        let baseline = compute_overall_score(&revenue_and_risk(7.0, 3.0), &ScoreOptions::default())
            .expect("valid criteria");

        let mut scaled = revenue_and_risk(7.0, 3.0);
        for entry in &mut scaled {
            entry.spec.weight *= 17.5;
        }
        let rescaled =
            compute_overall_score(&scaled, &ScoreOptions::default()).expect("valid criteria");

        assert_eq!(baseline, rescaled);
    }

    #[test]
    fn output_is_rounded_to_the_configured_decimal_places() {
        // 0.123456 of the 0..10 range is 1.23456, which rounds to 1.23.
        let spec = CriterionSpec {
            scale_min: 0.0,
            scale_max: 1.0,
            ..CriterionSpec::new("fit")
        };
        let result = compute_overall_score(
            &[score(0.123456, spec.clone())],
            &ScoreOptions::default(),
        )
        .expect("valid criteria");
        assert_eq!(result, 1.23);

        // Halfway values round away from zero: 2.5 -> 3 at zero decimals.
        let options = ScoreOptions {
            decimal_places: 0,
            ..ScoreOptions::default()
        };
        let result =
            compute_overall_score(&[score(0.25, spec)], &options).expect("valid criteria");
        assert_eq!(result, 3.0);
    }

    #[test]
    fn oversized_decimal_places_round_at_the_supported_precision_not_nan() {
        let options = ScoreOptions {
            decimal_places: 400,
            ..ScoreOptions::default()
        };
        let result =
            compute_overall_score(&revenue_and_risk(8.0, 2.0), &options).expect("valid criteria");
        assert!(result.is_finite());
        assert_eq!(result, 8.0);
    }

    #[test]
    fn skipping_output_normalization_returns_the_raw_fraction() {
        let options = ScoreOptions {
            normalize_output: false,
            ..ScoreOptions::default()
        };
        let result = compute_overall_score(&revenue_and_risk(8.0, 2.0), &options)
            .expect("valid criteria");
        assert_eq!(result, 0.8);
    }

    #[test]
    fn configuration_error_propagates_to_the_caller() {
        let scores = vec![score(
            5.0,
            CriterionSpec {
                scale_min: 5.0,
                scale_max: 5.0,
                ..CriterionSpec::new("broken")
            },
        )];
        assert!(matches!(
            compute_overall_score(&scores, &ScoreOptions::default()),
            Err(ScoringError::InvalidScale { .. })
        ));
    }
}
