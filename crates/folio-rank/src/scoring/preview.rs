use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use super::aggregate::compute_overall_score;
use super::domain::{CriterionScore, CriterionSpec, ScoreOptions};
use super::error::ScoringError;

/// Score a flat `criterion key -> raw value` map against a criteria
/// definition list.
///
/// This is the adapter used by live UI previews, and the persisted paths
/// (project rescore, batch recompute) feed their stored rows through it too,
/// so a preview and the stored score agree for the same inputs.
///
/// Keys with no matching definition fall back to weight 1, a non-inverse
/// 0..output-appropriate scale, and are logged; they still count toward the
/// aggregate so a deleted criterion does not silently vanish from old
/// projects. When the definition list carries duplicate keys the last entry
/// wins.
pub fn compute_preview_score(
    raw_scores: &BTreeMap<String, f64>,
    criteria: &[CriterionSpec],
    options: &ScoreOptions,
) -> Result<f64, ScoringError> {
    let mut by_key: HashMap<&str, &CriterionSpec> = HashMap::with_capacity(criteria.len());
    for spec in criteria {
        by_key.insert(spec.key.as_str(), spec);
    }

    let mut scores = Vec::with_capacity(raw_scores.len());
    for (key, raw) in raw_scores {
        let spec = match by_key.get(key.as_str()) {
            Some(spec) => (*spec).clone(),
            None => {
                warn!(
                    criterion = %key,
                    "no definition for scored criterion, falling back to default weight and scale"
                );
                CriterionSpec::fallback(key, options.fallback_scale_max())
            }
        };
        scores.push(CriterionScore { raw: *raw, spec });
    }

    compute_overall_score(&scores, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn preview_matches_the_direct_aggregate() {
        let criteria = vec![
            CriterionSpec {
                weight: 2.0,
                ..CriterionSpec::new("revenue")
            },
            CriterionSpec {
                is_inverse: true,
                ..CriterionSpec::new("risk")
            },
        ];
        let scores: Vec<CriterionScore> = criteria
            .iter()
            .zip([8.0, 2.0])
            .map(|(spec, raw)| CriterionScore {
                raw,
                spec: spec.clone(),
            })
            .collect();

        let direct = compute_overall_score(&scores, &ScoreOptions::default()).expect("valid");
        let preview = compute_preview_score(
            &raw(&[("revenue", 8.0), ("risk", 2.0)]),
            &criteria,
            &ScoreOptions::default(),
        )
        .expect("valid");

        assert_eq!(direct, preview);
    }

    #[test]
    fn unknown_keys_use_the_fallback_spec() {
        // No definitions at all: every key falls back to weight 1 on 0..10,
        // so a lone raw 5 previews as 5.00.
        let result = compute_preview_score(
            &raw(&[("ghost", 5.0)]),
            &[],
            &ScoreOptions::default(),
        )
        .expect("fallback applies");
        assert_eq!(result, 5.0);
    }

    #[test]
    fn fallback_scale_follows_the_committee_output_range() {
        // Under the 1..5 committee range the fallback scale tops out at 5,
        // so a raw 5 is a full-marks fraction.
        let result = compute_preview_score(
            &raw(&[("ghost", 5.0)]),
            &[],
            &ScoreOptions::committee(),
        )
        .expect("fallback applies");
        assert_eq!(result, 5.0);
    }

    #[test]
    fn duplicate_definition_keys_resolve_last_seen_wins() {
        let criteria = vec![
            CriterionSpec {
                weight: 4.0,
                is_inverse: true,
                ..CriterionSpec::new("fit")
            },
            CriterionSpec::new("fit"),
        ];
        let result = compute_preview_score(
            &raw(&[("fit", 8.0)]),
            &criteria,
            &ScoreOptions::default(),
        )
        .expect("valid");
        // The later, non-inverse weight-1 definition is the one applied.
        assert_eq!(result, 8.0);
    }

    #[test]
    fn criteria_without_submitted_scores_are_not_substituted() {
        let criteria = vec![
            CriterionSpec::new("revenue"),
            CriterionSpec::new("strategic_fit"),
        ];
        let result = compute_preview_score(
            &raw(&[("revenue", 6.0)]),
            &criteria,
            &ScoreOptions::default(),
        )
        .expect("valid");
        // Only the submitted criterion participates; no default value is
        // invented for strategic_fit.
        assert_eq!(result, 6.0);
    }

    #[test]
    fn empty_form_previews_as_zero() {
        let criteria = vec![CriterionSpec::new("revenue")];
        let result = compute_preview_score(&raw(&[]), &criteria, &ScoreOptions::default())
            .expect("empty is valid");
        assert_eq!(result, 0.0);
    }

    #[test]
    fn broken_definition_surfaces_instead_of_scoring() {
        let criteria = vec![CriterionSpec {
            scale_min: 5.0,
            scale_max: 5.0,
            ..CriterionSpec::new("broken")
        }];
        assert!(matches!(
            compute_preview_score(&raw(&[("broken", 5.0)]), &criteria, &ScoreOptions::default()),
            Err(ScoringError::InvalidScale { .. })
        ));
    }
}
