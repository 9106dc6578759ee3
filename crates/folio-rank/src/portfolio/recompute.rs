use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::scoring::{compute_preview_score, ScoreOptions};

use super::repository::{PortfolioRepository, RepositoryError};
use super::service::raw_score_map;

/// Tally of a full recompute pass, reported to operators when the run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeSummary {
    /// Organizations that had an active criteria version and were processed.
    pub organizations: usize,
    /// Projects whose score was recomputed and written back.
    pub scored: usize,
    /// Projects skipped because they had no ratings for the active version.
    pub skipped: usize,
    /// Projects (or organizations) that failed to load, score, or persist.
    pub failed: usize,
}

/// Administrative driver that recomputes and persists every project score.
///
/// Runs out-of-band, never on the request-serving path. Recomputation is
/// idempotent: the same stored ratings and criteria always produce the same
/// score, so a cancelled or partially failed run can simply be re-run.
pub struct RecomputeRunner<R> {
    repository: Arc<R>,
    options: ScoreOptions,
}

impl<R> RecomputeRunner<R>
where
    R: PortfolioRepository,
{
    pub fn new(repository: Arc<R>, options: ScoreOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    /// Walk every organization and project sequentially, writing freshly
    /// computed scores back through the repository.
    ///
    /// Per-project failures are logged with organization and project context
    /// and counted, never propagated; one broken project must not abort a
    /// fleet-wide recompute. Raising `cancel` stops the run between projects
    /// without rolling anything back. Only a failure to list the
    /// organizations themselves aborts the run.
    pub fn run(&self, cancel: &AtomicBool) -> Result<RecomputeSummary, RepositoryError> {
        let organizations = self.repository.organizations()?;
        let mut summary = RecomputeSummary::default();

        'organizations: for organization in organizations {
            let version = match self.repository.active_criteria(&organization) {
                Ok(Some(version)) => version,
                Ok(None) => {
                    info!(
                        organization = %organization,
                        "no active criteria version, skipping organization"
                    );
                    continue;
                }
                Err(error) => {
                    warn!(
                        organization = %organization,
                        %error,
                        "failed to load active criteria, skipping organization"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            summary.organizations += 1;

            let projects = match self.repository.projects(&organization) {
                Ok(projects) => projects,
                Err(error) => {
                    warn!(
                        organization = %organization,
                        %error,
                        "failed to list projects, skipping organization"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            for project in projects {
                if cancel.load(Ordering::Relaxed) {
                    info!(
                        organization = %organization,
                        "recompute cancelled, stopping before the next project"
                    );
                    break 'organizations;
                }

                let rows = match self.repository.criterion_scores(&project.id, &version.id) {
                    Ok(rows) => rows,
                    Err(error) => {
                        warn!(
                            organization = %organization,
                            project = %project.id,
                            %error,
                            "failed to load criterion scores"
                        );
                        summary.failed += 1;
                        continue;
                    }
                };

                if rows.is_empty() {
                    info!(
                        organization = %organization,
                        project = %project.id,
                        "no ratings recorded for the active version, skipping"
                    );
                    summary.skipped += 1;
                    continue;
                }

                let raw = raw_score_map(&rows);
                let score = match compute_preview_score(&raw, &version.criteria, &self.options) {
                    Ok(score) => score,
                    Err(error) => {
                        warn!(
                            organization = %organization,
                            project = %project.id,
                            %error,
                            "score calculation failed"
                        );
                        summary.failed += 1;
                        continue;
                    }
                };

                match self.repository.write_score(&project.id, score) {
                    Ok(()) => summary.scored += 1,
                    Err(error) => {
                        warn!(
                            organization = %organization,
                            project = %project.id,
                            %error,
                            "failed to persist recomputed score"
                        );
                        summary.failed += 1;
                    }
                }
            }
        }

        info!(
            organizations = summary.organizations,
            scored = summary.scored,
            skipped = summary.skipped,
            failed = summary.failed,
            "portfolio score recompute finished"
        );

        Ok(summary)
    }
}
