use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::scoring::{compute_preview_score, ScoreOptions, ScoringError};

use super::domain::{
    CriteriaVersionId, OrganizationId, ProjectId, ProjectRecord, StoredCriterionScore,
};
use super::repository::{PortfolioRepository, RepositoryError};

/// Service composing the repository and the score aggregation engine.
///
/// `options` is the deployment-wide default output shaping; preview callers
/// may override it per request (committee screens pass the 1..5 range).
pub struct PortfolioService<R> {
    repository: Arc<R>,
    options: ScoreOptions,
}

impl<R> PortfolioService<R>
where
    R: PortfolioRepository + 'static,
{
    pub fn new(repository: Arc<R>, options: ScoreOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    pub fn default_options(&self) -> ScoreOptions {
        self.options
    }

    /// Live preview of a self-assessment form against the organization's
    /// active criteria version. Nothing is persisted.
    pub fn preview(
        &self,
        organization: &OrganizationId,
        raw_scores: &BTreeMap<String, f64>,
        options: Option<ScoreOptions>,
    ) -> Result<ScorePreview, PortfolioServiceError> {
        let version = self
            .repository
            .active_criteria(organization)?
            .ok_or(PortfolioServiceError::NoActiveCriteria)?;

        let options = options.unwrap_or(self.options);
        let score = compute_preview_score(raw_scores, &version.criteria, &options)?;

        let unknown_keys = raw_scores
            .keys()
            .filter(|key| {
                !version
                    .criteria
                    .iter()
                    .any(|spec| spec.key.as_str() == key.as_str())
            })
            .cloned()
            .collect();

        Ok(ScorePreview {
            organization_id: organization.clone(),
            version_id: version.id,
            score,
            criteria_scored: raw_scores.len(),
            unknown_keys,
        })
    }

    /// Recompute one project's stored score from its persisted ratings and
    /// write it back (the single-project update flow).
    pub fn rescore(
        &self,
        organization: &OrganizationId,
        project: &ProjectId,
    ) -> Result<ProjectScoreView, PortfolioServiceError> {
        let version = self
            .repository
            .active_criteria(organization)?
            .ok_or(PortfolioServiceError::NoActiveCriteria)?;

        let record = self
            .repository
            .project(organization, project)?
            .ok_or(RepositoryError::NotFound)?;

        let rows = self.repository.criterion_scores(&record.id, &version.id)?;
        if rows.is_empty() {
            return Err(PortfolioServiceError::NoScores);
        }

        let raw = raw_score_map(&rows);
        let score = compute_preview_score(&raw, &version.criteria, &self.options)?;
        self.repository.write_score(&record.id, score)?;

        let stored = self
            .repository
            .project(organization, project)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(ProjectScoreView::from_record(stored, version.id))
    }

    /// Fetch a project and its stored score for API responses.
    pub fn project_view(
        &self,
        organization: &OrganizationId,
        project: &ProjectId,
    ) -> Result<ProjectScoreView, PortfolioServiceError> {
        let version = self
            .repository
            .active_criteria(organization)?
            .ok_or(PortfolioServiceError::NoActiveCriteria)?;
        let record = self
            .repository
            .project(organization, project)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(ProjectScoreView::from_record(record, version.id))
    }
}

/// Build the `key -> raw value` lookup from stored rows. The last row wins
/// when a criterion key appears more than once.
pub(crate) fn raw_score_map(rows: &[StoredCriterionScore]) -> BTreeMap<String, f64> {
    rows.iter()
        .map(|row| (row.criterion_key.clone(), row.value))
        .collect()
}

/// Preview result returned to the self-assessment UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePreview {
    pub organization_id: OrganizationId,
    pub version_id: CriteriaVersionId,
    pub score: f64,
    pub criteria_scored: usize,
    /// Submitted keys that had no definition and were scored via fallback.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_keys: Vec<String>,
}

/// Sanitized representation of a project's stored score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectScoreView {
    pub project_id: ProjectId,
    pub name: String,
    pub version_id: CriteriaVersionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scored_on: Option<chrono::NaiveDate>,
}

impl ProjectScoreView {
    fn from_record(record: ProjectRecord, version_id: CriteriaVersionId) -> Self {
        Self {
            project_id: record.id,
            name: record.name,
            version_id,
            score: record.score,
            scored_on: record.scored_on,
        }
    }
}

/// Error raised by the portfolio service.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioServiceError {
    #[error("organization has no active criteria version")]
    NoActiveCriteria,
    #[error("project has no recorded criterion scores")]
    NoScores,
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
