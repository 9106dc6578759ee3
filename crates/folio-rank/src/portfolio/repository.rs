use super::domain::{
    CriteriaVersion, CriteriaVersionId, OrganizationId, ProjectId, ProjectRecord,
    StoredCriterionScore,
};

/// Storage abstraction so the scoring service and the recompute driver can
/// be exercised in isolation. Real deployments back this with the relational
/// store; the api crate and the tests supply in-memory implementations.
pub trait PortfolioRepository: Send + Sync {
    fn organizations(&self) -> Result<Vec<OrganizationId>, RepositoryError>;

    /// The active criteria version for an organization, `None` when the
    /// organization has not published one yet.
    fn active_criteria(
        &self,
        organization: &OrganizationId,
    ) -> Result<Option<CriteriaVersion>, RepositoryError>;

    fn projects(&self, organization: &OrganizationId) -> Result<Vec<ProjectRecord>, RepositoryError>;

    fn project(
        &self,
        organization: &OrganizationId,
        project: &ProjectId,
    ) -> Result<Option<ProjectRecord>, RepositoryError>;

    /// Raw ratings recorded for a project under a specific criteria version.
    fn criterion_scores(
        &self,
        project: &ProjectId,
        version: &CriteriaVersionId,
    ) -> Result<Vec<StoredCriterionScore>, RepositoryError>;

    /// Durably store a freshly aggregated project score.
    fn write_score(&self, project: &ProjectId, score: f64) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
