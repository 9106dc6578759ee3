//! Portfolio domain: organizations, projects, criteria versions, and the
//! operations that turn stored per-criterion ratings into persisted project
//! scores.

pub mod domain;
pub mod recompute;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    CriteriaVersion, CriteriaVersionId, OrganizationId, ProjectId, ProjectRecord,
    StoredCriterionScore,
};
pub use recompute::{RecomputeRunner, RecomputeSummary};
pub use repository::{PortfolioRepository, RepositoryError};
pub use router::portfolio_router;
pub use service::{PortfolioService, PortfolioServiceError, ProjectScoreView, ScorePreview};
