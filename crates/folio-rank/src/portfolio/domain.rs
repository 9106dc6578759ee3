use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::CriterionSpec;

/// Identifier wrapper for tenant organizations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganizationId(pub String);

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for portfolio projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for criteria versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CriteriaVersionId(pub String);

impl fmt::Display for CriteriaVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The currently-effective criteria set for an organization. All new scoring
/// for the organization happens against this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaVersion {
    pub id: CriteriaVersionId,
    pub label: String,
    pub criteria: Vec<CriterionSpec>,
}

/// Project record as exposed by the persistence collaborator. `score` is the
/// stored, authoritative aggregate; `None` until the first rescore or batch
/// recompute writes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    pub score: Option<f64>,
    pub scored_on: Option<NaiveDate>,
}

/// One persisted raw rating for a project under a criteria version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCriterionScore {
    pub criterion_key: String,
    pub value: f64,
}
