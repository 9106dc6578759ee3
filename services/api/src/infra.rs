use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::Local;
use metrics_exporter_prometheus::PrometheusHandle;

use folio_rank::portfolio::{
    CriteriaVersion, CriteriaVersionId, OrganizationId, PortfolioRepository, ProjectId,
    ProjectRecord, RepositoryError, StoredCriterionScore,
};
use folio_rank::scoring::CriterionSpec;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct OrgState {
    active: Option<CriteriaVersion>,
    projects: BTreeMap<ProjectId, ProjectRecord>,
    ratings: BTreeMap<(ProjectId, CriteriaVersionId), Vec<StoredCriterionScore>>,
}

/// In-memory stand-in for the relational store, good enough for serving the
/// reference deployment, demos, and the recompute command.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPortfolioRepository {
    organizations: Arc<Mutex<BTreeMap<OrganizationId, OrgState>>>,
}

impl InMemoryPortfolioRepository {
    pub(crate) fn upsert_organization(&self, id: &str, active: Option<CriteriaVersion>) {
        let mut guard = self.organizations.lock().expect("store mutex poisoned");
        guard.insert(
            OrganizationId(id.to_string()),
            OrgState {
                active,
                ..OrgState::default()
            },
        );
    }

    pub(crate) fn add_project(&self, organization: &str, id: &str, name: &str) {
        let organization = OrganizationId(organization.to_string());
        let project = ProjectId(id.to_string());
        let mut guard = self.organizations.lock().expect("store mutex poisoned");
        if let Some(state) = guard.get_mut(&organization) {
            state.projects.insert(
                project.clone(),
                ProjectRecord {
                    id: project,
                    name: name.to_string(),
                    score: None,
                    scored_on: None,
                },
            );
        }
    }

    pub(crate) fn record_ratings(&self, organization: &str, project: &str, rows: &[(&str, f64)]) {
        let organization = OrganizationId(organization.to_string());
        let project = ProjectId(project.to_string());
        let mut guard = self.organizations.lock().expect("store mutex poisoned");
        if let Some(state) = guard.get_mut(&organization) {
            if let Some(version) = &state.active {
                let rows = rows
                    .iter()
                    .map(|(key, value)| StoredCriterionScore {
                        criterion_key: key.to_string(),
                        value: *value,
                    })
                    .collect();
                state.ratings.insert((project, version.id.clone()), rows);
            }
        }
    }
}

impl PortfolioRepository for InMemoryPortfolioRepository {
    fn organizations(&self) -> Result<Vec<OrganizationId>, RepositoryError> {
        let guard = self.organizations.lock().expect("store mutex poisoned");
        Ok(guard.keys().cloned().collect())
    }

    fn active_criteria(
        &self,
        organization: &OrganizationId,
    ) -> Result<Option<CriteriaVersion>, RepositoryError> {
        let guard = self.organizations.lock().expect("store mutex poisoned");
        Ok(guard
            .get(organization)
            .and_then(|state| state.active.clone()))
    }

    fn projects(&self, organization: &OrganizationId) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let guard = self.organizations.lock().expect("store mutex poisoned");
        Ok(guard
            .get(organization)
            .map(|state| state.projects.values().cloned().collect())
            .unwrap_or_default())
    }

    fn project(
        &self,
        organization: &OrganizationId,
        project: &ProjectId,
    ) -> Result<Option<ProjectRecord>, RepositoryError> {
        let guard = self.organizations.lock().expect("store mutex poisoned");
        Ok(guard
            .get(organization)
            .and_then(|state| state.projects.get(project).cloned()))
    }

    fn criterion_scores(
        &self,
        project: &ProjectId,
        version: &CriteriaVersionId,
    ) -> Result<Vec<StoredCriterionScore>, RepositoryError> {
        let guard = self.organizations.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .find_map(|state| state.ratings.get(&(project.clone(), version.clone())))
            .cloned()
            .unwrap_or_default())
    }

    fn write_score(&self, project: &ProjectId, score: f64) -> Result<(), RepositoryError> {
        let mut guard = self.organizations.lock().expect("store mutex poisoned");
        let record = guard
            .values_mut()
            .find_map(|state| state.projects.get_mut(project))
            .ok_or(RepositoryError::NotFound)?;
        record.score = Some(score);
        record.scored_on = Some(Local::now().date_naive());
        Ok(())
    }
}

/// Seed the reference portfolio: one organization mid-cycle on the 0..10
/// dashboard scale, one on a committee 1..5 scale, and one that has not
/// published a criteria version yet (exercises the audit/skip paths).
pub(crate) fn seed_demo_portfolio(repository: &InMemoryPortfolioRepository) {
    repository.upsert_organization(
        "acme-media",
        Some(CriteriaVersion {
            id: CriteriaVersionId("v1".to_string()),
            label: "FY26 annual planning".to_string(),
            criteria: vec![
                CriterionSpec {
                    weight: 2.0,
                    ..CriterionSpec::new("revenue_impact")
                },
                CriterionSpec {
                    weight: 1.5,
                    ..CriterionSpec::new("strategic_fit")
                },
                CriterionSpec {
                    is_inverse: true,
                    ..CriterionSpec::new("delivery_risk")
                },
                CriterionSpec {
                    weight: 0.5,
                    is_inverse: true,
                    ..CriterionSpec::new("implementation_cost")
                },
            ],
        }),
    );
    repository.add_project("acme-media", "P-1001", "Checkout Revamp");
    repository.record_ratings(
        "acme-media",
        "P-1001",
        &[
            ("revenue_impact", 8.0),
            ("strategic_fit", 7.0),
            ("delivery_risk", 2.0),
            ("implementation_cost", 4.0),
        ],
    );
    repository.add_project("acme-media", "P-1002", "Data Platform Migration");
    repository.record_ratings(
        "acme-media",
        "P-1002",
        &[
            ("revenue_impact", 6.0),
            ("strategic_fit", 9.0),
            ("delivery_risk", 5.0),
            ("implementation_cost", 7.0),
        ],
    );
    // No self-assessment submitted yet; the recompute driver must skip it.
    repository.add_project("acme-media", "P-1003", "Brand Refresh");

    repository.upsert_organization(
        "helio-health",
        Some(CriteriaVersion {
            id: CriteriaVersionId("v4".to_string()),
            label: "Committee review cycle".to_string(),
            criteria: vec![
                CriterionSpec {
                    weight: 2.0,
                    scale_min: 1.0,
                    scale_max: 5.0,
                    ..CriterionSpec::new("clinical_value")
                },
                CriterionSpec {
                    is_inverse: true,
                    scale_min: 1.0,
                    scale_max: 5.0,
                    ..CriterionSpec::new("regulatory_risk")
                },
            ],
        }),
    );
    repository.add_project("helio-health", "P-2001", "Telemetry Rollout");
    repository.record_ratings(
        "helio-health",
        "P-2001",
        &[("clinical_value", 4.0), ("regulatory_risk", 2.0)],
    );

    repository.upsert_organization("north-labs", None);
}
