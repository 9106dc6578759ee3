use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::scoring::ScoreOptions;

use super::domain::{OrganizationId, ProjectId};
use super::repository::{PortfolioRepository, RepositoryError};
use super::service::{PortfolioService, PortfolioServiceError};

/// Request payload for the live preview endpoint: the flat form state plus
/// optional output shaping overrides.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub options: Option<ScoreOptions>,
}

/// Router builder exposing the scoring endpoints.
pub fn portfolio_router<R>(service: Arc<PortfolioService<R>>) -> Router
where
    R: PortfolioRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/organizations/:organization_id/scores/preview",
            post(preview_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:organization_id/projects/:project_id/rescore",
            post(rescore_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:organization_id/projects/:project_id",
            get(project_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(organization_id): Path<String>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    let organization = OrganizationId(organization_id);
    match service.preview(&organization, &request.scores, request.options) {
        Ok(preview) => (StatusCode::OK, axum::Json(preview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rescore_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path((organization_id, project_id)): Path<(String, String)>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    let organization = OrganizationId(organization_id);
    let project = ProjectId(project_id);
    match service.rescore(&organization, &project) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn project_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path((organization_id, project_id)): Path<(String, String)>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    let organization = OrganizationId(organization_id);
    let project = ProjectId(project_id);
    match service.project_view(&organization, &project) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

/// A broken criteria configuration surfaces as 422 so the UI can flag the
/// score as unavailable instead of rendering a misleading 0 or NaN.
fn error_response(error: PortfolioServiceError) -> Response {
    let status = match &error {
        PortfolioServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PortfolioServiceError::NoActiveCriteria | PortfolioServiceError::NoScores => {
            StatusCode::CONFLICT
        }
        PortfolioServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PortfolioServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
