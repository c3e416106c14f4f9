//! Handler for the static project catalog.

use axum::Json;
use kevs_core::catalog::{Project, PROJECTS, PROJECT_TASKS};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub projects: &'static [Project],
    pub project_tasks: &'static [&'static [&'static str]],
}

/// GET /api/projects
pub async fn list_projects() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        projects: PROJECTS,
        project_tasks: PROJECT_TASKS,
    })
}
