use axum::{routing::{get, post}, Router};
use crate::controllers::project_controller::{
    // Projects
    list_projects, create_project, get_project, update_project, delete_project,
    // Estimation & reports
    preview_estimate, get_monthly_production, export_report, export_sheet,
    // Overview
    get_dashboard, health,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/projects",               get(list_projects).post(create_project))
        .route("/projects/{id}",          get(get_project).patch(update_project).delete(delete_project))
        .route("/projects/{id}/monthly",  get(get_monthly_production))
        .route("/projects/{id}/report",   get(export_report))
        .route("/projects/{id}/sheet",    get(export_sheet))
        .route("/estimate",               post(preview_estimate))
        .route("/dashboard",              get(get_dashboard))
        .route("/health",                 get(health))
        .with_state(state)
}
