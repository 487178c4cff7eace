use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::models::project::{
    CalculationMode, DashboardSummary, HealthStatus, MonthlyProduction, Project, ProjectInputs,
    ProjectInputsPatch, ProjectListQuery, ProjectPatch, ProjectResult,
};
use crate::services::{dashboard, estimation, report_service};
use crate::shared_state::AppState;

fn find_project(state: &AppState, id: &str) -> Result<Project, ApiError> {
    state.read_store()?.get(id).cloned().ok_or(ApiError::NotFound)
}

fn attachment(content_type: &'static str, file_name: String, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        body,
    )
}

/// GET /api/projects
/// List stored projects
///
/// Most recent first. `mode` narrows the list to one sizing scenario.
#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Stored projects", body = Vec<Project>),
        (status = 400, description = "Unknown mode")
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProjectListQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let mode = query.mode.as_deref().map(str::parse::<CalculationMode>).transpose()?;
    let store = state.read_store()?;
    let projects = store
        .list()
        .iter()
        .filter(|p| mode.is_none_or(|mode| p.inputs.mode == mode))
        .cloned()
        .collect();
    Ok(Json(projects))
}

/// GET /api/projects/{id}
/// Get one project
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "The project", body = Project),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Project>, ApiError> {
    find_project(&state, &id).map(Json)
}

/// POST /api/projects
/// Estimate and store a new project
///
/// Inputs are validated, the result is computed server-side and both are persisted together.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = ProjectInputs,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Invalid inputs"),
        (status = 422, description = "Body is not a valid ProjectInputs document"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(inputs): ApiJson<ProjectInputs>,
) -> Result<impl IntoResponse, ApiError> {
    inputs.validate()?;
    let result = estimation::estimate(&inputs);
    let project = state.write_store()?.add(inputs, result)?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// POST /api/estimate
/// Preview the estimate for a set of inputs
///
/// Nothing is stored. Used for live feedback while the inputs are being edited.
#[utoipa::path(
    post,
    path = "/api/estimate",
    request_body = ProjectInputs,
    responses(
        (status = 200, description = "Estimated result", body = ProjectResult),
        (status = 400, description = "Invalid inputs")
    )
)]
pub async fn preview_estimate(ApiJson(inputs): ApiJson<ProjectInputs>) -> Result<Json<ProjectResult>, ApiError> {
    inputs.validate()?;
    Ok(Json(estimation::estimate(&inputs)))
}

/// PATCH /api/projects/{id}
/// Edit a project's inputs
///
/// Missing fields keep their stored value. The result is always recomputed.
#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    request_body = ProjectInputsPatch,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 400, description = "Invalid inputs"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    Path(id): Path<String>,
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<ProjectInputsPatch>,
) -> Result<Json<Project>, ApiError> {
    let mut store = state.write_store()?;
    let current = store.get(&id).ok_or(ApiError::NotFound)?;

    let inputs = patch.apply_to(&current.inputs);
    inputs.validate()?;
    let result = estimation::estimate(&inputs);
    store.update(&id, ProjectPatch { inputs: Some(inputs), result: Some(result) })?;

    store.get(&id).cloned().map(Json).ok_or(ApiError::NotFound)
}

/// DELETE /api/projects/{id}
/// Delete a project
///
/// Deleting an unknown id is not an error.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project no longer stored"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_project(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.write_store()?.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{id}/monthly
/// Monthly production profile
#[utoipa::path(
    get,
    path = "/api/projects/{id}/monthly",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Production per month, Jan..Dec", body = Vec<MonthlyProduction>),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_monthly_production(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthlyProduction>>, ApiError> {
    let project = find_project(&state, &id)?;
    Ok(Json(estimation::monthly_breakdown(project.result.production)))
}

/// GET /api/projects/{id}/report
/// Download the calculation note as text
#[utoipa::path(
    get,
    path = "/api/projects/{id}/report",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Plain-text report", body = String, content_type = "text/plain"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn export_report(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let project = find_project(&state, &id)?;
    let file_name = format!("{}.txt", report_service::file_stem(&project.inputs.name));
    Ok(attachment("text/plain; charset=utf-8", file_name, report_service::render_document(&project)))
}

/// GET /api/projects/{id}/sheet
/// Download the project as a key/value spreadsheet
#[utoipa::path(
    get,
    path = "/api/projects/{id}/sheet",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Two-column CSV", body = String, content_type = "text/csv"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn export_sheet(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let project = find_project(&state, &id)?;
    let file_name = format!("{}.csv", report_service::file_stem(&project.inputs.name));
    Ok(attachment("text/csv; charset=utf-8", file_name, report_service::render_sheet(&project)))
}

/// GET /api/dashboard
/// Portfolio totals
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Totals, chart rows and latest projects", body = DashboardSummary)
    )
)]
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let store = state.read_store()?;
    Ok(Json(dashboard::summarize(store.list())))
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    let store = state.read_store()?;
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        projects: store.len(),
        store_load: store.load_outcome(),
    }))
}
