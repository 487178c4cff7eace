use utoipa::OpenApi;
use crate::controllers::project_controller;
use crate::models::project;

#[derive(OpenApi)]
#[openapi(
    paths(
        project_controller::list_projects,
        project_controller::get_project,
        project_controller::create_project,
        project_controller::preview_estimate,
        project_controller::update_project,
        project_controller::delete_project,
        project_controller::get_monthly_production,
        project_controller::export_report,
        project_controller::export_sheet,
        project_controller::get_dashboard,
        project_controller::health
    ),
    components(
        schemas(
            project::CalculationMode,
            project::ProjectInputs,
            project::ProjectInputsPatch,
            project::ProjectResult,
            project::Project,
            project::MonthlyProduction,
            project::ChartPoint,
            project::DashboardSummary,
            project::HealthStatus,
            project::StoreLoad
        )
    ),
    tags(
        (name = "solar-sizing", description = "Solar Project Sizing API")
    )
)]
pub struct ApiDoc;
