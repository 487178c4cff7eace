pub mod project_routes;
