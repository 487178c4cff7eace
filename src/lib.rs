pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;

use std::path::Path;

use axum::{response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::StorageConfig;
use crate::routes::project_routes::api_routes;
use crate::services::project_store::ProjectStore;
use crate::services::storage::FileSlot;
use crate::shared_state::AppState;

/// Project store backed by `<data_dir>/<key>.json`.
pub fn open_store(storage: &StorageConfig) -> ProjectStore {
    ProjectStore::init(Box::new(FileSlot::new(&storage.data_dir)), storage.key.clone())
}

/// Full application router: JSON API, API reference and static UI.
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
