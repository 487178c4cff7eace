use std::net::SocketAddr;

use solar_sizing::config::Config;
use solar_sizing::shared_state::AppState;
use solar_sizing::{build_app, open_store};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config_path = Config::resolve_path();
    let config = match Config::load_or_default(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {}: {}", config_path.display(), e);
            return;
        }
    };

    // 2. Logging: RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(path = %config_path.display(), "configuration loaded");

    // 3. Open the project store
    let store = open_store(&config.storage);
    let state = AppState::new(store);

    // 4. Start HTTP server
    let addr: SocketAddr = match config.bind_addr().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %config.bind_addr(), error = %e, "invalid listen address");
            return;
        }
    };
    let app = build_app(state, &config.static_dir);

    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        error!(error = %e, "server stopped");
    }
}
