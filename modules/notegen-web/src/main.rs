//! Notegen Web Service: a local page over the note pipeline.
//!
//! Serves a form for generating one note or uploading a subjects CSV, plus
//! JSON RPC endpoints behind it. Settings submitted with a request are saved
//! to the notegen config file.
//!
//! Default: http://127.0.0.1:8789/

mod page;
mod routes;

use notegen_backend::config;
use routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let port: u16 = std::env::var("NOTEGEN_WEB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8789);

    let config_path = config::config_path();
    log::info!("Using config file {}", config_path.display());

    let state = Arc::new(AppState::new(config_path));
    let cors = tower_http::cors::CorsLayer::permissive();
    let app = routes::router(state).layer(cors);

    let addr = format!("127.0.0.1:{}", port);
    log::info!("Notegen Web Service listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
