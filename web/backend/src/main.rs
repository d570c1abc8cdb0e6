use artistgraph_web::config::AppConfig;
use artistgraph_web::create_router;
use artistgraph_web::state::AppState;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize app state: {e}");
            std::process::exit(1);
        }
    };

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind server address");

    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.expect("server error");
}
