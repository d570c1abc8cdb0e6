pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod retry;
pub mod spotify;
pub mod state;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/graphs", post(handlers::build_graph))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/:id/graph", post(handlers::build_category_graph))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/artists/search", get(handlers::search_artists))
        .route("/api/artists/:name", get(handlers::get_artist))
        .route("/api/artists/:name/connections", get(handlers::get_connections))
        .route(
            "/api/artists/:name/extended-connections",
            get(handlers::get_extended_connections),
        )
        .route("/api/artists/:name/influence", get(handlers::get_influence))
        .route(
            "/api/artists/:name/shared-playlists",
            get(handlers::get_shared_playlists),
        )
        .route("/api/path", get(handlers::find_path))
        .route("/api/recommend/popular", get(handlers::recommend_popular))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
