//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/search", get(handlers::search))
        .route("/auth", get(handlers::auth_page))
        // Actions
        .route("/history/clear", post(handlers::clear_history))
        .route("/preferences/language", post(handlers::set_language))
        .route("/preferences/theme", post(handlers::toggle_theme))
        .route("/preferences/incognito", post(handlers::toggle_incognito))
        .route("/auth/sign-in", post(handlers::sign_in))
        .route("/auth/sign-out", post(handlers::sign_out))
        // API routes
        .route("/api/search", get(handlers::api_search))
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}
