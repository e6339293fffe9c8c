//! API routes

use crate::server::handlers;
use crate::server::pages;
use crate::server::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(pages::home))
        .route("/analysis", get(pages::analysis))
        .route("/performance", get(pages::performance))
        .route("/business", get(pages::business))
        .route("/methodology", get(pages::methodology))
        .route("/about", get(pages::about))
        .route("/static/js/script.js", get(pages::script))
        .route("/static/css/style.css", get(pages::stylesheet))
        // API
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
