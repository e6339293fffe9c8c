//! HTTP surface: prediction API, health check and static pages

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
