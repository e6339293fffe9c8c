//! Informational pages, embedded at compile time

use axum::http::header;
use axum::response::{Html, IntoResponse};

const INDEX: &str = include_str!("../../templates/index.html");
const ANALYSIS: &str = include_str!("../../templates/analysis.html");
const PERFORMANCE: &str = include_str!("../../templates/performance.html");
const BUSINESS: &str = include_str!("../../templates/business.html");
const METHODOLOGY: &str = include_str!("../../templates/methodology.html");
const ABOUT: &str = include_str!("../../templates/about.html");

const SCRIPT_JS: &str = include_str!("../../static/js/script.js");
const STYLE_CSS: &str = include_str!("../../static/css/style.css");

/// Interactive demo
pub async fn home() -> Html<&'static str> {
    Html(INDEX)
}

/// Data insights and patterns
pub async fn analysis() -> Html<&'static str> {
    Html(ANALYSIS)
}

/// Model metrics and comparisons
pub async fn performance() -> Html<&'static str> {
    Html(PERFORMANCE)
}

/// Financial impact
pub async fn business() -> Html<&'static str> {
    Html(BUSINESS)
}

pub async fn methodology() -> Html<&'static str> {
    Html(METHODOLOGY)
}

pub async fn about() -> Html<&'static str> {
    Html(ABOUT)
}

pub async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], SCRIPT_JS)
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], STYLE_CSS)
}
