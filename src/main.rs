//! Fraud Detection API - Main Entry Point
//!
//! Loads the classifier once, then serves predictions and pages over HTTP.

use anyhow::{Context, Result};
use fraud_detection_api::{
    config::{AppConfig, LoggingConfig},
    metrics::MetricsReporter,
    models::loader,
    server::{create_router, AppState},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Fraud Detection API");
    info!(
        "Detection threshold: {:.2}, Risk levels: medium>={:.2}, high>={:.2}",
        config.detection.threshold,
        config.detection.risk_levels.medium,
        config.detection.risk_levels.high
    );

    let artifacts = loader::load_artifacts(&config.models);
    match &artifacts.classifier {
        Some(classifier) => info!(model_type = classifier.model_type(), "Classifier ready"),
        None => warn!("Model not loaded; /predict will fail until the service is restarted with a valid model"),
    }

    let state = AppState::new(artifacts, &config);
    let metrics = state.metrics.clone();

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let app = create_router(state);
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Fraud Detection API shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "fraud_detection_api={level},tower_http={level}",
            level = logging.level
        ))
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
