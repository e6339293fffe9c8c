//! In-process prediction statistics with a periodic log summary.

use crate::types::prediction::{PredictionLabel, RiskLevel};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept for percentile estimates
const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Metrics collector for the prediction endpoint
pub struct PredictionMetrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Predictions labeled fraud
    pub frauds: AtomicU64,
    /// Requests rejected with a 4xx
    pub rejected: AtomicU64,
    /// Requests failed with a 5xx
    pub failed: AtomicU64,
    /// Low, Medium, High
    risk_levels: [AtomicU64; 3],
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Probability distribution buckets of width 0.1
    score_buckets: RwLock<[u64; 10]>,
    start_time: Instant,
}

impl PredictionMetrics {
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            frauds: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            risk_levels: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a completed prediction
    pub fn record_prediction(
        &self,
        processing_time: Duration,
        probability: f64,
        label: PredictionLabel,
        risk_level: RiskLevel,
    ) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        if label.is_fraud() {
            self.frauds.fetch_add(1, Ordering::Relaxed);
        }
        self.risk_levels[risk_index(risk_level)].fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            if times.len() > MAX_LATENCY_SAMPLES {
                times.drain(0..MAX_LATENCY_SAMPLES / 2);
            }
        }

        let bucket = (probability.clamp(0.0, 1.0) * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a request that did not produce a prediction
    pub fn record_error(&self, client_error: bool) {
        if client_error {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn risk_level_count(&self, level: RiskLevel) -> u64 {
        self.risk_levels[risk_index(level)].load(Ordering::Relaxed)
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return ProcessingStats::default(),
        };
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: percentile(0.50),
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Predictions per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn get_score_distribution(&self) -> [u64; 10] {
        self.score_buckets.read().map(|b| *b).unwrap_or([0; 10])
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let predictions = self.predictions.load(Ordering::Relaxed);
        let frauds = self.frauds.load(Ordering::Relaxed);
        let fraud_rate = if predictions > 0 {
            (frauds as f64 / predictions as f64) * 100.0
        } else {
            0.0
        };
        let processing = self.get_processing_stats();

        info!(
            predictions,
            frauds,
            fraud_rate = format!("{:.1}%", fraud_rate),
            rejected = self.rejected.load(Ordering::Relaxed),
            failed = self.failed.load(Ordering::Relaxed),
            throughput = format!("{:.2} req/s", self.get_throughput()),
            "Prediction summary"
        );
        info!(
            low = self.risk_level_count(RiskLevel::Low),
            medium = self.risk_level_count(RiskLevel::Medium),
            high = self.risk_level_count(RiskLevel::High),
            "Risk levels"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            max_us = processing.max_us,
            "Processing time"
        );

        let distribution = self.get_score_distribution();
        let total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "  {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn risk_index(level: RiskLevel) -> usize {
    match level {
        RiskLevel::Low => 0,
        RiskLevel::Medium => 1,
        RiskLevel::High => 2,
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodic summary printer
pub struct MetricsReporter {
    metrics: Arc<PredictionMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PredictionMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // First tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
