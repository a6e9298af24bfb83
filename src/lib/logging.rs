//! Formatting helpers for log output and run summaries.

use std::time::{Duration, Instant};

use crate::metrics::{ClusteringMetrics, ProcessingMetrics};

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use mecluster_lib::logging::format_count;
///
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a fraction (0.0-1.0) as a percentage with `decimals` decimal places.
///
/// # Examples
///
/// ```
/// use mecluster_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}

/// Formats a duration as `45s`, `2m 15s` or `1h 30m`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, mins, secs) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (hours, mins, secs) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, 0, _) => format!("{h}h"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}

/// Formats a processing rate as records per second, or per minute when slower than one a second.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} records/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} records/s", format_count(rate as u64))
    } else {
        format!("{:.1} records/min", rate * 60.0)
    }
}

/// Logs a summary of a clustering run.
pub fn log_clustering_summary(metrics: &ClusteringMetrics) {
    log::info!("Clustering Summary:");
    log::info!("  Anchor records: {}", format_count(metrics.total_records));
    log::info!("  Clustered records: {}", format_count(metrics.clustered_records));

    if metrics.total_input() > 0 {
        log::info!("  Clustered fraction: {}", format_percent(metrics.efficiency() / 100.0, 2));
    }

    log::info!("  Clusters formed: {}", format_count(metrics.total_clusters));
    log::info!("  Clusters written: {}", format_count(metrics.emitted_clusters));

    if metrics.emitted_clusters > 0 {
        log::info!("  Mean reads/cluster: {:.1}", metrics.mean_reads_per_cluster);
        log::info!("  Max reads/cluster: {}", metrics.max_reads_per_cluster);
    }

    if metrics.unmapped_records > 0 {
        log::info!("Skipped {} unmapped records.", format_count(metrics.unmapped_records));
    }
    if metrics.invalid_mobile_tag_records > 0 {
        log::warn!(
            "Dropped {} records whose mobile element annotation could not be decoded.",
            format_count(metrics.invalid_mobile_tag_records)
        );
    }
    if metrics.filtered_clusters() > 0 {
        log::info!(
            "Filtered out {} clusters ({} below minimum reads, {} with too many mate chromosomes, {} below same-chromosome percentage).",
            format_count(metrics.filtered_clusters()),
            format_count(metrics.filtered_min_reads),
            format_count(metrics.filtered_mate_chromosomes),
            format_count(metrics.filtered_same_chromosome_pct)
        );
    }
}

/// Times an operation and logs its start and completion.
///
/// # Examples
///
/// ```no_run
/// use mecluster_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Clustering anchors");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a timer and logs the start of the operation.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs completion with the number of records handled and the rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} records in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
