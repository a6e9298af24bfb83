//! Metrics collection and reporting.
//!
//! - [`clustering`] - counts gathered while clustering anchors
//! - [`writer`] - metrics file I/O
//!
//! # Traits
//!
//! - [`Metric`] - serializable metric rows
//! - [`ProcessingMetrics`] - input/output/filtered summary shared by metric types

pub mod clustering;
pub mod writer;

use serde::{Deserialize, Serialize, Serializer};

pub use clustering::ClusteringMetrics;
pub use writer::write_metrics;

/// Number of decimal places used for float metrics.
pub const FLOAT_PRECISION: usize = 6;

/// Formats a float with [`FLOAT_PRECISION`] decimal places.
///
/// # Example
/// ```
/// use mecluster_lib::metrics::format_float;
/// assert_eq!(format_float(2.5), "2.500000");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    format!("{value:.FLOAT_PRECISION$}")
}

/// Serializes a float with [`FLOAT_PRECISION`] decimal places, for `#[serde(serialize_with)]`.
///
/// # Errors
/// Returns the serializer's error if the string cannot be written.
pub fn serialize_float<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_float(*value))
}

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in messages.
    fn metric_name() -> &'static str;
}

/// Common interface for metrics that track processing counts.
pub trait ProcessingMetrics {
    /// Total number of items read.
    fn total_input(&self) -> u64;

    /// Total number of items that made it into the output.
    fn total_output(&self) -> u64;

    /// Total number of items filtered out or rejected.
    fn total_filtered(&self) -> u64;

    /// Output as a percentage of input.
    fn efficiency(&self) -> f64 {
        if self.total_input() == 0 {
            0.0
        } else {
            #[expect(clippy::cast_precision_loss, reason = "read counts never exceed 2^53")]
            let result = self.total_output() as f64 / self.total_input() as f64 * 100.0;
            result
        }
    }
}
