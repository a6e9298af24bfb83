//! Writing metrics files.

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::Serialize;
use std::path::Path;

use super::Metric;

/// Writes metric rows to a TSV file with a header line.
///
/// # Arguments
/// * `path` - Path to the output TSV file
/// * `metrics` - The rows to write
/// * `description` - What the metrics are, for error messages
///
/// # Errors
/// Returns an error if the file cannot be created or written to.
///
/// # Example
/// ```no_run
/// use mecluster_lib::metrics::ClusteringMetrics;
/// use mecluster_lib::metrics::writer::write_metrics;
/// use std::path::Path;
///
/// write_metrics(Path::new("clusters.metrics.txt"), &[ClusteringMetrics::default()], "clustering").unwrap();
/// ```
pub fn write_metrics<P: AsRef<Path>, T: Serialize>(
    path: P,
    metrics: &[T],
    description: &str,
) -> Result<()> {
    let path = path.as_ref();
    DelimFile::default()
        .write_tsv(&path, metrics)
        .with_context(|| format!("Failed to write {description} metrics: {}", path.display()))
}

/// Writes metric rows, naming them by [`Metric::metric_name`] in error messages.
///
/// # Errors
/// Returns an error if the file cannot be created or written to.
pub fn write_metrics_auto<P: AsRef<Path>, T: Metric>(path: P, metrics: &[T]) -> Result<()> {
    write_metrics(path, metrics, T::metric_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ClusteringMetrics;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_clustering_metrics() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let metrics = ClusteringMetrics {
            total_records: 12,
            emitted_clusters: 3,
            clustered_records: 9,
            mean_reads_per_cluster: 3.0,
            ..Default::default()
        };

        write_metrics_auto(temp_file.path(), &[metrics.clone()])?;

        let content = fs::read_to_string(temp_file.path())?;
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("total_records\tclustered_records\t"));
        assert!(header.contains("filtered_same_chromosome_pct"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("12\t9\t"));
        assert!(row.contains("\t3.000000\t"));

        let read_back: Vec<ClusteringMetrics> = DelimFile::default().read_tsv(&temp_file.path())?;
        assert_eq!(read_back, vec![metrics]);
        Ok(())
    }

    #[test]
    fn test_write_metrics_invalid_path() {
        let result = write_metrics("/invalid/path/metrics.txt", &[ClusteringMetrics::default()], "clustering");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to write clustering metrics"));
    }
}
