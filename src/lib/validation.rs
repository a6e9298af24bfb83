//! Validation of command-line parameters and input paths.

use crate::errors::{MeClusterError, Result};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Errors
/// Returns [`MeClusterError::InvalidFileFormat`] if the path does not exist.
///
/// # Example
/// ```
/// use mecluster_lib::validation::validate_file_exists;
///
/// assert!(validate_file_exists("/nonexistent/anchors.bam", "Input BAM").is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MeClusterError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that a value is greater than zero
///
/// # Errors
/// Returns [`MeClusterError::InvalidParameter`] if `value` is zero or negative.
pub fn validate_positive<T: PartialOrd + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(MeClusterError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be greater than 0, got {value}"),
        });
    }
    Ok(())
}

/// Validate that a percentage lies in `[0, 100]`
///
/// # Errors
/// Returns [`MeClusterError::InvalidParameter`] if the value is outside the range or NaN.
pub fn validate_percentage(value: f64, name: &str) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(MeClusterError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be between 0 and 100, got {value}"),
        });
    }
    Ok(())
}
