//! Custom error types for mecluster operations.

use thiserror::Error;

/// Result type alias for mecluster operations
pub type Result<T> = std::result::Result<T, MeClusterError>;

/// Error type for mecluster operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeClusterError {
    /// The mobile-element annotation tag of a read is missing or could not be decoded
    #[error("Could not decode mobile element categories for read '{read_name}': {reason}")]
    CategoryDecode {
        /// Name of the offending read
        read_name: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A cluster without members was finalized
    #[error("Cannot finalize a cluster without members")]
    EmptyCluster,

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM", "TSV")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Required reference sequence not found
    #[error("Reference sequence '{ref_name}' not found in header")]
    ReferenceNotFound {
        /// The reference sequence name
        ref_name: String,
    },
}

impl MeClusterError {
    /// Convenience constructor for [`MeClusterError::CategoryDecode`].
    pub fn category_decode(read_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CategoryDecode { read_name: read_name.into(), reason: reason.into() }
    }
}
