//! Configuration shared by every cluster of a run.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::record::NO_REFERENCE;
use crate::sample::SampleMode;

/// Prefix added to reference names by [`ChromosomePrefix::Auto`].
pub const DEFAULT_CHROMOSOME_PREFIX: &str = "chr";

/// How reference names are normalized on consensus output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChromosomePrefix {
    /// Add [`DEFAULT_CHROMOSOME_PREFIX`] unless the name already carries it.
    #[default]
    Auto,
    /// Add the given prefix unless the name already carries it.
    Custom(String),
    /// Leave reference names untouched.
    Keep,
}

impl ChromosomePrefix {
    /// Normalizes a reference name. The unmapped placeholder `*` is never prefixed.
    ///
    /// # Examples
    /// ```
    /// use mecluster_lib::cluster::ChromosomePrefix;
    ///
    /// assert_eq!(ChromosomePrefix::Auto.normalize("1"), "chr1");
    /// assert_eq!(ChromosomePrefix::Auto.normalize("chrX"), "chrX");
    /// assert_eq!(ChromosomePrefix::Keep.normalize("1"), "1");
    /// ```
    #[must_use]
    pub fn normalize<'a>(&self, reference_name: &'a str) -> Cow<'a, str> {
        let prefix = match self {
            Self::Auto => DEFAULT_CHROMOSOME_PREFIX,
            Self::Custom(prefix) => prefix.as_str(),
            Self::Keep => return Cow::Borrowed(reference_name),
        };

        if reference_name == NO_REFERENCE || reference_name.starts_with(prefix) {
            Cow::Borrowed(reference_name)
        } else {
            Cow::Owned(format!("{prefix}{reference_name}"))
        }
    }
}

impl FromStr for ChromosomePrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err("chromosome prefix must not be empty (use 'keep' to disable)".to_string()),
            "auto" => Ok(Self::Auto),
            "keep" => Ok(Self::Keep),
            prefix => Ok(Self::Custom(prefix.to_string())),
        }
    }
}

impl fmt::Display for ChromosomePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Custom(prefix) => write!(f, "{prefix}"),
            Self::Keep => write!(f, "keep"),
        }
    }
}

/// Settings fixed for the lifetime of a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Accept members regardless of strand.
    pub split_read: bool,
    /// Members arrive in position order, so the first member holds the cluster start.
    pub assume_sorted: bool,
    /// How the sample of each member is resolved.
    pub sample_mode: SampleMode,
    /// Reference-name normalization applied to the consensus record.
    pub chromosome_prefix: ChromosomePrefix,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            split_read: false,
            assume_sorted: true,
            sample_mode: SampleMode::default(),
            chromosome_prefix: ChromosomePrefix::default(),
        }
    }
}
