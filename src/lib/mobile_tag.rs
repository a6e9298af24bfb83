//! Decoding of the mobile-element annotation tag (`ME:Z`).
//!
//! The annotation is a `;`-separated list of fields. The first field holds the
//! mobile-element category names in priority order (best hit first), separated by commas.
//! The optional second field holds the matching element (family) names in the same order.
//!
//! ```text
//! ME:Z:ALU,L1;AluYa5,L1HS
//! ```

use crate::errors::{MeClusterError, Result};
use crate::record::AlignmentRecord;

/// Separator between annotation fields.
const FIELD_SEPARATOR: char = ';';

/// Separator between names within a field.
const NAME_SEPARATOR: char = ',';

/// Decoded mobile-element annotation of a single read.
///
/// A successfully decoded tag always holds at least one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileTag {
    categories: Vec<String>,
    elements: Vec<String>,
}

impl MobileTag {
    /// Decodes an annotation value.
    ///
    /// # Arguments
    /// * `read_name` - Name of the read the value belongs to, used in error messages
    /// * `value` - The raw annotation string
    ///
    /// # Errors
    /// Returns [`MeClusterError::CategoryDecode`] if the value holds no category name.
    pub fn parse(read_name: &str, value: &str) -> Result<Self> {
        let mut fields = value.split(FIELD_SEPARATOR);

        let categories = fields.next().map(split_names).unwrap_or_default();
        if categories.is_empty() {
            return Err(MeClusterError::category_decode(
                read_name,
                format!("annotation '{value}' lists no mobile element category"),
            ));
        }

        let elements = fields.next().map(split_names).unwrap_or_default();

        Ok(Self { categories, elements })
    }

    /// Decodes the annotation carried by a record.
    ///
    /// # Errors
    /// Returns [`MeClusterError::CategoryDecode`] if the record has no annotation or it
    /// cannot be decoded.
    pub fn from_record(record: &AlignmentRecord) -> Result<Self> {
        match record.mobile_tag.as_deref() {
            Some(value) => Self::parse(&record.name, value),
            None => Err(MeClusterError::category_decode(
                &record.name,
                "mobile element annotation tag is missing",
            )),
        }
    }

    /// The mobile-element category names in priority order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The mobile-element (family) names, when the annotation lists them.
    #[must_use]
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// The best-ranked category, the one clustering decisions are based on.
    #[must_use]
    pub fn first_category(&self) -> &str {
        &self.categories[0]
    }

    /// Consumes the tag and returns the best-ranked category.
    #[must_use]
    pub fn into_first_category(self) -> String {
        self.categories.into_iter().next().unwrap_or_default()
    }
}

fn split_names(field: &str) -> Vec<String> {
    field
        .split(NAME_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
