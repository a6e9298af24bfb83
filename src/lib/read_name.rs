//! Mapping-category classification of anchor read names.
//!
//! Anchor reads are renamed upstream with a two-letter prefix describing how the read and
//! its mate mapped: `UU` (unique/unique), `UM` (unique/multiple) or `UX`
//! (unique/unmapped). All knowledge of that convention lives in this module.

/// Length of the mapping-category prefix on anchor read names.
pub const MAPPING_PREFIX_LENGTH: usize = 2;

/// How an anchor read's mate mapped, as encoded in the read-name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingCategory {
    /// Anchor maps uniquely and the mate maps to multiple locations (`UM`).
    UniqueMultiple,
    /// Anchor and mate both map uniquely (`UU`).
    UniqueUnique,
    /// Anchor maps uniquely and the mate is unmapped (`UX`).
    UniqueUnmapped,
    /// The read name carries none of the known prefixes.
    Unclassified,
}

impl MappingCategory {
    /// Classifies a read by its name prefix.
    ///
    /// # Examples
    /// ```
    /// use mecluster_lib::read_name::MappingCategory;
    ///
    /// assert_eq!(MappingCategory::classify("UMHWI-ST:1:1101"), MappingCategory::UniqueMultiple);
    /// assert_eq!(MappingCategory::classify("HWI-ST:1:1101"), MappingCategory::Unclassified);
    /// ```
    #[must_use]
    pub fn classify(read_name: &str) -> Self {
        [Self::UniqueMultiple, Self::UniqueUnique, Self::UniqueUnmapped]
            .into_iter()
            .find(|category| read_name.starts_with(category.prefix()))
            .unwrap_or(Self::Unclassified)
    }

    /// The read-name prefix for this category (empty for [`MappingCategory::Unclassified`]).
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::UniqueMultiple => "UM",
            Self::UniqueUnique => "UU",
            Self::UniqueUnmapped => "UX",
            Self::Unclassified => "",
        }
    }
}

/// Removes the first `prefix_length` characters of a read name.
///
/// Names shorter than the prefix are returned empty.
#[must_use]
pub fn strip_prefix(read_name: &str, prefix_length: usize) -> &str {
    read_name.char_indices().nth(prefix_length).map_or("", |(idx, _)| &read_name[idx..])
}
