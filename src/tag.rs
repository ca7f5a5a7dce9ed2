//! Surface tags and tag-set utilities.
//!
//! A [`SurfaceTag`] names a semantic surface category ("terrain", "water",
//! "underwater", ...). Tags are opaque to the engine: it only ever compares
//! them for equality and intersects tag sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque identifier for a semantic surface category.
///
/// Cheap to clone (shared string). Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceTag(Arc<str>);

impl SurfaceTag {
    /// Create a tag from a category name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The category name this tag was created from.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// A tag is valid iff it names a category. Empty tags act as
    /// placeholders and never participate in filtering.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for SurfaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// True if the set contains at least one valid tag.
///
/// An empty or all-placeholder set means "no filtering requested", never an
/// error.
pub fn has_valid_tags(tags: &[SurfaceTag]) -> bool {
    tags.iter().any(SurfaceTag::is_valid)
}

/// True if any tag in `tags` also appears in `desired`.
pub fn has_matching_tags<'a>(
    desired: &[SurfaceTag],
    tags: impl IntoIterator<Item = &'a SurfaceTag>,
) -> bool {
    tags.into_iter().any(|tag| desired.contains(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tag_is_invalid() {
        assert!(!SurfaceTag::new("").is_valid());
        assert!(SurfaceTag::new("terrain").is_valid());
    }

    #[test]
    fn test_has_valid_tags() {
        assert!(!has_valid_tags(&[]));
        assert!(!has_valid_tags(&[SurfaceTag::new("")]));
        assert!(has_valid_tags(&[SurfaceTag::new(""), SurfaceTag::new("water")]));
    }

    #[test]
    fn test_has_matching_tags() {
        let desired = vec![SurfaceTag::new("terrain"), SurfaceTag::new("water")];
        let tags = vec![SurfaceTag::new("water")];
        let other = vec![SurfaceTag::new("lava")];

        assert!(has_matching_tags(&desired, &tags));
        assert!(!has_matching_tags(&desired, &other));
        assert!(!has_matching_tags(&desired, &[]));
    }
}
