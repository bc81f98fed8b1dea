//! Category type definitions.

use serde::Serialize;

/// A named, prioritized CHANGELOG grouping such as "Features" or "Bug Fixes".
///
/// Categories are immutable and live in a fixed catalogue; see
/// [`all_categories`](super::all_categories).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    /// Display heading used in CHANGELOG output.
    pub heading: &'static str,
    /// Sort priority; lower values appear first in a version block.
    pub priority: u8,
    /// Conventional commit types that map onto this category.
    pub keywords: &'static [&'static str],
    /// Brief description for documentation.
    pub description: &'static str,
}

impl Category {
    /// Returns `true` when `keyword` is one of this category's commit types.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(&keyword)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.heading)
    }
}
