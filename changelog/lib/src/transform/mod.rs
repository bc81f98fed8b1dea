//! Structural transform pipeline.
//!
//! Six passes rewrite a parsed CHANGELOG one version block at a time, always
//! in this order:
//!
//! 1. [`merge_sections`] folds duplicate section headings together
//! 2. [`reorder_sections`] sorts sections by category priority
//! 3. [`deduplicate_items`] drops repeated list items within a section
//! 4. [`contributor_footnotes`] moves attributions into one thanks paragraph
//! 5. [`issue_link_refs`] turns `[#N](url)` links into references
//! 6. [`normalize_format`] removes empty sections and lists
//!
//! No pass fails. Shapes a pass doesn't recognize are left as they are.
//!
//! ## Examples
//!
//! ```
//! use changelog_lib::transform::Pipeline;
//!
//! let raw = "## 1.0.0\n\n### Bug Fixes\n\n- B\n\n### Features\n\n- A\n\n### Features\n\n- A\n";
//! let output = Pipeline::default().transform(raw).unwrap();
//! assert_eq!(output, "## 1.0.0\n\n### Features\n\n- A\n\n### Bug Fixes\n\n- B\n");
//! ```

mod contributors;
mod dedup;
mod issue_refs;
mod merge;
mod normalize;
mod reorder;

pub use contributors::{Contributor, contributor_footnotes};
pub use dedup::deduplicate_items;
pub use issue_refs::{IssueReference, issue_link_refs};
pub use merge::merge_sections;
pub use normalize::normalize_format;
pub use reorder::reorder_sections;

use markdown::mdast::Root;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, trace};

use crate::error::ChangelogResult;
use crate::markdown::{parse, print};

/// One structural rewrite of the document.
///
/// Declaration order is execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Pass {
    MergeSections,
    ReorderSections,
    DeduplicateItems,
    ContributorFootnotes,
    IssueLinkRefs,
    NormalizeFormat,
}

impl Pass {
    /// Kebab-case name, as used in configuration.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Runs this pass over every version block of `root`.
    pub fn apply(self, root: &mut Root) {
        match self {
            Pass::MergeSections => merge_sections(root),
            Pass::ReorderSections => reorder_sections(root),
            Pass::DeduplicateItems => deduplicate_items(root),
            Pass::ContributorFootnotes => contributor_footnotes(root),
            Pass::IssueLinkRefs => issue_link_refs(root),
            Pass::NormalizeFormat => normalize_format(root),
        }
    }
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which passes to leave out of a run.
///
/// ```
/// use changelog_lib::transform::{Pass, TransformConfig};
///
/// let config = TransformConfig::from_json(r#"{ "skip": ["issue-link-refs"] }"#).unwrap();
/// assert_eq!(config.skip, vec![Pass::IssueLinkRefs]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub skip: Vec<Pass>,
}

impl TransformConfig {
    /// Parses a config from JSON.
    ///
    /// ## Errors
    ///
    /// Returns `ChangelogError::Config` on malformed JSON or an unknown pass
    /// name.
    pub fn from_json(json: &str) -> ChangelogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An ordered selection of passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    passes: Vec<Pass>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            passes: Pass::iter().collect(),
        }
    }
}

impl Pipeline {
    /// Every pass except those the config skips, in the fixed order.
    pub fn from_config(config: &TransformConfig) -> Self {
        Self {
            passes: Pass::iter()
                .filter(|pass| !config.skip.contains(pass))
                .collect(),
        }
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Applies the selected passes to `root` in place.
    pub fn run(&self, root: &mut Root) {
        for pass in Pass::iter() {
            if self.passes.contains(&pass) {
                debug!(pass = pass.name(), "Running transform pass");
                pass.apply(root);
            } else {
                trace!(pass = pass.name(), "Skipping transform pass");
            }
        }
    }

    /// Parses `content`, runs the passes, and prints the result.
    ///
    /// ## Errors
    ///
    /// Returns `ChangelogError::Parse` if the content cannot be parsed, or
    /// `ChangelogError::Print` if the result cannot be printed.
    #[tracing::instrument(skip_all, fields(bytes = content.len()))]
    pub fn transform(&self, content: &str) -> ChangelogResult<String> {
        let mut root = parse(content)?;
        self.run(&mut root);
        print(&root)
    }
}
