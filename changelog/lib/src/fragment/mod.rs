//! Section-aware changeset fragment parser.
//!
//! A fragment is the free-form summary of one changeset. When it contains
//! level-2 headings, each heading names a category and the content up to the
//! next level-2 heading belongs to it:
//!
//! ```markdown
//! Short intro.
//!
//! ## Features
//!
//! - Added login
//!
//! ## Bug Fixes
//!
//! - Fixed crash
//! ```
//!
//! Without level-2 headings the fragment is flat text and the whole summary
//! becomes the preamble.
//!
//! ## Examples
//!
//! ```
//! use changelog_lib::fragment::parse_fragment;
//!
//! let parsed = parse_fragment("Intro\n\n## Features\n\n- Added login\n").unwrap();
//! assert_eq!(parsed.preamble.as_deref(), Some("Intro"));
//! assert_eq!(parsed.sections[0].category.heading, "Features");
//! assert_eq!(parsed.sections[0].content, "- Added login");
//! ```

pub mod compose;

use lazy_static::lazy_static;
use markdown::mdast::{Node, Root};
use regex::Regex;
use tracing::debug;

use crate::blocks::version_blocks;
use crate::categories::{self, Category};
use crate::error::ChangelogResult;
use crate::markdown::{as_heading, heading_text, parse, print};

lazy_static! {
    static ref FRONTMATTER: Regex = Regex::new(r"(?s)\A---\n.*?\n---\n?").unwrap();
}

/// One categorized section of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSection {
    pub category: &'static Category,
    /// Heading text as written.
    pub heading: String,
    /// Markdown under the heading, trimmed. Empty when there is none.
    pub content: String,
}

/// A fragment split into its preamble and categorized sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFragment {
    pub preamble: Option<String>,
    pub sections: Vec<FragmentSection>,
}

impl ParsedFragment {
    /// `true` when no categorized section was found.
    pub fn is_flat(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Splits a fragment summary into preamble and sections.
///
/// Level-2 headings that name no known category are skipped along with their
/// content.
///
/// ## Errors
///
/// Returns `ChangelogError::Parse` if the summary cannot be parsed.
pub fn parse_fragment(summary: &str) -> ChangelogResult<ParsedFragment> {
    let root = parse(summary)?;
    let blocks = version_blocks(&root.children);

    let Some(first) = blocks.first() else {
        return Ok(ParsedFragment {
            preamble: non_empty(summary.trim().to_string()),
            sections: Vec::new(),
        });
    };

    let preamble = non_empty(print_nodes(&root.children[..first.heading_index])?);

    let mut sections = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let heading = as_heading(&root.children[block.heading_index], 2)
            .map(heading_text)
            .unwrap_or_default();

        match categories::by_heading(&heading) {
            Some(category) => sections.push(FragmentSection {
                category,
                heading,
                content: print_nodes(&root.children[block.body()])?,
            }),
            None => debug!(heading, "Skipping fragment section with unknown heading"),
        }
    }

    Ok(ParsedFragment { preamble, sections })
}

/// Removes a leading `---` delimited frontmatter block.
///
/// Content without frontmatter is returned unchanged.
pub fn strip_frontmatter(content: &str) -> &str {
    match FRONTMATTER.find(content) {
        Some(found) => &content[found.end()..],
        None => content,
    }
}

fn print_nodes(nodes: &[Node]) -> ChangelogResult<String> {
    if nodes.is_empty() {
        return Ok(String::new());
    }
    let root = Root {
        children: nodes.to_vec(),
        position: None,
    };
    Ok(print(&root)?.trim().to_string())
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{BUG_FIXES, FEATURES};

    #[test]
    fn test_flat_fragment() {
        let parsed = parse_fragment("  Fixed a crash on startup\n").unwrap();
        assert!(parsed.is_flat());
        assert_eq!(parsed.preamble.as_deref(), Some("Fixed a crash on startup"));
    }

    #[test]
    fn test_flat_fragment_keeps_original_text() {
        let parsed = parse_fragment("* star bullet\n\n### Not h2\n").unwrap();
        assert_eq!(
            parsed.preamble.as_deref(),
            Some("* star bullet\n\n### Not h2")
        );
    }

    #[test]
    fn test_empty_fragment() {
        let parsed = parse_fragment("").unwrap();
        assert_eq!(parsed, ParsedFragment::default());
    }

    #[test]
    fn test_sections_mapped_to_categories() {
        let parsed = parse_fragment(
            "## features\n\n- Added login\n- Added logout\n\n## Bug Fixes\n\n* Fixed crash\n",
        )
        .unwrap();

        assert_eq!(parsed.preamble, None);
        assert_eq!(parsed.sections.len(), 2);
        assert_eq!(parsed.sections[0].category, &FEATURES);
        assert_eq!(parsed.sections[0].heading, "features");
        assert_eq!(parsed.sections[0].content, "- Added login\n- Added logout");
        assert_eq!(parsed.sections[1].category, &BUG_FIXES);
        assert_eq!(parsed.sections[1].content, "- Fixed crash");
    }

    #[test]
    fn test_unknown_headings_skipped() {
        let parsed = parse_fragment("## Highlights\n\nShiny\n\n## Features\n\nNew thing\n").unwrap();
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].content, "New thing");
    }

    #[test]
    fn test_section_without_content() {
        let parsed = parse_fragment("## Features\n").unwrap();
        assert_eq!(parsed.sections[0].content, "");
    }

    #[test]
    fn test_nested_headings_stay_in_content() {
        let parsed = parse_fragment("## Features\n\n### Detail\n\nText\n").unwrap();
        assert_eq!(parsed.sections[0].content, "### Detail\n\nText");
    }

    #[test]
    fn test_strip_frontmatter() {
        let content = "---\n\"pkg\": minor\n---\n\n## Features\n";
        assert_eq!(strip_frontmatter(content), "\n## Features\n");
        assert_eq!(strip_frontmatter("No frontmatter\n"), "No frontmatter\n");
        assert_eq!(strip_frontmatter("text\n---\na\n---\n"), "text\n---\na\n---\n");
    }
}
