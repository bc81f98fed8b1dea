//! Document block segmentation.
//!
//! A CHANGELOG is a flat run of top-level nodes. Structure comes from the
//! headings between them:
//!
//! - a **version block** is the run of nodes after a level-2 heading up to the
//!   next level-2 heading or the end of the document
//! - a **named section** is a level-3 heading inside a block plus the nodes up
//!   to the next level-3 heading, level-2 heading, or the end of the block
//! - nodes in a block before its first level-3 heading are the **preamble**
//!
//! Level-1 headings never start blocks, so anything before the first level-2
//! heading belongs to no block and is never rewritten.
//!
//! ## Examples
//!
//! ```
//! use changelog_lib::blocks::{sections_of, version_blocks};
//! use changelog_lib::markdown::parse;
//!
//! let root = parse("# Changelog\n\n## 1.0.0\n\n### Features\n\n- A\n").unwrap();
//! let blocks = version_blocks(&root.children);
//! assert_eq!(blocks.len(), 1);
//!
//! let sections = sections_of(&root.children, &blocks[0]);
//! assert_eq!(sections[0].title(), "Features");
//! assert_eq!(sections[0].content.len(), 1);
//! ```

use std::ops::Range;

use markdown::mdast::{Heading, Node, Root};

use crate::categories::{self, Category};
use crate::markdown::{as_heading, heading_text, is_heading};

/// A level-2 delimited run of top-level nodes.
///
/// Indices are into the root's child list. Blocks are recomputed by every pass
/// and never cached across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionBlock {
    /// Index of the level-2 heading.
    pub heading_index: usize,
    /// First body index (the node after the heading).
    pub start: usize,
    /// One past the last body index.
    pub end: usize,
}

impl VersionBlock {
    /// The block's body as a range of root child indices.
    pub fn body(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits top-level nodes into version blocks, in document order.
///
/// Returns an empty list when there is no level-2 heading.
pub fn version_blocks(children: &[Node]) -> Vec<VersionBlock> {
    let headings: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, node)| is_heading(node, 2))
        .map(|(index, _)| index)
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(n, &heading_index)| VersionBlock {
            heading_index,
            start: heading_index + 1,
            end: headings.get(n + 1).copied().unwrap_or(children.len()),
        })
        .collect()
}

/// Index layout of one named section, relative to the slice it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    /// Index of the level-3 heading.
    pub heading: usize,
    /// Content nodes following the heading.
    pub content: Range<usize>,
}

impl SectionSpan {
    /// Heading plus content.
    pub fn nodes(&self) -> Range<usize> {
        self.heading..self.content.end
    }
}

/// Finds the named sections of a block body.
///
/// Scanning stops at a level-2 heading. Every node that is not a level-3
/// heading (level-4 headings included) is content of the open section.
pub fn section_spans(body: &[Node]) -> Vec<SectionSpan> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut end = body.len();

    for (index, node) in body.iter().enumerate() {
        if is_heading(node, 2) {
            end = index;
            break;
        }
        if is_heading(node, 3) {
            if let Some(heading) = open.replace(index) {
                spans.push(SectionSpan {
                    heading,
                    content: heading + 1..index,
                });
            }
        }
    }

    if let Some(heading) = open {
        spans.push(SectionSpan {
            heading,
            content: heading + 1..end,
        });
    }

    spans
}

/// Number of leading body nodes that belong to no section.
pub fn preamble_len(body: &[Node]) -> usize {
    body.iter()
        .position(|node| is_heading(node, 3) || is_heading(node, 2))
        .unwrap_or(body.len())
}

/// A borrowed view of one named section.
#[derive(Debug, Clone, Copy)]
pub struct NamedSection<'a> {
    pub heading: &'a Heading,
    /// Index of the heading in the slice the section was taken from.
    pub heading_index: usize,
    pub content: &'a [Node],
}

impl NamedSection<'_> {
    /// Raw heading text.
    pub fn title(&self) -> String {
        heading_text(self.heading)
    }

    /// The registry category named by the heading, if any.
    pub fn category(&self) -> Option<&'static Category> {
        categories::by_heading(&self.title())
    }
}

/// Named sections of a block body; indices are relative to `body`.
pub fn block_sections(body: &[Node]) -> Vec<NamedSection<'_>> {
    sections_in(body, 0)
}

/// Named sections of `block`; indices are relative to the root's children.
pub fn sections_of<'a>(children: &'a [Node], block: &VersionBlock) -> Vec<NamedSection<'a>> {
    sections_in(&children[block.body()], block.start)
}

fn sections_in(body: &[Node], offset: usize) -> Vec<NamedSection<'_>> {
    section_spans(body)
        .into_iter()
        .filter_map(|span| {
            as_heading(&body[span.heading], 3).map(|heading| NamedSection {
                heading,
                heading_index: offset + span.heading,
                content: &body[span.content],
            })
        })
        .collect()
}

/// Runs `f` on the body of every version block.
///
/// Each body is detached from the root, handed over as an owned list, and
/// spliced back afterwards, so `f` may grow or shrink it freely without
/// disturbing any other block. `f` also receives the version heading text.
pub fn for_each_block_mut<F>(root: &mut Root, mut f: F)
where
    F: FnMut(&str, &mut Vec<Node>),
{
    let blocks = version_blocks(&root.children);

    // Back to front so earlier blocks keep their indices.
    for block in blocks.iter().rev() {
        let version = as_heading(&root.children[block.heading_index], 2)
            .map(heading_text)
            .unwrap_or_default();

        let tail = root.children.split_off(block.end);
        let mut body = root.children.split_off(block.start);
        f(&version, &mut body);
        root.children.append(&mut body);
        root.children.extend(tail);
    }
}

/// Rebuilds `body` from the nodes at `order`, in that order.
///
/// Indices refer to `body` before the call. Indices left out are dropped;
/// repeated or out-of-range indices are ignored.
pub fn rearrange(body: &mut Vec<Node>, order: &[usize]) {
    let mut slots: Vec<Option<Node>> = std::mem::take(body).into_iter().map(Some).collect();
    *body = order
        .iter()
        .filter_map(|&index| slots.get_mut(index).and_then(Option::take))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{parse, plain_text, print};

    #[test]
    fn test_version_blocks_none_without_h2() {
        let root = parse("# Changelog\n\nNothing yet.\n").unwrap();
        assert!(version_blocks(&root.children).is_empty());
    }

    #[test]
    fn test_version_blocks_boundaries() {
        let root = parse("# Title\n\n## 2.0.0\n\nA\n\nB\n\n## 1.0.0\n\nC\n").unwrap();
        let blocks = version_blocks(&root.children);
        assert_eq!(
            blocks,
            vec![
                VersionBlock {
                    heading_index: 1,
                    start: 2,
                    end: 4
                },
                VersionBlock {
                    heading_index: 4,
                    start: 5,
                    end: 6
                },
            ]
        );
        assert_eq!(blocks[0].len(), 2);
    }

    #[test]
    fn test_version_blocks_h1_does_not_end_block() {
        let root = parse("## 1.0.0\n\n# Not a version\n\nText\n").unwrap();
        let blocks = version_blocks(&root.children);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end, 3);
    }

    #[test]
    fn test_empty_block() {
        let root = parse("## 2.0.0\n\n## 1.0.0\n").unwrap();
        let blocks = version_blocks(&root.children);
        assert!(blocks[0].is_empty());
        assert!(sections_of(&root.children, &blocks[0]).is_empty());
    }

    #[test]
    fn test_sections_of_preamble_excluded() {
        let root = parse(
            "## 1.0.0\n\nIntro text\n\n### Features\n\n- A\n\n#### Detail\n\n### Bug Fixes\n\n- B\n",
        )
        .unwrap();
        let blocks = version_blocks(&root.children);
        let sections = sections_of(&root.children, &blocks[0]);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title(), "Features");
        assert_eq!(sections[0].heading_index, 2);
        // The level-4 heading is content.
        assert_eq!(sections[0].content.len(), 2);
        assert_eq!(sections[1].category().map(|c| c.priority), Some(3));
        assert_eq!(plain_text(&sections[1].content[0]), "B");
    }

    #[test]
    fn test_section_spans_stop_at_h2() {
        let root = parse("### A\n\nx\n\n## 1.0.0\n\n### B\n").unwrap();
        let spans = section_spans(&root.children);
        assert_eq!(
            spans,
            vec![SectionSpan {
                heading: 0,
                content: 1..2
            }]
        );
    }

    #[test]
    fn test_preamble_len() {
        let root = parse("one\n\ntwo\n\n### Features\n").unwrap();
        assert_eq!(preamble_len(&root.children), 2);
        let root = parse("only text\n").unwrap();
        assert_eq!(preamble_len(&root.children), 1);
    }

    #[test]
    fn test_unknown_section_has_no_category() {
        let root = parse("### Highlights\n").unwrap();
        let sections = block_sections(&root.children);
        assert_eq!(sections[0].title(), "Highlights");
        assert!(sections[0].category().is_none());
    }

    #[test]
    fn test_rearrange_reorders_and_drops() {
        let mut root = parse("a\n\nb\n\nc\n").unwrap();
        rearrange(&mut root.children, &[2, 0, 0, 9]);
        assert_eq!(print(&root).unwrap(), "c\n\na\n");
    }

    #[test]
    fn test_for_each_block_mut_isolates_blocks() {
        let mut root = parse("# Title\n\n## 2.0.0\n\nA\n\n## 1.0.0\n\nB\n").unwrap();
        let mut seen = Vec::new();

        for_each_block_mut(&mut root, |version, body| {
            seen.push(version.to_string());
            if version == "2.0.0" {
                body.clear();
            } else {
                let extra = body[0].clone();
                body.push(extra);
            }
        });

        assert_eq!(seen, vec!["1.0.0", "2.0.0"]);
        assert_eq!(print(&root).unwrap(), "# Title\n\n## 2.0.0\n\n## 1.0.0\n\nB\n\nB\n");
    }
}
