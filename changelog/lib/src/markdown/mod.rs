//! Markdown codec for CHANGELOG documents.
//!
//! Parsing uses the `markdown` crate's MDAST implementation and printing
//! goes back to text through `mdast_util_to_markdown`. Both sides speak
//! CommonMark. GitHub Flavored Markdown (GFM) syntax such as tables,
//! strikethrough, task list markers and bare URLs is kept as plain text and
//! printed back as written.
//!
//! ## Examples
//!
//! ```
//! use changelog_lib::markdown::{parse, print};
//!
//! let root = parse("## 1.0.0\n\n### Features\n\n* Added login\n").unwrap();
//! assert_eq!(print(&root).unwrap(), "## 1.0.0\n\n### Features\n\n- Added login\n");
//! ```

use markdown::ParseOptions;
use markdown::mdast::{Heading, Node, Root};
use mdast_util_to_markdown::{Options, to_markdown_with_options};

use crate::error::{ChangelogError, ChangelogResult};

/// Parses markdown content into an MDAST root node.
///
/// ## Errors
///
/// Returns `ChangelogError::Parse` if the content cannot be parsed into an AST.
pub fn parse(content: &str) -> ChangelogResult<Root> {
    let options = ParseOptions::default();

    let node =
        markdown::to_mdast(content, &options).map_err(|e| ChangelogError::Parse(e.to_string()))?;

    match node {
        Node::Root(root) => Ok(root),
        other => Ok(Root {
            children: vec![other],
            position: None,
        }),
    }
}

/// Prints an MDAST root back to markdown.
///
/// Headings are ATX, code is fenced, bullets are `-`. A list directly after
/// another list switches to `*` so the two don't parse back as one.
///
/// ## Errors
///
/// Returns `ChangelogError::Print` for a node kind the printer has no syntax
/// for. Trees from [`parse`] never contain one.
pub fn print(root: &Root) -> ChangelogResult<String> {
    let options = Options {
        bullet: '-',
        bullet_other: '*',
        ..Options::default()
    };
    to_markdown_with_options(&Node::Root(root.clone()), &options)
        .map_err(|e| ChangelogError::Print(e.to_string()))
}

/// Returns the plain text of a node: all descendant text concatenated,
/// ignoring markup.
///
/// Image alt text counts as text; definitions and breaks contribute nothing.
pub fn plain_text(node: &Node) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

/// Returns the plain text of a run of sibling nodes.
pub fn plain_text_of(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        collect_text(node, &mut text);
    }
    text
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(x) => out.push_str(&x.value),
        Node::InlineCode(x) => out.push_str(&x.value),
        Node::Code(x) => out.push_str(&x.value),
        Node::Html(x) => out.push_str(&x.value),
        Node::Math(x) => out.push_str(&x.value),
        Node::InlineMath(x) => out.push_str(&x.value),
        Node::Image(x) => out.push_str(&x.alt),
        Node::ImageReference(x) => out.push_str(&x.alt),
        other => {
            if let Some(children) = children(other) {
                for child in children {
                    collect_text(child, out);
                }
            }
        }
    }
}

/// Returns the text of a heading.
pub fn heading_text(heading: &Heading) -> String {
    plain_text_of(&heading.children)
}

/// Returns the heading if `node` is a heading of exactly `depth`.
pub fn as_heading(node: &Node, depth: u8) -> Option<&Heading> {
    match node {
        Node::Heading(heading) if heading.depth == depth => Some(heading),
        _ => None,
    }
}

/// Returns `true` if `node` is a heading of exactly `depth`.
pub fn is_heading(node: &Node, depth: u8) -> bool {
    as_heading(node, depth).is_some()
}

/// Returns the child list of a container node.
pub fn children(node: &Node) -> Option<&Vec<Node>> {
    match node {
        Node::Root(x) => Some(&x.children),
        Node::Blockquote(x) => Some(&x.children),
        Node::FootnoteDefinition(x) => Some(&x.children),
        Node::List(x) => Some(&x.children),
        Node::ListItem(x) => Some(&x.children),
        Node::Paragraph(x) => Some(&x.children),
        Node::Heading(x) => Some(&x.children),
        Node::Emphasis(x) => Some(&x.children),
        Node::Strong(x) => Some(&x.children),
        Node::Delete(x) => Some(&x.children),
        Node::Link(x) => Some(&x.children),
        Node::LinkReference(x) => Some(&x.children),
        Node::Table(x) => Some(&x.children),
        Node::TableRow(x) => Some(&x.children),
        Node::TableCell(x) => Some(&x.children),
        _ => None,
    }
}

/// Returns the mutable child list of a container node.
pub fn children_mut(node: &mut Node) -> Option<&mut Vec<Node>> {
    match node {
        Node::Root(x) => Some(&mut x.children),
        Node::Blockquote(x) => Some(&mut x.children),
        Node::FootnoteDefinition(x) => Some(&mut x.children),
        Node::List(x) => Some(&mut x.children),
        Node::ListItem(x) => Some(&mut x.children),
        Node::Paragraph(x) => Some(&mut x.children),
        Node::Heading(x) => Some(&mut x.children),
        Node::Emphasis(x) => Some(&mut x.children),
        Node::Strong(x) => Some(&mut x.children),
        Node::Delete(x) => Some(&mut x.children),
        Node::Link(x) => Some(&mut x.children),
        Node::LinkReference(x) => Some(&mut x.children),
        Node::Table(x) => Some(&mut x.children),
        Node::TableRow(x) => Some(&mut x.children),
        Node::TableCell(x) => Some(&mut x.children),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_returns_root() {
        let root = parse("# Title\n\n## 1.0.0\n").unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(is_heading(&root.children[0], 1));
        assert!(is_heading(&root.children[1], 2));
    }

    #[test]
    fn test_parse_empty_content() {
        let root = parse("").unwrap();
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_gfm_syntax_stays_text() {
        let root = parse("~~gone~~ and https://example.com\n\n- [x] done for core@2.0.0\n").unwrap();
        let json = serde_json::to_string(&Node::Root(root)).unwrap();
        assert!(!json.contains("\"type\":\"link\""));
        assert!(!json.contains("delete"));
        assert!(!json.contains("\"checked\":true"));
    }

    #[test]
    fn test_ast_serializable() {
        let root = parse("## 1.0.0\n\n- item\n").unwrap();
        let json = serde_json::to_string(&Node::Root(root)).unwrap();
        assert!(json.contains("heading"));
        assert!(json.contains("item"));
    }

    #[test]
    fn test_plain_text_ignores_markup() {
        let root = parse("- Added **bold** and `code` [link](https://example.com)\n").unwrap();
        let text = plain_text(&root.children[0]);
        assert_eq!(text, "Added bold and code link");
    }

    #[test]
    fn test_heading_text_nested_inline() {
        let root = parse("### Bug *Fixes*\n").unwrap();
        let heading = as_heading(&root.children[0], 3).unwrap();
        assert_eq!(heading_text(heading), "Bug Fixes");
    }

    fn roundtrip(content: &str) -> String {
        print(&parse(content).unwrap()).unwrap()
    }

    #[test]
    fn test_print_empty_root() {
        assert_eq!(roundtrip(""), "");
    }

    #[test]
    fn test_print_normalizes_markers() {
        let output = roundtrip("Title\n=====\n\n+ one\n+ two\n\n___\n\n~~~\ncode\n~~~\n");
        assert_eq!(output, "# Title\n\n- one\n- two\n\n***\n\n```\ncode\n```\n");
    }

    #[test]
    fn test_print_adjacent_lists_alternate_markers() {
        let mut root = parse("- a\n").unwrap();
        let list = root.children[0].clone();
        root.children.push(list.clone());
        root.children.push(list);
        assert_eq!(print(&root).unwrap(), "- a\n\n* a\n\n- a\n");
    }

    #[test]
    fn test_print_reference_links_and_definitions() {
        let content = "See [#5] and [#7].\n\n[#5]: https://github.com/org/repo/issues/5\n\n[#7]: https://github.com/org/repo/issues/7\n";
        assert_eq!(roundtrip(content), content);
    }

    #[test]
    fn test_print_code_in_list_item() {
        let content = "- item\n\n  ```sh\n  echo hi\n  ```\n";
        assert_eq!(roundtrip(content), content);
    }

    #[test]
    fn test_print_gfm_text_passes_through() {
        let content = "| a | b |\n| --- | --- |\n| 1 | 2 |\n\nNow ~~gone~~ for good at https://example.com\n";
        assert_eq!(roundtrip(content), content);
    }

    #[test]
    fn test_print_escapes_are_stable() {
        let once = roundtrip("Use \\*literal\\* stars and snake_case\n");
        assert_eq!(roundtrip(&once), once);
        assert!(once.contains("\\*literal\\*"));
    }

    #[test]
    fn test_as_heading_checks_depth() {
        let root = parse("## 2.0.0\n").unwrap();
        assert!(as_heading(&root.children[0], 2).is_some());
        assert!(as_heading(&root.children[0], 3).is_none());
    }
}
