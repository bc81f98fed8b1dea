//! Drop repeated list items within a section.

use std::collections::HashSet;

use markdown::mdast::{Node, Root};
use tracing::debug;

use crate::blocks::{for_each_block_mut, rearrange, section_spans};
use crate::markdown::plain_text;

/// Removes list items whose plain text already appeared earlier in the same
/// section.
///
/// The seen set spans every list directly inside the section's content, so
/// two adjacent lists in a section (which print as one list) deduplicate
/// against each other. Identical items in different sections or blocks are
/// kept. Lists left without items are removed. Preamble lists are not
/// touched.
pub fn deduplicate_items(root: &mut Root) {
    for_each_block_mut(root, dedup_block);
}

fn dedup_block(version: &str, body: &mut Vec<Node>) {
    let mut dropped = 0;
    let mut emptied: Vec<usize> = Vec::new();

    for span in section_spans(body) {
        let mut seen: HashSet<String> = HashSet::new();

        for index in span.content {
            let Node::List(list) = &mut body[index] else {
                continue;
            };

            let before = list.children.len();
            list.children
                .retain(|item| seen.insert(plain_text(item).trim().to_string()));
            dropped += before - list.children.len();

            if list.children.is_empty() {
                emptied.push(index);
            }
        }
    }

    if !emptied.is_empty() {
        let keep: Vec<usize> = (0..body.len())
            .filter(|index| !emptied.contains(index))
            .collect();
        rearrange(body, &keep);
    }

    if dropped > 0 {
        debug!(version, dropped, "Removed duplicate list items");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{parse, print};

    fn run(content: &str) -> String {
        let mut root = parse(content).unwrap();
        deduplicate_items(&mut root);
        print(&root).unwrap()
    }

    #[test]
    fn test_removes_duplicates_keeping_first() {
        let output = run("## 1.0.0\n\n### Features\n\n- A\n- B\n- A\n- C\n- B\n");
        assert_eq!(output, "## 1.0.0\n\n### Features\n\n- A\n- B\n- C\n");
    }

    #[test]
    fn test_compares_plain_text() {
        let output = run("## 1.0.0\n\n### Features\n\n- Added **login**\n- Added login\n");
        assert_eq!(output, "## 1.0.0\n\n### Features\n\n- Added **login**\n");
    }

    #[test]
    fn test_same_text_in_other_section_survives() {
        let content = "## 1.0.0\n\n### Features\n\n- Same\n\n### Bug Fixes\n\n- Same\n";
        assert_eq!(run(content), content);
    }

    #[test]
    fn test_same_text_in_other_block_survives() {
        let content = "## 2.0.0\n\n### Features\n\n- Same\n\n## 1.0.0\n\n### Features\n\n- Same\n";
        assert_eq!(run(content), content);
    }

    #[test]
    fn test_removes_list_emptied_across_lists() {
        let mut root = parse("## 1.0.0\n\n### Features\n\n- A\n\nBetween\n\n- A\n").unwrap();
        deduplicate_items(&mut root);
        assert_eq!(print(&root).unwrap(), "## 1.0.0\n\n### Features\n\n- A\n\nBetween\n");
        assert_eq!(root.children.len(), 4);
    }

    #[test]
    fn test_preamble_list_untouched() {
        let content = "## 1.0.0\n\n- A\n- A\n";
        assert_eq!(run(content), content);
    }
}
