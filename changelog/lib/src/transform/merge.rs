//! Merge duplicate section headings within each version block.

use std::collections::HashMap;

use markdown::mdast::{Node, Root};
use tracing::debug;

use crate::blocks::{for_each_block_mut, rearrange, section_spans};
use crate::categories;
use crate::markdown::{as_heading, heading_text};

/// Folds later sections that resolve to the same category (or, for unknown
/// headings, the same lowercased text) into the first one.
///
/// The first section of a group keeps its position and heading. Content of
/// every later member follows the first member's own content in document
/// order, and the later headings are removed.
pub fn merge_sections(root: &mut Root) {
    for_each_block_mut(root, merge_block);
}

fn merge_block(version: &str, body: &mut Vec<Node>) {
    let spans = section_spans(body);
    if spans.len() < 2 {
        return;
    }

    let mut group_of: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (index, span) in spans.iter().enumerate() {
        let key = section_key(&body[span.heading]);
        match group_of.get(&key) {
            Some(&group) => groups[group].push(index),
            None => {
                group_of.insert(key, groups.len());
                groups.push(vec![index]);
            }
        }
    }

    if groups.len() == spans.len() {
        return;
    }

    let mut order: Vec<usize> = (0..spans[0].heading).collect();
    for members in &groups {
        for (position, &member) in members.iter().enumerate() {
            let span = &spans[member];
            if position == 0 {
                order.push(span.heading);
            }
            order.extend(span.content.clone());
        }
    }

    rearrange(body, &order);
    debug!(
        version,
        merged = spans.len() - groups.len(),
        "Merged duplicate sections"
    );
}

fn section_key(node: &Node) -> String {
    let title = as_heading(node, 3).map(heading_text).unwrap_or_default();
    match categories::by_heading(&title) {
        Some(category) => category.heading.to_lowercase(),
        None => title.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{parse, print};

    fn run(content: &str) -> String {
        let mut root = parse(content).unwrap();
        merge_sections(&mut root);
        print(&root).unwrap()
    }

    #[test]
    fn test_no_duplicates_is_noop() {
        let content = "## 1.0.0\n\n### Features\n\n- A\n\n### Bug Fixes\n\n- B\n";
        assert_eq!(run(content), content);
    }

    #[test]
    fn test_merges_duplicates_in_member_order() {
        let output = run(
            "## 1.0.0\n\n### Features\n\n- A\n\n### Bug Fixes\n\n- B\n\n### Features\n\n- C\n\n### features\n\n- D\n",
        );
        assert_eq!(
            output,
            "## 1.0.0\n\n### Features\n\n- A\n\n* C\n\n- D\n\n### Bug Fixes\n\n- B\n"
        );
    }

    #[test]
    fn test_merges_unknown_headings_by_text() {
        let output = run("## 1.0.0\n\n### Highlights\n\nOne\n\n### HIGHLIGHTS\n\nTwo\n");
        assert_eq!(output, "## 1.0.0\n\n### Highlights\n\nOne\n\nTwo\n");
    }

    #[test]
    fn test_preamble_untouched() {
        let output = run("## 1.0.0\n\nIntro\n\n### CI\n\n- a\n\n### CI\n\n- b\n");
        assert_eq!(output, "## 1.0.0\n\nIntro\n\n### CI\n\n- a\n\n* b\n");
    }

    #[test]
    fn test_blocks_merge_independently() {
        let output = run(
            "## 2.0.0\n\n### Features\n\n- A\n\n### Features\n\n- B\n\n## 1.0.0\n\n### Features\n\n- C\n",
        );
        assert_eq!(
            output,
            "## 2.0.0\n\n### Features\n\n- A\n\n* B\n\n## 1.0.0\n\n### Features\n\n- C\n"
        );
    }
}
