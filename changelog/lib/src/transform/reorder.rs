//! Reorder sections by category priority within each version block.

use markdown::mdast::{Node, Root};
use tracing::debug;

use crate::blocks::{for_each_block_mut, rearrange, section_spans};
use crate::categories;
use crate::markdown::{as_heading, heading_text};

/// Priority given to headings that name no known category.
const UNKNOWN_PRIORITY: u8 = u8::MAX;

/// Stable-sorts the sections of each block by ascending priority.
///
/// Unrecognized headings sort after every known category and keep their
/// relative order. The preamble stays in front. Blocks that are already in
/// order are left alone.
pub fn reorder_sections(root: &mut Root) {
    for_each_block_mut(root, reorder_block);
}

fn reorder_block(version: &str, body: &mut Vec<Node>) {
    let spans = section_spans(body);
    if spans.len() < 2 {
        return;
    }

    let mut ranked: Vec<(u8, usize)> = spans
        .iter()
        .enumerate()
        .map(|(index, span)| (priority(&body[span.heading]), index))
        .collect();

    if ranked.windows(2).all(|pair| pair[0].0 <= pair[1].0) {
        return;
    }

    ranked.sort_by_key(|(priority, _)| *priority);

    let mut order: Vec<usize> = (0..spans[0].heading).collect();
    for &(_, index) in &ranked {
        order.extend(spans[index].nodes());
    }

    rearrange(body, &order);
    debug!(version, sections = spans.len(), "Reordered sections");
}

fn priority(node: &Node) -> u8 {
    as_heading(node, 3)
        .and_then(|heading| categories::by_heading(&heading_text(heading)))
        .map_or(UNKNOWN_PRIORITY, |category| category.priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{parse, print};

    fn run(content: &str) -> String {
        let mut root = parse(content).unwrap();
        reorder_sections(&mut root);
        print(&root).unwrap()
    }

    #[test]
    fn test_sorted_block_is_noop() {
        let content = "## 1.0.0\n\n### Features\n\n- A\n\n### Bug Fixes\n\n- B\n";
        assert_eq!(run(content), content);
    }

    #[test]
    fn test_sorts_by_priority() {
        let output = run(
            "## 1.0.0\n\n### Bug Fixes\n\n- fix\n\n### Documentation\n\n- docs\n\n### Features\n\n- feat\n\n### Breaking Changes\n\n- break\n",
        );
        assert_eq!(
            output,
            "## 1.0.0\n\n### Breaking Changes\n\n- break\n\n### Features\n\n- feat\n\n### Bug Fixes\n\n- fix\n\n### Documentation\n\n- docs\n"
        );
    }

    #[test]
    fn test_unknown_sections_last_in_original_order() {
        let output = run(
            "## 1.0.0\n\n### Zeta\n\nz\n\n### Features\n\n- A\n\n### Alpha\n\na\n\n### Other\n\n- o\n",
        );
        assert_eq!(
            output,
            "## 1.0.0\n\n### Features\n\n- A\n\n### Other\n\n- o\n\n### Zeta\n\nz\n\n### Alpha\n\na\n"
        );
    }

    #[test]
    fn test_preamble_stays_first() {
        let output = run("## 1.0.0\n\nSummary\n\n### Tests\n\n- t\n\n### Features\n\n- f\n");
        assert_eq!(
            output,
            "## 1.0.0\n\nSummary\n\n### Features\n\n- f\n\n### Tests\n\n- t\n"
        );
    }

    #[test]
    fn test_single_section_untouched() {
        let content = "## 1.0.0\n\n### Zeta\n\n- z\n";
        assert_eq!(run(content), content);
    }
}
