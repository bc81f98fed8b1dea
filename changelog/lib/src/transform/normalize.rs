//! Final cleanup: drop empty sections and empty lists.

use markdown::mdast::{Node, Root};
use tracing::debug;

use crate::blocks::{for_each_block_mut, rearrange};
use crate::markdown::is_heading;

/// Removes level-3 headings with no content before the next level-2/3
/// heading or the end of the block, along with the blank paragraphs in
/// between. Lists without items are removed and do not count as content.
pub fn normalize_format(root: &mut Root) {
    for_each_block_mut(root, normalize_block);
}

fn normalize_block(version: &str, body: &mut Vec<Node>) {
    let mut remove = vec![false; body.len()];

    for index in 0..body.len() {
        if is_empty_list(&body[index]) {
            remove[index] = true;
            continue;
        }
        if !is_heading(&body[index], 3) {
            continue;
        }

        let mut has_content = false;
        for next in index + 1..body.len() {
            let node = &body[next];
            if is_blank_paragraph(node) || is_empty_list(node) {
                remove[next] = true;
                continue;
            }
            has_content = !(is_heading(node, 2) || is_heading(node, 3));
            break;
        }

        if !has_content {
            remove[index] = true;
        }
    }

    let removed = remove.iter().filter(|flag| **flag).count();
    if removed == 0 {
        return;
    }

    let keep: Vec<usize> = (0..body.len()).filter(|index| !remove[*index]).collect();
    rearrange(body, &keep);
    debug!(version, removed, "Removed empty nodes");
}

fn is_empty_list(node: &Node) -> bool {
    matches!(node, Node::List(list) if list.children.is_empty())
}

fn is_blank_paragraph(node: &Node) -> bool {
    let Node::Paragraph(paragraph) = node else {
        return false;
    };
    paragraph
        .children
        .iter()
        .all(|child| matches!(child, Node::Text(text) if text.value.trim().is_empty()))
}
