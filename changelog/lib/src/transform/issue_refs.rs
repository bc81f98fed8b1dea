//! Consolidate inline issue links into reference-style links.

use lazy_static::lazy_static;
use markdown::mdast::{Definition, LinkReference, Node, ReferenceKind, Root, Text};
use regex::Regex;
use tracing::debug;

use crate::blocks::for_each_block_mut;
use crate::markdown::children_mut;

lazy_static! {
    static ref ISSUE_LABEL: Regex = Regex::new(r"^#[0-9]+$").unwrap();
}

/// An issue label and the first URL it was linked to in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReference {
    pub label: String,
    pub url: String,
}

impl IssueReference {
    /// Sort key ordering labels by their number without parsing it.
    fn numeric_key(&self) -> (usize, String) {
        let digits = self.label.trim_start_matches('#').trim_start_matches('0');
        (digits.len(), digits.to_string())
    }
}

/// Rewrites `[#42](url)` links as `[#42]` references and appends one
/// `[#42]: url` definition per label at the end of each block.
///
/// The first URL seen for a label wins. Definitions are ordered by issue
/// number. Links whose text is anything other than `#` followed by ASCII
/// digits are left inline.
///
/// Each block gets its own definitions, but markdown resolves a label to the
/// first definition in the whole document. When two blocks link the same
/// label to different URLs, the rendered document points both of them at the
/// earlier block's URL.
pub fn issue_link_refs(root: &mut Root) {
    for_each_block_mut(root, refs_block);
}

fn refs_block(version: &str, body: &mut Vec<Node>) {
    let mut references: Vec<IssueReference> = Vec::new();
    let mut converted = 0;

    for node in body.iter_mut() {
        convert_links(node, &mut references, &mut converted);
    }

    if references.is_empty() {
        return;
    }

    references.sort_by_key(IssueReference::numeric_key);
    debug!(
        version,
        converted,
        definitions = references.len(),
        "Converted issue links to references"
    );

    body.extend(references.into_iter().map(|reference| {
        Node::Definition(Definition {
            position: None,
            url: reference.url,
            title: None,
            identifier: reference.label.to_lowercase(),
            label: Some(reference.label),
        })
    }));
}

fn convert_links(node: &mut Node, references: &mut Vec<IssueReference>, converted: &mut usize) {
    if let Some(reference) = issue_reference(node) {
        if !references.iter().any(|known| known.label == reference.label) {
            references.push(reference.clone());
        }
        *node = reference_node(reference.label);
        *converted += 1;
        return;
    }

    if let Some(children) = children_mut(node) {
        for child in children {
            convert_links(child, references, converted);
        }
    }
}

fn issue_reference(node: &Node) -> Option<IssueReference> {
    let Node::Link(link) = node else {
        return None;
    };
    let [Node::Text(text)] = link.children.as_slice() else {
        return None;
    };
    if !ISSUE_LABEL.is_match(&text.value) {
        return None;
    }
    Some(IssueReference {
        label: text.value.clone(),
        url: link.url.clone(),
    })
}

fn reference_node(label: String) -> Node {
    Node::LinkReference(LinkReference {
        children: vec![Node::Text(Text {
            value: label.clone(),
            position: None,
        })],
        position: None,
        reference_kind: ReferenceKind::Shortcut,
        identifier: label.to_lowercase(),
        label: Some(label),
    })
}
