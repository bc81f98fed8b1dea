//! Aggregate contributor attributions into one paragraph per version block.
//!
//! Release entries end with an attribution in one of two shapes:
//!
//! - linked: `Thanks [@user](https://github.com/user)!`, which parses into a
//!   text node ending with `"Thanks "`, a link whose text is `"@user"`, and a
//!   text node `"!"`
//! - plain: `Thanks @user!`, which stays inside a single text node
//!
//! The attribution is cut out of the entry and every contributor of the block
//! is thanked once, in a paragraph appended at the block's end.

use lazy_static::lazy_static;
use markdown::mdast::{Link, Node, Paragraph, Root, Text};
use regex::Regex;
use tracing::debug;

use crate::blocks::for_each_block_mut;
use crate::markdown::children_mut;

lazy_static! {
    static ref LINKED_LEAD: Regex = Regex::new(r"\s*Thanks $").unwrap();
    static ref PLAIN_ATTRIBUTION: Regex =
        Regex::new(r"\s*Thanks @([A-Za-z0-9_][A-Za-z0-9_-]*)!$").unwrap();
}

/// A contributor collected from an attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub username: String,
    pub profile_url: Option<String>,
}

impl Contributor {
    fn key(&self) -> String {
        self.username.to_lowercase()
    }
}

/// Moves entry attributions into a per-block "Thanks to ..." paragraph.
///
/// Only paragraphs inside list nodes of a block are inspected. Contributors
/// are deduplicated by lowercase username; the first attribution seen for a
/// username wins. Blocks without attributions are left unchanged.
///
/// The thanks paragraph lists names by their lowercase form compared byte by
/// byte, not by locale collation. Punctuation sorts by its code point:
/// `-` (0x2D) and digits come before letters, `_` (0x5F) comes before `a`
/// but after `-`, so `@a_b` follows `@a-c`.
pub fn contributor_footnotes(root: &mut Root) {
    for_each_block_mut(root, footnote_block);
}

fn footnote_block(version: &str, body: &mut Vec<Node>) {
    let mut contributors: Vec<Contributor> = Vec::new();

    for node in body.iter_mut() {
        if !matches!(node, Node::List(_)) {
            continue;
        }

        visit_paragraphs(node, &mut |paragraph: &mut Paragraph| {
            let found = extract_linked(paragraph).or_else(|| extract_plain(paragraph));
            if let Some(contributor) = found {
                if !contributors.iter().any(|c| c.key() == contributor.key()) {
                    contributors.push(contributor);
                }
            }
        });
    }

    if contributors.is_empty() {
        return;
    }

    debug!(
        version,
        contributors = contributors.len(),
        "Collected contributor attributions"
    );
    body.push(thanks_paragraph(contributors));
}

fn visit_paragraphs<F>(node: &mut Node, f: &mut F)
where
    F: FnMut(&mut Paragraph),
{
    match node {
        Node::Paragraph(paragraph) => f(paragraph),
        other => {
            if let Some(children) = children_mut(other) {
                for child in children {
                    visit_paragraphs(child, f);
                }
            }
        }
    }
}

/// Matches and removes a trailing `Thanks [@user](url)!`.
fn extract_linked(paragraph: &mut Paragraph) -> Option<Contributor> {
    let count = paragraph.children.len();
    if count < 3 {
        return None;
    }

    let [Node::Text(lead), Node::Link(link), Node::Text(bang)] = &paragraph.children[count - 3..]
    else {
        return None;
    };

    if bang.value != "!" {
        return None;
    }

    let [Node::Text(label)] = link.children.as_slice() else {
        return None;
    };

    let username = label.value.strip_prefix('@')?;
    if username.is_empty() {
        return None;
    }

    let cut = LINKED_LEAD.find(&lead.value)?.start();
    let contributor = Contributor {
        username: username.to_string(),
        profile_url: Some(link.url.clone()),
    };

    paragraph.children.truncate(count - 2);
    if let Some(Node::Text(lead)) = paragraph.children.last_mut() {
        lead.value.truncate(cut);
        if lead.value.is_empty() {
            paragraph.children.pop();
        }
    }

    Some(contributor)
}

/// Matches and removes a trailing `Thanks @user!` inside the last text node.
fn extract_plain(paragraph: &mut Paragraph) -> Option<Contributor> {
    let Some(Node::Text(tail)) = paragraph.children.last_mut() else {
        return None;
    };

    let (username, cut) = {
        let captures = PLAIN_ATTRIBUTION.captures(&tail.value)?;
        (captures.get(1)?.as_str().to_string(), captures.get(0)?.start())
    };

    tail.value.truncate(cut);
    if tail.value.is_empty() {
        paragraph.children.pop();
    }

    Some(Contributor {
        username,
        profile_url: None,
    })
}

/// Builds `Thanks to A, B, and C for their contributions!`.
fn thanks_paragraph(mut contributors: Vec<Contributor>) -> Node {
    contributors.sort_by_key(Contributor::key);

    let count = contributors.len();
    let mut children = Vec::new();
    push_text(&mut children, "Thanks to ");

    for (index, contributor) in contributors.into_iter().enumerate() {
        if index > 0 {
            let separator = match (count, index == count - 1) {
                (2, _) => " and ",
                (_, true) => ", and ",
                _ => ", ",
            };
            push_text(&mut children, separator);
        }

        let name = format!("@{}", contributor.username);
        match contributor.profile_url {
            Some(url) => children.push(Node::Link(Link {
                children: vec![Node::Text(Text {
                    value: name,
                    position: None,
                })],
                position: None,
                url,
                title: None,
            })),
            None => push_text(&mut children, &name),
        }
    }

    push_text(&mut children, " for their contributions!");

    Node::Paragraph(Paragraph {
        children,
        position: None,
    })
}

/// Appends text, extending the previous node when it is text too.
fn push_text(children: &mut Vec<Node>, value: &str) {
    if let Some(Node::Text(last)) = children.last_mut() {
        last.value.push_str(value);
        return;
    }
    children.push(Node::Text(Text {
        value: value.to_string(),
        position: None,
    }));
}
