//! Render parsed fragments into raw release entries.
//!
//! This is the producing side of the transform pipeline: entries come out
//! with duplicate sections, inline issue links, and trailing attributions,
//! and the passes clean those up once the release is assembled.

use lazy_static::lazy_static;
use regex::Regex;

use super::ParsedFragment;
use crate::categories::{Category, DEPENDENCIES};

lazy_static! {
    static ref MARKDOWN_LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
}

/// Pull request and author attribution for an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub pull: Option<u64>,
    pub user: Option<String>,
    /// Plain URL or a markdown link wrapping one.
    pub pull_url: Option<String>,
    /// Plain URL or a markdown link wrapping one.
    pub user_url: Option<String>,
}

impl Attribution {
    /// Renders the suffix appended to an entry, with a leading space.
    ///
    /// ```
    /// use changelog_lib::fragment::compose::Attribution;
    ///
    /// let attribution = Attribution {
    ///     pull: Some(42),
    ///     user: Some("alice".into()),
    ///     pull_url: Some("https://github.com/org/repo/pull/42".into()),
    ///     user_url: None,
    /// };
    /// assert_eq!(
    ///     attribution.render(),
    ///     " [#42](https://github.com/org/repo/pull/42) Thanks @alice!"
    /// );
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(pull) = self.pull.filter(|pull| *pull > 0) {
            match &self.pull_url {
                Some(url) => out.push_str(&format!(" [#{pull}]({})", extract_url_from_markdown(url))),
                None => out.push_str(&format!(" (#{pull})")),
            }
        }

        if let Some(user) = self.user.as_deref().filter(|user| !user.is_empty()) {
            match &self.user_url {
                Some(url) => out.push_str(&format!(
                    " Thanks [@{user}]({})!",
                    extract_url_from_markdown(url)
                )),
                None => out.push_str(&format!(" Thanks @{user}!")),
            }
        }

        out
    }
}

/// Returns the URL of a `[text](url)` link, or the input when it is not one.
pub fn extract_url_from_markdown(link_or_url: &str) -> &str {
    MARKDOWN_LINK
        .captures(link_or_url)
        .and_then(|captures| captures.get(2))
        .map_or(link_or_url, |url| url.as_str())
}

/// Issue numbers a change closes, fixes, or refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueLinks {
    pub closes: Vec<u64>,
    pub fixes: Vec<u64>,
    pub refs: Vec<u64>,
}

impl IssueLinks {
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty() && self.fixes.is_empty() && self.refs.is_empty()
    }

    /// Renders `Closes: [#1](url), [#2](url). Refs: [#3](url)`, skipping
    /// empty groups. Returns `None` when every group is empty.
    ///
    /// ```
    /// use changelog_lib::fragment::compose::IssueLinks;
    ///
    /// let issues = IssueLinks { fixes: vec![4], ..Default::default() };
    /// assert_eq!(
    ///     issues.render("org/repo").as_deref(),
    ///     Some("Fixes: [#4](https://github.com/org/repo/issues/4)")
    /// );
    /// ```
    pub fn render(&self, repo: &str) -> Option<String> {
        let groups: Vec<String> = [
            ("Closes", &self.closes),
            ("Fixes", &self.fixes),
            ("Refs", &self.refs),
        ]
        .into_iter()
        .filter(|(_, numbers)| !numbers.is_empty())
        .map(|(keyword, numbers)| {
            let links: Vec<String> = numbers
                .iter()
                .map(|number| issue_link(repo, *number))
                .collect();
            format!("{keyword}: {}", links.join(", "))
        })
        .collect();

        (!groups.is_empty()).then(|| groups.join(". "))
    }
}

/// Repository links attached to one changeset's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryLinks {
    /// GitHub repository as `owner/repo`.
    pub repo: String,
    /// Full commit hash of the changeset.
    pub commit: Option<String>,
    pub issues: IssueLinks,
}

impl EntryLinks {
    /// The commit link followed by a space, or nothing without a commit.
    fn commit_prefix(&self) -> String {
        self.commit
            .as_deref()
            .map(|commit| format!("{} ", commit_link(&self.repo, commit)))
            .unwrap_or_default()
    }
}

/// Renders ``[`abc1234`](https://github.com/<repo>/commit/<hash>)``, showing
/// the first seven characters of the hash.
pub fn commit_link(repo: &str, commit: &str) -> String {
    let short: String = commit.chars().take(7).collect();
    format!("[`{short}`](https://github.com/{repo}/commit/{commit})")
}

fn issue_link(repo: &str, number: u64) -> String {
    format!("[#{number}](https://github.com/{repo}/issues/{number})")
}

/// Renders a flat summary as one entry body: commit link, trimmed summary,
/// then the issue links as a continuation paragraph of the same bullet.
pub fn format_entry(summary: &str, links: &EntryLinks) -> String {
    let mut entry = format!("{}{}", links.commit_prefix(), summary.trim());
    if let Some(issues) = links.issues.render(&links.repo) {
        entry.push_str("\n\n  ");
        entry.push_str(&issues);
    }
    entry
}

/// Renders a parsed fragment as release entry markdown.
///
/// Sectioned fragments emit a `### <category>` heading per section, turning
/// content that is not already a list into a single bullet. The commit link
/// goes in front of each section's first bullet. Flat fragments become one
/// bullet under `fallback`, formatted by [`format_entry`]. The attribution
/// goes at the very end.
pub fn render_fragment(
    fragment: &ParsedFragment,
    fallback: &Category,
    links: &EntryLinks,
    attribution: &str,
) -> String {
    if fragment.is_flat() {
        let summary = fragment.preamble.as_deref().unwrap_or("");
        return format!(
            "### {}\n\n- {}{attribution}",
            fallback.heading,
            format_entry(summary, links)
        );
    }

    let prefix = links.commit_prefix();
    let mut parts: Vec<String> = Vec::new();
    if let Some(preamble) = &fragment.preamble {
        parts.push(preamble.clone());
    }

    for section in &fragment.sections {
        let mut part = format!("### {}", section.category.heading);
        if !section.content.is_empty() {
            part.push_str("\n\n");
            match list_marker(&section.content) {
                Some(marker) => {
                    part.push_str(marker);
                    part.push_str(&prefix);
                    part.push_str(&section.content[marker.len()..]);
                }
                None => {
                    part.push_str("- ");
                    part.push_str(&prefix);
                    part.push_str(&section.content);
                }
            }
        }
        parts.push(part);
    }

    format!("{}{attribution}", parts.join("\n\n").trim_end())
}

/// A dependency bumped to a new version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyUpdate {
    pub name: String,
    pub version: String,
}

/// Renders the `### Dependencies` entry listing updated dependencies.
///
/// The bullet links every given commit and nests one `name@version` line per
/// dependency. Returns an empty string when nothing was updated.
///
/// ```
/// use changelog_lib::fragment::compose::{DependencyUpdate, render_dependency_update};
///
/// let updates = [DependencyUpdate { name: "core".into(), version: "2.0.0".into() }];
/// assert_eq!(
///     render_dependency_update("org/repo", &[], &updates),
///     "### Dependencies\n\n- Updated dependencies:\n  - core@2.0.0"
/// );
/// ```
pub fn render_dependency_update(
    repo: &str,
    commits: &[&str],
    dependencies: &[DependencyUpdate],
) -> String {
    if dependencies.is_empty() {
        return String::new();
    }

    let mut out = format!("### {}\n\n- Updated dependencies", DEPENDENCIES.heading);
    if !commits.is_empty() {
        let links: Vec<String> = commits
            .iter()
            .map(|commit| commit_link(repo, commit))
            .collect();
        out.push_str(&format!(" [{}]", links.join(", ")));
    }
    out.push(':');

    for dependency in dependencies {
        out.push_str(&format!("\n  - {}@{}", dependency.name, dependency.version));
    }
    out
}

/// Concatenates rendered entries under a `## <version>` heading.
pub fn assemble_release(version: &str, entries: &[String]) -> String {
    let mut out = format!("## {version}\n");
    for entry in entries.iter().map(|entry| entry.trim()).filter(|entry| !entry.is_empty()) {
        out.push('\n');
        out.push_str(entry);
        out.push('\n');
    }
    out
}

fn list_marker(content: &str) -> Option<&'static str> {
    ["- ", "* "]
        .into_iter()
        .find(|marker| content.starts_with(marker))
}
