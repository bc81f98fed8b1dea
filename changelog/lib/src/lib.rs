//! CHANGELOG post-processing.
//!
//! Release tooling builds a version's notes by concatenating one fragment per
//! changeset under a `## <version>` heading. The result repeats section
//! headings, mixes section order, duplicates bullets, scatters contributor
//! thanks, and repeats issue links. This crate parses that markdown once, runs
//! a fixed sequence of structural passes over each version block, and prints
//! a canonical document.
//!
//! ## Modules
//!
//! - [`categories`] - The 13 section categories and their lookups
//! - [`blocks`] - Version block and named section segmentation
//! - [`transform`] - The six passes and the [`Pipeline`] that runs them
//! - [`fragment`] - Section-aware changeset fragment parsing and rendering
//! - [`markdown`] - Markdown parse/print codec
//!
//! ## Examples
//!
//! ```
//! use changelog_lib::transform_content;
//!
//! let raw = "## 1.0.0\n\n### Features\n\n- Added login [#12](https://github.com/org/repo/issues/12) Thanks @amy!\n";
//! let output = transform_content(raw).unwrap();
//! assert_eq!(
//!     output,
//!     "## 1.0.0\n\n### Features\n\n- Added login [#12]\n\nThanks to @amy for their contributions!\n\n[#12]: https://github.com/org/repo/issues/12\n"
//! );
//! ```

pub mod blocks;
pub mod categories;
pub mod error;
pub mod fragment;
pub mod markdown;
pub mod transform;

use std::fs;
use std::path::Path;

use tracing::info;

pub use categories::Category;
pub use error::{ChangelogError, ChangelogResult};
pub use transform::{Pass, Pipeline, TransformConfig};

/// Runs every pass over `content` and returns the printed result.
///
/// Running it again on its own output changes nothing.
///
/// ## Errors
///
/// Returns `ChangelogError::Parse` if the content cannot be parsed.
pub fn transform_content(content: &str) -> ChangelogResult<String> {
    Pipeline::default().transform(content)
}

/// Transforms a CHANGELOG file in place.
///
/// ## Errors
///
/// - `ChangelogError::Read` if the file cannot be read
/// - `ChangelogError::Parse` if its content cannot be parsed
/// - `ChangelogError::Write` if the result cannot be written back
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn transform_file(path: &Path) -> ChangelogResult<()> {
    let content = fs::read_to_string(path).map_err(|source| ChangelogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let output = transform_content(&content)?;
    if output == content {
        info!("CHANGELOG already normalized");
        return Ok(());
    }

    fs::write(path, output).map_err(|source| ChangelogError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote normalized CHANGELOG");

    Ok(())
}
