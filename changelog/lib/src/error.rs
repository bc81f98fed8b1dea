use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted at the boundaries of the changelog transform.
///
/// The transform passes themselves never fail: shapes they don't recognize
/// pass through untouched. Errors only come from the markdown codec, file
/// access, and transform configuration.
#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("Failed to parse markdown: {0}")]
    Parse(String),

    #[error("Failed to print markdown: {0}")]
    Print(String),

    #[error("Failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid transform config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for changelog operations.
pub type ChangelogResult<T> = Result<T, ChangelogError>;
