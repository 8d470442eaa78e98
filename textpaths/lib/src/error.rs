use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by textpaths operations.
///
/// Matching and extraction never fail; every variant here comes from the
/// boundary with the filesystem or the tree-sitter front-end.
#[derive(Debug, Error)]
pub enum TextPathsError {
    #[error("Failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported language for `{path}`")]
    UnsupportedLanguage { path: PathBuf },

    #[error("Failed to parse `{path}`")]
    ParseFailed { path: PathBuf },

    #[error("Source unit `{name}` is not part of the source set")]
    UnitNotFound { name: String },

    #[error("No supported source files found in `{path}`")]
    NoSourceFiles { path: PathBuf },

    #[error("Ignore error: {0}")]
    Ignore(#[from] ignore::Error),
}
