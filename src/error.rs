//! Error types for restyle.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for migration runs.
#[derive(Error, Debug)]
pub enum RestyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("Cannot resolve pattern '{pattern}': {path}: {source}")]
    PatternRoot {
        pattern: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    Encoding { path: PathBuf },

    #[error("Rule {index} produces text matched by rule {earlier}; reorder or narrow the rules")]
    RuleOrder { index: usize, earlier: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for migration operations.
pub type Result<T> = std::result::Result<T, RestyleError>;
