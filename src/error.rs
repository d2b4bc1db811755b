//! Error taxonomy.
//!
//! Per-source failures ([`DocumentError`]) are logged and the source is skipped.
//! Aggregate failures ([`AggregateError`]) abort the run: an ambiguous reload
//! target would otherwise produce silently-wrong generated code.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("maximum nesting depth exceeded at `{at}`: {depth} > {max}")]
    DepthExceeded { at: String, depth: usize, max: usize },

    #[error("document root `{0}` collides with a class of the same name")]
    RootShadowed(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("mapping keys must be scalars")]
    UnsupportedKey,

    #[error("document is empty")]
    Empty,

    #[error("document root must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl DocumentError {
    /// Empty documents are informational, everything else is a warning.
    pub fn is_informational(&self) -> bool {
        matches!(self, DocumentError::Empty)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("aggregate lookup key `{key}` is shared by `{first}` and `{second}`")]
    NameCollision { key: String, first: String, second: String },

    #[error("top-level class `{0}` was produced by more than one document")]
    DuplicateTopLevel(String),

    #[error("manifest entry `{0}` is not in the class registry")]
    UnknownClass(String),
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("input path does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("input path is neither a file nor a directory: {}", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
