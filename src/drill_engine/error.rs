//! Error types for the drill engine.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can surface from the adapters around the drill core.
///
/// The partitioner and the session state machine themselves never fail on
/// learner input: malformed cells are dropped and bad selections re-prompt.
#[derive(Error, Debug)]
pub enum DrillError {
    /// A mastery threshold of zero would master every key before it is asked.
    #[error("Mastery threshold must be at least 1 (got {0})")]
    InvalidThreshold(u32),

    /// The edge quiz needs at least one edge to draw from.
    #[error("Edge scheme has no edges to quiz")]
    EmptyScheme,

    /// The group directory does not exist or is not a directory.
    #[error("Group directory not found: {}", .0.display())]
    MissingGroupDir(PathBuf),

    /// Two groups would be written to the same file.
    #[error("Groups {0} share the file name {1}; rename the sheet row or column")]
    GroupFileCollision(String, String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, DrillError>;
