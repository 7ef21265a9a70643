//! Error types for Ariadne storage operations.
//!
//! This module defines every failure the adapter and the CMS collaborator
//! can report. Errors use `thiserror` and carry the CMS path they concern
//! where one exists.

use std::path::PathBuf;
use thiserror::Error;

/// Error types for Ariadne storage operations.
///
/// Each variant represents a specific failure mode. Adapter operations
/// never panic; every failure coming out of the CMS is returned as one of
/// these variants.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AriadneError {
    // Node errors
    /// No node exists at the given path.
    #[error("node not found: {0}")]
    NotFound(String),

    /// The node at the given path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// A node already exists at the given path.
    #[error("node already exists: {0}")]
    AlreadyExists(String),

    /// The node still has children and cannot be removed.
    #[error("node has children: {0}")]
    HasChildren(String),

    /// The parent of the target path does not exist.
    #[error("parent node not found: {0}")]
    ParentNotFound(String),

    /// Invalid path provided.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    // Contract errors
    /// Operation is part of the storage contract but not supported here.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// The CMS rejected or failed an action.
    #[error("cms backend error: {0}")]
    Backend(String),

    // Config errors
    /// Error parsing configuration file.
    #[error("config parse error: {0}")]
    ConfigParseError(String),

    /// Configuration file not found at the expected location.
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    // Store errors
    /// Snapshot file could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    SnapshotError(String),

    // IO and system errors
    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AriadneError {
    /// Returns `true` if this error means the addressed node is absent.
    ///
    /// This is the condition the storage contract reports as a plain
    /// `false`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AriadneError::NotFound(_))
    }
}

/// Result type alias for Ariadne operations.
pub type Result<T> = std::result::Result<T, AriadneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_predicate() {
        assert!(AriadneError::NotFound("/a/".into()).is_not_found());
        assert!(!AriadneError::NotADirectory("/a/".into()).is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = AriadneError::Unsupported("set_visibility");
        assert_eq!(err.to_string(), "unsupported operation: set_visibility");
    }
}
