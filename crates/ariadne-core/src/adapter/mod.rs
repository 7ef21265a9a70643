//! Generic storage contract.
//!
//! This module defines the `StorageAdapter` trait, the path-oriented
//! filesystem vocabulary consumers program against. [`AriadneAdapter`]
//! implements it on top of a [`CmsClient`](crate::cms::CmsClient).
//!
//! Paths are slash-separated and relative to the adapter root. Absent
//! nodes are reported as `AriadneError::NotFound`, except for
//! [`StorageAdapter::has`], which returns `false`, and
//! [`StorageAdapter::list_contents`], which returns an empty list.

pub mod ariadne;

pub use ariadne::AriadneAdapter;

use crate::error::Result;
use crate::metadata::{FileContents, Metadata, StreamContents, Visibility};
use std::io::Read;

/// Storage adapter trait.
pub trait StorageAdapter: Send + Sync {
    /// Checks whether a file or directory exists. Never fails.
    fn has(&self, path: &str) -> bool;

    /// Reads a file.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if nothing exists at `path`.
    fn read(&self, path: &str) -> Result<FileContents>;

    /// Reads a file as a stream.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if nothing exists at `path`.
    fn read_stream(&self, path: &str) -> Result<StreamContents>;

    /// Writes a file, creating it and any missing parent directories.
    ///
    /// # Returns
    ///
    /// The metadata of the written file.
    ///
    /// # Errors
    ///
    /// Returns whatever error the CMS reported; nothing is raised past this
    /// call.
    fn write(&self, path: &str, contents: &[u8]) -> Result<Metadata>;

    /// Writes a file from a reader. Same semantics as [`StorageAdapter::write`].
    fn write_stream(&self, path: &str, reader: &mut dyn Read) -> Result<Metadata>;

    /// Updates a file. Same semantics as [`StorageAdapter::write`].
    fn update(&self, path: &str, contents: &[u8]) -> Result<Metadata> {
        self.write(path, contents)
    }

    /// Updates a file from a reader. Same semantics as [`StorageAdapter::write_stream`].
    fn update_stream(&self, path: &str, reader: &mut dyn Read) -> Result<Metadata> {
        self.write_stream(path, reader)
    }

    /// Copies a file or directory to `new_path`.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if the source doesn't exist.
    fn copy(&self, path: &str, new_path: &str) -> Result<()>;

    /// Moves a file or directory to `new_path`.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if the source doesn't exist.
    fn rename(&self, path: &str, new_path: &str) -> Result<()>;

    /// Deletes a file.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if nothing exists at `path`.
    fn delete(&self, path: &str) -> Result<()>;

    /// Deletes a directory. Children are not removed first.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if nothing exists at `path` and
    /// `AriadneError::NotADirectory` if the node is not a directory.
    fn delete_dir(&self, path: &str) -> Result<()>;

    /// Creates a directory and every missing ancestor. Idempotent.
    ///
    /// # Returns
    ///
    /// The metadata of the directory.
    fn create_dir(&self, path: &str) -> Result<Metadata>;

    /// Lists the contents of a directory.
    ///
    /// With `recursive`, nested entries follow their parent directory.
    /// An absent directory yields an empty list.
    fn list_contents(&self, path: &str, recursive: bool) -> Result<Vec<Metadata>>;

    /// Returns all metadata of a file or directory.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if nothing exists at `path`.
    fn get_metadata(&self, path: &str) -> Result<Metadata>;

    /// Returns the metadata record carrying the mimetype.
    fn get_mimetype(&self, path: &str) -> Result<Metadata> {
        self.get_metadata(path)
    }

    /// Returns the metadata record carrying the size.
    fn get_size(&self, path: &str) -> Result<Metadata> {
        self.get_metadata(path)
    }

    /// Returns the metadata record carrying the timestamp.
    fn get_timestamp(&self, path: &str) -> Result<Metadata> {
        self.get_metadata(path)
    }

    /// Returns the metadata record carrying the visibility.
    fn get_visibility(&self, path: &str) -> Result<Metadata> {
        self.get_metadata(path)
    }

    /// Sets the visibility of a file.
    fn set_visibility(&self, path: &str, visibility: Visibility) -> Result<Metadata>;
}
