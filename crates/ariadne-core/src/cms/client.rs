//! CMS collaborator trait and action vocabulary.
//!
//! This module defines the `CmsClient` trait, the small slice of the
//! Ariadne object API the storage adapter consumes. Implementations can
//! talk to a real CMS or keep nodes in memory.

use crate::error::{AriadneError, Result};
use crate::node::Node;
use std::io::{Cursor, Read};

/// Action template that resolves a path to an object.
pub const GET_TEMPLATE: &str = "system.get.phtml";

/// Action template that creates a child object.
pub const NEW_TEMPLATE: &str = "system.new.phtml";

/// Action template that copies an object to a target path.
pub const COPY_TEMPLATE: &str = "system.copyto.phtml";

/// Action template that moves an object to a target path.
pub const RENAME_TEMPLATE: &str = "system.rename.phtml";

/// Action template that deletes an object.
pub const DELETE_TEMPLATE: &str = "system.delete.phtml";

/// An action invoked on a CMS node through `call`.
///
/// Each variant corresponds to one fixed action template of the CMS
/// protocol; the fields are that template's named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a child object (`arNewType`, `arNewFilename`, `<nls> => { name }`).
    New {
        /// Type tag of the new object (`pdir`, `pfile`, ...).
        node_type: String,
        /// Path segment of the new object.
        filename: String,
        /// Locale the name is recorded under.
        nls: String,
        /// Display name in that locale.
        name: String,
    },

    /// Copy the object (and its subtree) to `target`.
    CopyTo {
        /// Absolute destination path.
        target: String,
    },

    /// Move the object (and its subtree) to `target`.
    Rename {
        /// Absolute destination path.
        target: String,
    },

    /// Delete the object.
    Delete,
}

impl Action {
    /// Returns the CMS action template name.
    pub fn template(&self) -> &'static str {
        match self {
            Action::New { .. } => NEW_TEMPLATE,
            Action::CopyTo { .. } => COPY_TEMPLATE,
            Action::Rename { .. } => RENAME_TEMPLATE,
            Action::Delete => DELETE_TEMPLATE,
        }
    }
}

/// CMS collaborator trait.
///
/// All paths are absolute CMS paths; callers normalize them first.
pub trait CmsClient: Send + Sync {
    /// Resolves a path to a node.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when nothing exists at the path.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::Backend` if the CMS fails to answer.
    fn get(&self, path: &str) -> Result<Option<Node>>;

    /// Checks if a node exists at the path. Never fails.
    fn exists(&self, path: &str) -> bool;

    /// Invokes an action on the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if the node doesn't exist, or
    /// another variant describing why the CMS rejected the action.
    fn call(&self, path: &str, action: &Action) -> Result<()>;

    /// Lists the direct children of the node at `path`, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if the node doesn't exist.
    fn ls(&self, path: &str) -> Result<Vec<Node>>;

    /// Replaces the content of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if the node doesn't exist.
    fn save_file(&self, path: &str, contents: &[u8]) -> Result<()>;

    /// Returns the raw content of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if the node doesn't exist.
    fn get_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Returns a reader over the content of the node at `path`.
    ///
    /// The default implementation buffers through [`CmsClient::get_file`].
    fn get_file_stream(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let contents = self.get_file(path)?;
        Ok(Box::new(Cursor::new(contents)))
    }

    /// Replaces the content of the node at `path` from a reader.
    ///
    /// The default implementation buffers into [`CmsClient::save_file`].
    fn save_file_stream(&self, path: &str, reader: &mut dyn Read) -> Result<()> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|e| AriadneError::Backend(format!("failed to read upload stream: {}", e)))?;
        self.save_file(path, &buffer)
    }
}
