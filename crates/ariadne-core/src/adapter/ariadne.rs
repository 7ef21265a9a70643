//! Storage adapter backed by the Ariadne CMS.
//!
//! `AriadneAdapter` translates each storage verb into one or two CMS calls:
//! relative paths are joined onto the root, the node is resolved, the
//! matching action is invoked and the node is reshaped into [`Metadata`].

use crate::adapter::StorageAdapter;
use crate::cms::{Action, CmsClient};
use crate::config::{AdapterConfig, DEFAULT_MIMETYPE};
use crate::error::{AriadneError, Result};
use crate::metadata::{EntryType, FileContents, Metadata, StreamContents, Visibility};
use crate::node::{Node, NodeKind, PDIR, PFILE};
use crate::path;
use std::io::Read;
use tracing::{debug, warn};

/// Mimetype reported for directories.
pub const DIRECTORY_MIMETYPE: &str = "directory";

/// Storage adapter over a CMS client, rooted at one directory node.
///
/// # Examples
///
/// ```
/// use ariadne_core::adapter::{AriadneAdapter, StorageAdapter};
/// use ariadne_core::cms::MemoryCms;
///
/// # fn main() -> ariadne_core::Result<()> {
/// let adapter = AriadneAdapter::new(MemoryCms::new("nl"), "/")?;
/// adapter.write("docs/hello.txt", b"hello")?;
///
/// let file = adapter.read("docs/hello.txt")?;
/// assert_eq!(file.contents, b"hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AriadneAdapter<C: CmsClient> {
    cms: C,
    root_path: String,
    fallback_mimetype: String,
}

impl<C: CmsClient> AriadneAdapter<C> {
    /// Creates an adapter rooted at `root_path`.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::NotFound` if no node exists at the root and
    /// `AriadneError::NotADirectory` if the root is not a directory.
    pub fn new(cms: C, root_path: &str) -> Result<Self> {
        let root_path = path::make_path(root_path);
        match cms.get(&root_path)? {
            Some(root) if root.is_directory() => {}
            Some(_) => return Err(AriadneError::NotADirectory(root_path)),
            None => return Err(AriadneError::NotFound(root_path)),
        }

        debug!("adapter rooted at {}", root_path);
        Ok(Self {
            cms,
            root_path,
            fallback_mimetype: DEFAULT_MIMETYPE.to_string(),
        })
    }

    /// Creates an adapter from a configuration.
    pub fn from_config(cms: C, config: &AdapterConfig) -> Result<Self> {
        let mut adapter = Self::new(cms, &config.root_path)?;
        adapter.fallback_mimetype = config.fallback_mimetype.clone();
        Ok(adapter)
    }

    /// Returns the absolute CMS path the adapter is rooted at.
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Returns the underlying CMS client.
    pub fn cms(&self) -> &C {
        &self.cms
    }

    fn full_path(&self, path: &str) -> String {
        path::join(&self.root_path, path)
    }

    fn get_object(&self, path: &str) -> Result<Option<Node>> {
        self.cms.get(&self.full_path(path))
    }

    fn require(&self, path: &str) -> Result<Node> {
        self.get_object(path)?
            .ok_or_else(|| AriadneError::NotFound(path.to_string()))
    }

    /// Like `require`, but refuses the adapter root itself.
    fn require_below_root(&self, path: &str) -> Result<Node> {
        if self.full_path(path) == self.root_path {
            return Err(AriadneError::InvalidPath(format!(
                "{:?} addresses the adapter root",
                path
            )));
        }
        self.require(path)
    }

    fn normalize(&self, node: &Node) -> Metadata {
        let relative = path::strip_root(&self.root_path, &node.path);
        let file_path = relative.strip_suffix('/').unwrap_or(relative);

        let (entry_type, mimetype, reported_path) = match &node.kind {
            NodeKind::Directory => (EntryType::Dir, DIRECTORY_MIMETYPE.to_string(), relative),
            NodeKind::File => (
                EntryType::File,
                node.mimetype()
                    .unwrap_or(&self.fallback_mimetype)
                    .to_string(),
                file_path,
            ),
            NodeKind::Other(tag) => (EntryType::File, tag.clone(), file_path),
        };

        Metadata {
            path: reported_path.to_string(),
            basename: node.basename().to_string(),
            entry_type,
            mimetype,
            size: node.size,
            timestamp: node.mtime,
            // TODO: map CMS grants onto visibility once the permission model is exposed.
            visibility: Visibility::Public,
        }
    }

    fn new_child(&self, parent: &Node, node_type: &str, filename: &str) -> Result<()> {
        self.cms.call(
            &parent.path,
            &Action::New {
                node_type: node_type.to_string(),
                filename: filename.to_string(),
                nls: parent.default_nls.clone(),
                name: filename.to_string(),
            },
        )
    }

    fn write_with<F>(&self, path: &str, save: F) -> Result<Metadata>
    where
        F: FnOnce(&C, &str) -> Result<()>,
    {
        let result = self.try_write(path, save);
        if let Err(e) = &result {
            warn!("write to {} failed: {}", path, e);
        }
        result
    }

    fn try_write<F>(&self, path: &str, save: F) -> Result<Metadata>
    where
        F: FnOnce(&C, &str) -> Result<()>,
    {
        if let Some(node) = self.get_object(path)? {
            debug!("overwriting {}", node.path);
            save(&self.cms, &node.path)?;
            return self.get_metadata(path);
        }

        let normalized = path::make_path(path);
        let filename = path::basename(&normalized);
        if filename.is_empty() {
            return Err(AriadneError::InvalidPath(path.to_string()));
        }
        let dirname = path::dirname(&normalized);

        let missing_dirs = self.missing_dirs(dirname);
        let created = self.create_file(dirname, filename, &normalized, save);
        if created.is_err() {
            self.roll_back(&normalized, &missing_dirs);
        }
        created?;
        self.get_metadata(&normalized)
    }

    fn create_file<F>(
        &self,
        dirname: &str,
        filename: &str,
        normalized: &str,
        save: F,
    ) -> Result<()>
    where
        F: FnOnce(&C, &str) -> Result<()>,
    {
        if !self.has(dirname) {
            self.create_dir(dirname)?;
        }
        let parent = self.require(dirname)?;
        debug!("creating {} under {}", filename, parent.path);
        self.new_child(&parent, PFILE, filename)?;

        save(&self.cms, &self.full_path(normalized))
    }

    /// Relative paths of the directories along `dirname` that don't exist yet,
    /// outermost first.
    fn missing_dirs(&self, dirname: &str) -> Vec<String> {
        let mut current = String::new();
        let mut missing = Vec::new();
        for segment in path::segments(dirname) {
            current.push_str(segment);
            current.push('/');
            if !self.has(&current) {
                missing.push(current.clone());
            }
        }
        missing
    }

    /// Removes the file and directories a failed write created, innermost first.
    fn roll_back(&self, file: &str, created_dirs: &[String]) {
        let file = std::iter::once(file);
        for path in file.chain(created_dirs.iter().rev().map(String::as_str)) {
            let full = self.full_path(path);
            if !self.cms.exists(&full) {
                continue;
            }
            if let Err(e) = self.cms.call(&full, &Action::Delete) {
                warn!("failed to clean up {} after a failed write: {}", full, e);
            }
        }
    }

    fn collect_contents(
        &self,
        node_path: &str,
        recursive: bool,
        out: &mut Vec<Metadata>,
    ) -> Result<()> {
        for child in self.cms.ls(node_path)? {
            out.push(self.normalize(&child));
            if recursive && child.is_directory() {
                self.collect_contents(&child.path, recursive, out)?;
            }
        }
        Ok(())
    }
}

impl<C: CmsClient> StorageAdapter for AriadneAdapter<C> {
    fn has(&self, path: &str) -> bool {
        self.cms.exists(&self.full_path(path))
    }

    fn read(&self, path: &str) -> Result<FileContents> {
        let node = self.require(path)?;
        let contents = self.cms.get_file(&node.path)?;
        Ok(FileContents {
            metadata: self.normalize(&node),
            contents,
        })
    }

    fn read_stream(&self, path: &str) -> Result<StreamContents> {
        let node = self.require(path)?;
        let stream = self.cms.get_file_stream(&node.path)?;
        Ok(StreamContents {
            metadata: self.normalize(&node),
            stream,
        })
    }

    fn write(&self, path: &str, contents: &[u8]) -> Result<Metadata> {
        self.write_with(path, |cms, node_path| cms.save_file(node_path, contents))
    }

    fn write_stream(&self, path: &str, reader: &mut dyn Read) -> Result<Metadata> {
        self.write_with(path, |cms, node_path| cms.save_file_stream(node_path, reader))
    }

    fn copy(&self, path: &str, new_path: &str) -> Result<()> {
        let node = self.require(path)?;
        let target = self.full_path(new_path);
        debug!("copy {} -> {}", node.path, target);
        self.cms.call(&node.path, &Action::CopyTo { target })
    }

    fn rename(&self, path: &str, new_path: &str) -> Result<()> {
        let node = self.require_below_root(path)?;
        let target = self.full_path(new_path);
        debug!("rename {} -> {}", node.path, target);
        self.cms.call(&node.path, &Action::Rename { target })
    }

    fn delete(&self, path: &str) -> Result<()> {
        let node = self.require_below_root(path)?;
        debug!("delete {}", node.path);
        self.cms.call(&node.path, &Action::Delete)
    }

    fn delete_dir(&self, path: &str) -> Result<()> {
        let node = self.require_below_root(path)?;
        if !node.is_directory() {
            return Err(AriadneError::NotADirectory(path.to_string()));
        }
        debug!("delete directory {}", node.path);
        self.cms.call(&node.path, &Action::Delete)
    }

    fn create_dir(&self, path: &str) -> Result<Metadata> {
        let normalized = path::make_path(path);
        let mut current = String::new();

        for segment in path::segments(&normalized) {
            let parent = current.clone();
            current.push_str(segment);
            current.push('/');

            if !self.has(&current) {
                let parent_node = self.require(&parent)?;
                debug!("creating directory {} under {}", segment, parent_node.path);
                self.new_child(&parent_node, PDIR, segment)?;
            }
        }

        let metadata = self.get_metadata(&current)?;
        if !metadata.is_dir() {
            return Err(AriadneError::NotADirectory(path.to_string()));
        }
        Ok(metadata)
    }

    fn list_contents(&self, path: &str, recursive: bool) -> Result<Vec<Metadata>> {
        let Some(directory) = self.get_object(path)? else {
            return Ok(Vec::new());
        };

        let mut contents = Vec::new();
        self.collect_contents(&directory.path, recursive, &mut contents)?;
        Ok(contents)
    }

    fn get_metadata(&self, path: &str) -> Result<Metadata> {
        let node = self.require(path)?;
        Ok(self.normalize(&node))
    }

    fn set_visibility(&self, _path: &str, _visibility: Visibility) -> Result<Metadata> {
        Err(AriadneError::Unsupported("set_visibility"))
    }
}
