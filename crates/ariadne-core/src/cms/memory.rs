//! In-memory CMS implementation.
//!
//! `MemoryCms` keeps an Ariadne-like node tree in memory and can persist
//! it as a JSON snapshot. Tests use it directly; the CLI loads and saves
//! it from a store file.

use crate::cms::client::{Action, CmsClient, GET_TEMPLATE};
use crate::error::{AriadneError, Result};
use crate::node::{NlsFields, Node, NodeKind};
use crate::path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// In-memory CMS.
///
/// Nodes are keyed by their normalized absolute path. Clones share the same
/// tree, so a test can hand one clone to an adapter and inspect another.
///
/// # Examples
///
/// ```
/// use ariadne_core::cms::{CmsClient, MemoryCms};
///
/// let cms = MemoryCms::new("nl");
/// assert!(cms.exists("/"));
/// assert!(cms.ls("/").unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryCms {
    root: String,
    state: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    nodes: BTreeMap<String, Node>,
    contents: BTreeMap<String, Vec<u8>>,
}

/// Serializable image of a `MemoryCms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Path of the store root.
    pub root: String,

    /// Every node, root included, in path order.
    pub nodes: Vec<SnapshotEntry>,
}

/// One node of a snapshot with its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// The node itself.
    pub node: Node,

    /// Raw content (empty for directories).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<u8>,
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl MemoryCms {
    /// Creates a store whose root `pdir` lives at `/`.
    pub fn new(default_nls: &str) -> Self {
        Self::with_root("/", default_nls)
    }

    /// Creates a store whose root `pdir` lives at `root`.
    pub fn with_root(root: &str, default_nls: &str) -> Self {
        let root = path::make_path(root);
        let mut node = Node::new(&root, NodeKind::Directory, default_nls)
            .with_nls(default_nls, NlsFields::named(path::basename(&root)));
        node.mtime = now();

        let mut state = StoreState::default();
        state.nodes.insert(root.clone(), node);

        Self {
            root,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Returns the path of the store root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Inserts or replaces a node with the given content.
    ///
    /// The parent must already exist. `size` is taken from `contents` for
    /// files.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::ParentNotFound` if the parent is missing.
    pub fn insert_node(&self, mut node: Node, contents: Vec<u8>) -> Result<()> {
        node.path = path::make_path(&node.path);
        let mut state = self.state();
        if node.path != self.root {
            let parent = parent_path(&node.path);
            if !state.nodes.contains_key(&parent) {
                return Err(AriadneError::ParentNotFound(parent));
            }
        }

        if !node.is_directory() {
            node.size = contents.len() as u64;
        }
        debug!("insert {} ({})", node.path, node.kind);
        state.contents.insert(node.path.clone(), contents);
        state.nodes.insert(node.path.clone(), node);
        Ok(())
    }

    /// Returns the number of nodes in the store, root included.
    pub fn len(&self) -> usize {
        self.state().nodes.len()
    }

    /// Returns `true` if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Captures the whole tree.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state();
        let nodes = state
            .nodes
            .values()
            .map(|node| SnapshotEntry {
                node: node.clone(),
                contents: state.contents.get(&node.path).cloned().unwrap_or_default(),
            })
            .collect();

        Snapshot {
            root: self.root.clone(),
            nodes,
        }
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::SnapshotError` if the root is missing or not a
    /// directory, or a node has no parent.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let root = path::make_path(&snapshot.root);
        let mut state = StoreState::default();
        for entry in snapshot.nodes {
            let mut node = entry.node;
            node.path = path::make_path(&node.path);
            state.contents.insert(node.path.clone(), entry.contents);
            state.nodes.insert(node.path.clone(), node);
        }

        match state.nodes.get(&root) {
            Some(node) if node.is_directory() => {}
            Some(_) => {
                return Err(AriadneError::SnapshotError(format!(
                    "root {} is not a directory",
                    root
                )));
            }
            None => {
                return Err(AriadneError::SnapshotError(format!(
                    "root {} missing from snapshot",
                    root
                )));
            }
        }

        if let Some(orphan) = state
            .nodes
            .keys()
            .filter(|p| **p != root)
            .find(|p| !p.starts_with(&root) || !state.nodes.contains_key(&parent_path(p)))
        {
            return Err(AriadneError::SnapshotError(format!(
                "node {} has no parent under {}",
                orphan, root
            )));
        }

        Ok(Self {
            root,
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Loads a store from a JSON snapshot file.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::Io` if the file cannot be read or
    /// `AriadneError::SnapshotError` if it is not a valid snapshot.
    pub fn load(file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file)?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .map_err(|e| AriadneError::SnapshotError(format!("{}: {}", file.display(), e)))?;
        debug!("loaded {} nodes from {}", snapshot.nodes.len(), file.display());
        Self::from_snapshot(snapshot)
    }

    /// Writes the store to a JSON snapshot file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::Io` if the file cannot be written.
    pub fn save(&self, file: &Path) -> Result<()> {
        if let Some(parent) = file.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| AriadneError::SnapshotError(e.to_string()))?;
        std::fs::write(file, json)?;
        debug!("saved store to {}", file.display());
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreState {
    fn children(&self, parent: &str) -> Vec<Node> {
        self.nodes
            .range(parent.to_string()..)
            .take_while(|(p, _)| p.starts_with(parent))
            .filter(|(p, _)| p.as_str() != parent && parent_path(p) == parent)
            .map(|(_, node)| node.clone())
            .collect()
    }

    fn subtree(&self, prefix: &str) -> Vec<String> {
        self.nodes
            .range(prefix.to_string()..)
            .take_while(|(p, _)| p.starts_with(prefix))
            .map(|(p, _)| p.clone())
            .collect()
    }

    fn check_target(&self, source: &str, target: &str) -> Result<()> {
        if target.starts_with(source) {
            return Err(AriadneError::InvalidPath(format!(
                "{} is inside {}",
                target, source
            )));
        }
        if self.nodes.contains_key(target) {
            return Err(AriadneError::AlreadyExists(target.to_string()));
        }
        let parent = parent_path(target);
        match self.nodes.get(&parent) {
            Some(node) if node.is_directory() => Ok(()),
            Some(_) => Err(AriadneError::NotADirectory(parent)),
            None => Err(AriadneError::ParentNotFound(parent)),
        }
    }

    fn copy_subtree(&mut self, source: &str, target: &str) {
        for old in self.subtree(source) {
            let new = format!("{}{}", target, &old[source.len()..]);
            if let Some(mut node) = self.nodes.get(&old).cloned() {
                node.path = new.clone();
                self.nodes.insert(new.clone(), node);
            }
            if let Some(contents) = self.contents.get(&old).cloned() {
                self.contents.insert(new, contents);
            }
        }
    }

    fn remove_subtree(&mut self, prefix: &str) {
        for old in self.subtree(prefix) {
            self.nodes.remove(&old);
            self.contents.remove(&old);
        }
    }
}

fn parent_path(p: &str) -> String {
    path::make_path(path::dirname(p))
}

/// Names still equal to the old path segment follow the node to its new
/// segment; edited display names are kept.
fn rename_display_name(node: &mut Node, old_basename: &str) {
    let new_basename = path::basename(&node.path).to_string();
    for fields in node.nls.values_mut() {
        if fields.name.as_deref() == Some(old_basename) {
            fields.name = Some(new_basename.clone());
        }
    }
}

impl CmsClient for MemoryCms {
    fn get(&self, path: &str) -> Result<Option<Node>> {
        let path = path::make_path(path);
        debug!("{} {}", GET_TEMPLATE, path);
        Ok(self.state().nodes.get(&path).cloned())
    }

    fn exists(&self, path: &str) -> bool {
        self.state().nodes.contains_key(&path::make_path(path))
    }

    fn call(&self, path: &str, action: &Action) -> Result<()> {
        let path = path::make_path(path);
        debug!("{} on {}", action.template(), path);

        let mut state = self.state();
        let Some(node) = state.nodes.get(&path).cloned() else {
            return Err(AriadneError::NotFound(path));
        };

        match action {
            Action::New {
                node_type,
                filename,
                nls,
                name,
            } => {
                if matches!(filename.as_str(), "" | "." | "..") || filename.contains('/') {
                    return Err(AriadneError::InvalidPath(filename.clone()));
                }
                if !node.is_directory() {
                    return Err(AriadneError::NotADirectory(path));
                }
                let child_path = format!("{}{}/", path, filename);
                if state.nodes.contains_key(&child_path) {
                    return Err(AriadneError::AlreadyExists(child_path));
                }

                let mut child = Node::new(
                    &child_path,
                    NodeKind::from_type_tag(node_type),
                    node.default_nls.clone(),
                )
                .with_nls(nls.clone(), NlsFields::named(name.clone()));
                child.mtime = now();

                state.contents.insert(child_path.clone(), Vec::new());
                state.nodes.insert(child_path, child);
                Ok(())
            }
            Action::CopyTo { target } => {
                let target = path::make_path(target);
                state.check_target(&path, &target)?;
                state.copy_subtree(&path, &target);
                Ok(())
            }
            Action::Rename { target } => {
                if path == self.root {
                    return Err(AriadneError::InvalidPath(
                        "the store root cannot be renamed".to_string(),
                    ));
                }
                let target = path::make_path(target);
                state.check_target(&path, &target)?;
                state.copy_subtree(&path, &target);
                state.remove_subtree(&path);
                if let Some(moved) = state.nodes.get_mut(&target) {
                    rename_display_name(moved, node.basename());
                }
                Ok(())
            }
            Action::Delete => {
                if path == self.root {
                    return Err(AriadneError::InvalidPath(
                        "the store root cannot be deleted".to_string(),
                    ));
                }
                if !state.children(&path).is_empty() {
                    return Err(AriadneError::HasChildren(path));
                }
                state.nodes.remove(&path);
                state.contents.remove(&path);
                Ok(())
            }
        }
    }

    fn ls(&self, path: &str) -> Result<Vec<Node>> {
        let path = path::make_path(path);
        let state = self.state();
        if !state.nodes.contains_key(&path) {
            return Err(AriadneError::NotFound(path));
        }
        Ok(state.children(&path))
    }

    fn save_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let path = path::make_path(path);
        debug!("SaveFile {} ({} bytes)", path, contents.len());

        let mut state = self.state();
        let Some(node) = state.nodes.get_mut(&path) else {
            return Err(AriadneError::NotFound(path));
        };
        if node.is_directory() {
            return Err(AriadneError::Backend(format!(
                "cannot save content on directory {}",
                path
            )));
        }
        node.size = contents.len() as u64;
        node.mtime = now();
        state.contents.insert(path, contents.to_vec());
        Ok(())
    }

    fn get_file(&self, path: &str) -> Result<Vec<u8>> {
        let path = path::make_path(path);
        debug!("GetFile {}", path);

        let state = self.state();
        match state.nodes.get(&path) {
            None => Err(AriadneError::NotFound(path)),
            Some(node) if node.is_directory() => Err(AriadneError::Backend(format!(
                "cannot read content of directory {}",
                path
            ))),
            Some(_) => Ok(state.contents.get(&path).cloned().unwrap_or_default()),
        }
    }
}
