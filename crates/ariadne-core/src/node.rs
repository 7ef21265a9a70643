//! CMS node model.
//!
//! A [`Node`] is the value the CMS collaborator hands back when a path is
//! resolved. The CMS's dynamic object (runtime type tag, locale-keyed data
//! bag) is flattened here once, so the adapter never inspects raw fields.

use crate::path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type tag Ariadne uses for directories.
pub const PDIR: &str = "pdir";

/// Type tag Ariadne uses for files.
pub const PFILE: &str = "pfile";

/// Kind of a CMS node, derived from its type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// A `pdir` node.
    Directory,

    /// A `pfile` node.
    File,

    /// Any other typed content record, with its type tag kept verbatim.
    Other(String),
}

impl NodeKind {
    /// Maps a CMS type tag onto a node kind.
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            PDIR => NodeKind::Directory,
            PFILE => NodeKind::File,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// Returns the CMS type tag for this kind.
    pub fn type_tag(&self) -> &str {
        match self {
            NodeKind::Directory => PDIR,
            NodeKind::File => PFILE,
            NodeKind::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::from_type_tag(&tag)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.type_tag().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Language-specific data of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlsFields {
    /// Display name in this locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Mimetype recorded for this locale (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

impl NlsFields {
    /// Creates locale data carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            mimetype: None,
        }
    }
}

/// A resolved CMS node.
///
/// The default locale is part of the value, so callers never re-derive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Absolute, normalized path (always ends with `/`).
    pub path: String,

    /// Kind derived from the type tag.
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Content size in bytes.
    pub size: u64,

    /// Modification time as unix seconds.
    pub mtime: i64,

    /// Locale whose data holds the canonical name and mimetype.
    pub default_nls: String,

    /// Per-locale data, keyed by locale code.
    #[serde(default)]
    pub nls: BTreeMap<String, NlsFields>,
}

impl Node {
    /// Creates a node with no locale data.
    pub fn new(path: &str, kind: NodeKind, default_nls: impl Into<String>) -> Self {
        Self {
            path: path::make_path(path),
            kind,
            size: 0,
            mtime: 0,
            default_nls: default_nls.into(),
            nls: BTreeMap::new(),
        }
    }

    /// Sets the data for one locale.
    pub fn with_nls(mut self, locale: impl Into<String>, fields: NlsFields) -> Self {
        self.nls.insert(locale.into(), fields);
        self
    }

    /// Returns `true` for `pdir` nodes.
    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Returns the data of the default locale, if the node has any.
    pub fn default_fields(&self) -> Option<&NlsFields> {
        self.nls.get(&self.default_nls)
    }

    /// Returns the default-locale name, falling back to the basename.
    pub fn name(&self) -> &str {
        self.default_fields()
            .and_then(|fields| fields.name.as_deref())
            .unwrap_or_else(|| self.basename())
    }

    /// Returns the default-locale mimetype, if one is recorded.
    pub fn mimetype(&self) -> Option<&str> {
        self.default_fields()
            .and_then(|fields| fields.mimetype.as_deref())
    }

    /// Returns the last segment of the node path.
    pub fn basename(&self) -> &str {
        path::basename(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type_tag() {
        assert_eq!(NodeKind::from_type_tag("pdir"), NodeKind::Directory);
        assert_eq!(NodeKind::from_type_tag("pfile"), NodeKind::File);
        assert_eq!(
            NodeKind::from_type_tag("ppage"),
            NodeKind::Other("ppage".to_string())
        );
        assert_eq!(NodeKind::Other("ppage".into()).type_tag(), "ppage");
    }

    #[test]
    fn test_default_locale_lookup() {
        let node = Node::new("/docs/a.txt", NodeKind::File, "nl")
            .with_nls(
                "nl",
                NlsFields {
                    name: Some("Bestand".into()),
                    mimetype: Some("text/plain".into()),
                },
            )
            .with_nls("en", NlsFields::named("File"));

        assert_eq!(node.path, "/docs/a.txt/");
        assert_eq!(node.name(), "Bestand");
        assert_eq!(node.mimetype(), Some("text/plain"));
    }

    #[test]
    fn test_name_falls_back_to_basename() {
        let node = Node::new("/docs/", NodeKind::Directory, "en");
        assert_eq!(node.name(), "docs");
        assert_eq!(node.mimetype(), None);
        assert!(node.is_directory());
    }

    #[test]
    fn test_kind_serializes_as_type_tag() {
        let node = Node::new("/x/", NodeKind::Other("pphoto".into()), "en");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"pphoto\""));

        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, NodeKind::Other("pphoto".into()));
    }
}
