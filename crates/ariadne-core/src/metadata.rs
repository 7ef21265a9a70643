//! Metadata records returned by the storage contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// Entry type as seen by the storage contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A file (including typed content records).
    File,

    /// A directory.
    Dir,
}

/// Visibility of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Readable by everyone.
    #[default]
    Public,

    /// Restricted.
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// Normalized metadata of one entry.
///
/// Built fresh for every call from the resolved node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Path relative to the adapter root.
    pub path: String,

    /// Last path segment.
    pub basename: String,

    /// File or directory.
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Mimetype (`directory` for directories).
    pub mimetype: String,

    /// Size in bytes, as reported by the CMS.
    pub size: u64,

    /// Modification time as unix seconds.
    pub timestamp: i64,

    /// Always `public` until grants are mapped.
    pub visibility: Visibility,
}

impl Metadata {
    /// Returns `true` for directory entries.
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }

    /// Returns `true` for file entries.
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }
}

/// Result of a `read`: metadata plus the full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    /// Metadata of the file.
    pub metadata: Metadata,

    /// Raw contents.
    pub contents: Vec<u8>,
}

impl FileContents {
    /// Returns the contents as UTF-8 text, replacing invalid sequences.
    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }
}

/// Result of a `read_stream`: metadata plus a reader over the contents.
pub struct StreamContents {
    /// Metadata of the file.
    pub metadata: Metadata,

    /// Reader over the raw contents.
    pub stream: Box<dyn Read + Send>,
}

impl fmt::Debug for StreamContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamContents")
            .field("metadata", &self.metadata)
            .field("stream", &"Box<dyn Read + Send>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_wire_shape() {
        let meta = Metadata {
            path: "docs/a.txt".into(),
            basename: "a.txt".into(),
            entry_type: EntryType::File,
            mimetype: "text/plain".into(),
            size: 5,
            timestamp: 1_700_000_000,
            visibility: Visibility::Public,
        };

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["type"], "file");
        assert_eq!(value["visibility"], "public");
        assert_eq!(value["basename"], "a.txt");
        assert!(meta.is_file());
        assert!(!meta.is_dir());
    }
}
