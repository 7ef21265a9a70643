//! Ariadne Core - storage adapter for the Ariadne CMS.
//!
//! This crate lets code written against a generic, path-oriented storage
//! contract read and write `pdir`/`pfile` objects in Ariadne. It contains
//! the contract, the CMS collaborator interface, an in-memory CMS, and the
//! adapter translating between the two.
//!
//! # Architecture
//!
//! - [`error`]: Error types and result type alias
//! - [`config`]: Adapter configuration loaded from `.ariadne/config.toml`
//! - [`path`]: CMS path normalization and joining
//! - [`node`]: Resolved CMS nodes with their locale data
//! - [`metadata`]: Metadata records returned to storage consumers
//! - [`cms`]: The `CmsClient` trait and the in-memory `MemoryCms`
//! - [`adapter`]: The `StorageAdapter` trait and `AriadneAdapter`
//!
//! # Example
//!
//! ```rust
//! use ariadne_core::{AriadneAdapter, MemoryCms, StorageAdapter};
//!
//! let adapter = AriadneAdapter::new(MemoryCms::new("nl"), "/").unwrap();
//! adapter.create_dir("docs/drafts").unwrap();
//! adapter.write("docs/drafts/note.txt", b"hello").unwrap();
//!
//! let listing = adapter.list_contents("docs", true).unwrap();
//! assert_eq!(listing.len(), 2);
//! ```

pub mod adapter;
pub mod cms;
pub mod config;
pub mod error;
pub mod metadata;
pub mod node;
pub mod path;

// Re-export core types for convenience
pub use adapter::{AriadneAdapter, StorageAdapter};
pub use cms::{Action, CmsClient, MemoryCms};
pub use config::AdapterConfig;
pub use error::{AriadneError, Result};
pub use metadata::{EntryType, FileContents, Metadata, StreamContents, Visibility};
pub use node::{NlsFields, Node, NodeKind};
