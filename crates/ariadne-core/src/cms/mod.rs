//! CMS collaborator side of the adapter.
//!
//! [`CmsClient`] is the object API the adapter drives; [`MemoryCms`] is an
//! in-memory implementation used by the tests and the CLI.

pub mod client;
pub mod memory;

pub use client::{Action, CmsClient};
pub use memory::{MemoryCms, Snapshot, SnapshotEntry};
