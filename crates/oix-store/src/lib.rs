//! Content store for the object index.
//!
//! The registry never reads storage directly: it asks an [`ObjectStore`] for
//! `(content, declared type, size)` by hash and validates the result itself.
//! This crate defines that contract, an in-memory backend, the JSON content
//! records commits, trees and tags are encoded as, and the [`ReplaceMap`]
//! used to redirect one hash to another.
//!
//! # Object Records
//!
//! - [`Blob`] -- raw content
//! - [`TreeRecord`] -- directory listing mapping names to object references
//! - [`CommitRecord`] -- root tree, parents, author and message
//! - [`TagRecord`] -- named reference to another object
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. The store never interprets object contents -- it is a pure key-value store.
//! 3. Unknown type codes are stored and returned as-is; rejecting them is
//!    the reader's job.

pub mod error;
pub mod memory;
pub mod object;
pub mod replace;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, CommitRecord, EntryMode, StoredObject, TagRecord, TreeEntry, TreeRecord};
pub use replace::ReplaceMap;
pub use traits::ObjectStore;
