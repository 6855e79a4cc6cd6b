//! In-memory object index for the content store.
//!
//! The registry gives every content hash exactly one in-process identity.
//! Objects may be registered as placeholders before their content is known
//! and are materialized later, when content arrives, by a kind-specific
//! parser.
//!
//! # Key Types
//!
//! - [`HashTable`] -- Multi-probe cuckoo hash table of object back-references
//! - [`ObjectRegistry`] -- Object arena, lookup, placeholder creation, parse dispatch
//! - [`Object`] / [`ObjectHandle`] -- An indexed object and its identity
//! - [`ObjectArray`] -- Ordered `(object, name, mode)` entries with a dedup pass
//! - [`ObjectList`] -- Prepend-only list of objects with shared tails
//!
//! # Design Rules
//!
//! 1. At most one object exists per hash for the registry's lifetime.
//! 2. An object's kind changes at most once, from `None` to a concrete kind.
//! 3. Objects are never removed; handles stay valid for the registry's lifetime.
//! 4. Table growth never fails and is never visible to callers.
//!
//! The registry is single-threaded. Callers that share one across threads
//! must serialize access themselves.

pub mod array;
pub mod config;
pub mod error;
pub mod list;
pub mod object;
mod parse;
pub mod registry;
pub mod table;

pub use array::{ObjectArray, ObjectArrayEntry};
pub use config::RegistryConfig;
pub use error::{ParseFailure, ParseResult, RegistryError, RegistryResult};
pub use list::ObjectList;
pub use object::{CommitData, Object, ObjectHandle, Payload, TagData, TreeData, TreeItem};
pub use registry::{BufferDisposition, ObjectRegistry};
pub use table::{HashSource, HashTable, Placement, TableStats};
