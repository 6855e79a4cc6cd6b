//! Foundation types for the object index (OIX).
//!
//! Every other OIX crate depends on `oix-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (32-byte hash)
//! - [`ObjectKind`] -- Commit, tree, blob, tag, or the `None` placeholder kind
//! - [`typename`] / [`kind_from_name`] -- The fixed kind <-> name mapping

pub mod error;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use kind::{kind_from_name, typename, ObjectKind};
pub use object::ObjectId;
