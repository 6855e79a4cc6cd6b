//! Content hashing and integrity verification for the object index.
//!
//! Provides domain-separated BLAKE3 hashing keyed by object kind, and the
//! [`IntegrityCheck`] contract the registry uses to validate fetched content
//! before materializing an object.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod hasher;
pub mod integrity;

pub use hasher::ContentHasher;
pub use integrity::{DigestVerifier, IntegrityCheck};
