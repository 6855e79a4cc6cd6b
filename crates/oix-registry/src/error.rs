//! Error types for the registry crate.

use oix_store::StoreError;
use oix_types::{ObjectId, ObjectKind};

/// Failures while resolving or parsing an object's content.
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    /// Fetched content does not hash to the expected ID.
    #[error("hash mismatch {0}")]
    HashMismatch(ObjectId),

    /// The declared type code is not one of the known kinds.
    #[error("object {id} has unknown type id {type_code}")]
    UnknownKind { id: ObjectId, type_code: u8 },

    /// The object is already known under a different concrete kind.
    #[error("object {id} is a {existing}, not a {requested}")]
    KindMismatch {
        id: ObjectId,
        existing: ObjectKind,
        requested: ObjectKind,
    },

    /// The content could not be decoded as the declared kind.
    #[error("corrupt {kind} {id}: {reason}")]
    Corrupt {
        id: ObjectId,
        kind: ObjectKind,
        reason: String,
    },

    /// The content store failed (including unknown hashes).
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for parse results.
pub type ParseResult<T> = Result<T, ParseFailure>;

/// Errors from registry construction and registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An object with this ID already exists.
    #[error("object already registered: {0}")]
    AlreadyRegistered(ObjectId),

    /// The payload does not belong to the requested kind.
    #[error("payload does not match kind {kind} for {id}")]
    PayloadMismatch { id: ObjectId, kind: ObjectKind },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
