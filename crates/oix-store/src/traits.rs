use oix_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Content-addressed object store consumed by the registry.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same data and type code
///   always produce the same ID.
/// - The store never interprets object contents.
/// - Integrity checking is left to the caller: a store may hand back
///   content that does not hash to the requested ID.
pub trait ObjectStore {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed ID.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Fetch an object that must exist.
    ///
    /// Fails with [`StoreError::NotFound`] when the hash is unknown.
    fn fetch(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }
}
