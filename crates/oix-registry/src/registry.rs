//! The object registry: one identity per hash, lazy kind resolution, and
//! dispatch of fetched content to kind-specific parsers.

use oix_crypto::IntegrityCheck;
use oix_store::{ObjectStore, ReplaceMap};
use oix_types::{ObjectId, ObjectKind};
use tracing::{debug, error, warn};

use crate::config::RegistryConfig;
use crate::error::{ParseFailure, ParseResult, RegistryError, RegistryResult};
use crate::object::{Object, ObjectHandle, Payload};
use crate::table::{HashTable, TableStats};

/// What became of a content buffer handed to a parser.
#[derive(Debug, PartialEq, Eq)]
pub enum BufferDisposition {
    /// The object kept the buffer as its backing storage.
    Consumed,
    /// The parser only validated the buffer and hands it back.
    NotConsumed(Vec<u8>),
}

impl BufferDisposition {
    /// Returns `true` if the object took ownership of the buffer.
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Arena of objects indexed by content hash.
///
/// Objects are created on first reference and live as long as the registry.
/// The hash table is allocated on the first insertion.
pub struct ObjectRegistry {
    objects: Vec<Object>,
    table: HashTable,
    replacements: ReplaceMap,
}

impl std::fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRegistry")
            .field("objects", &self.objects.len())
            .field("table", &self.table.stats())
            .field("replacements", &self.replacements.len())
            .finish()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::build(&RegistryConfig::default())
    }

    /// Create an empty registry after validating `config`.
    pub fn with_config(config: &RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &RegistryConfig) -> Self {
        Self {
            objects: Vec::new(),
            table: HashTable::new(config.probe_count),
            replacements: ReplaceMap::new(),
        }
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The object behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was issued by a different registry and is out of range.
    pub fn get(&self, handle: ObjectHandle) -> &Object {
        &self.objects[handle.index()]
    }

    /// Mutable access for graph walks (`used`, `flags`).
    pub fn get_mut(&mut self, handle: ObjectHandle) -> &mut Object {
        &mut self.objects[handle.index()]
    }

    /// All objects in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &Object)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, obj)| (ObjectHandle::new(i), obj))
    }

    /// The underlying hash table.
    pub fn table(&self) -> &HashTable {
        &self.table
    }

    /// Table counters.
    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Clear `mask` from every object's flags.
    pub fn clear_flags(&mut self, mask: u32) {
        for obj in &mut self.objects {
            obj.flags &= !mask;
        }
    }

    /// Hash substitutions applied by [`resolve_from_store`](Self::resolve_from_store).
    pub fn replacements(&self) -> &ReplaceMap {
        &self.replacements
    }

    /// Replace the hash substitution table.
    pub fn set_replacements(&mut self, replacements: ReplaceMap) {
        self.replacements = replacements;
    }

    // ---------------------------------------------------------------
    // Lookup and registration
    // ---------------------------------------------------------------

    /// Find the object registered for `id`.
    pub fn lookup(&self, id: &ObjectId) -> Option<ObjectHandle> {
        self.table.lookup(id, self.objects.as_slice())
    }

    /// The object for `id`, registering a placeholder if there is none.
    pub fn lookup_or_create_placeholder(&mut self, id: ObjectId) -> ObjectHandle {
        match self.lookup(&id) {
            Some(handle) => handle,
            None => {
                debug!(id = %id.short_hex(), "registered placeholder");
                self.insert(Object::placeholder(id))
            }
        }
    }

    /// The object for `id` as an object of `kind`.
    ///
    /// Creates the object with that kind if it is missing and resolves a
    /// placeholder to `kind`. Fails if the object already has another kind.
    pub fn lookup_typed(&mut self, id: ObjectId, kind: ObjectKind) -> ParseResult<ObjectHandle> {
        let Some(handle) = self.lookup(&id) else {
            return Ok(self.insert(Object::new(id, kind)));
        };
        let obj = &mut self.objects[handle.index()];
        if obj.is_placeholder() {
            obj.resolve_kind(kind);
        } else if kind.is_concrete() && obj.kind() != kind {
            return Err(ParseFailure::KindMismatch {
                id,
                existing: obj.kind(),
                requested: kind,
            });
        }
        Ok(handle)
    }

    /// Register a new object with a known kind and, optionally, content.
    ///
    /// A non-empty `payload` marks the object parsed. Registering a hash that
    /// is already present fails instead of creating a second identity.
    pub fn register_new(
        &mut self,
        id: ObjectId,
        kind: ObjectKind,
        payload: Payload,
    ) -> RegistryResult<ObjectHandle> {
        if self.lookup(&id).is_some() {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        if !payload.is_empty() && payload.kind() != kind {
            return Err(RegistryError::PayloadMismatch { id, kind });
        }
        let mut obj = Object::new(id, kind);
        if !payload.is_empty() {
            obj.materialize(payload);
        }
        Ok(self.insert(obj))
    }

    fn insert(&mut self, obj: Object) -> ObjectHandle {
        let handle = ObjectHandle::new(self.objects.len());
        self.objects.push(obj);
        self.table.insert_or_grow(handle, self.objects.as_slice());
        handle
    }

    // ---------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------

    /// Materialize `handle` from `buffer`, declared as `type_code`.
    ///
    /// On success a placeholder takes the declared kind. Commits and trees
    /// may keep the buffer; otherwise it is handed back. Unknown codes and
    /// kind mismatches leave the object untouched.
    pub fn dispatch_parse(
        &mut self,
        handle: ObjectHandle,
        type_code: u8,
        buffer: Vec<u8>,
    ) -> ParseResult<BufferDisposition> {
        let id = *self.get(handle).id();
        let declared =
            ObjectKind::from_code(type_code).ok_or_else(|| unknown_kind(id, type_code))?;
        let current = self.get(handle).kind();
        if current.is_concrete() && current != declared {
            return Err(ParseFailure::KindMismatch {
                id,
                existing: current,
                requested: declared,
            });
        }

        if !declared.is_concrete() {
            return Err(unknown_kind(id, type_code));
        }

        // Typed before parsing so content that names the object itself sees
        // the declared kind.
        let obj = &mut self.objects[handle.index()];
        let was_placeholder = obj.is_placeholder();
        obj.resolve_kind(declared);

        let result = match declared {
            ObjectKind::Commit => self.parse_commit(handle, buffer),
            ObjectKind::Tree => self.parse_tree(handle, buffer),
            ObjectKind::Blob => Ok(self.parse_blob(handle, buffer)),
            ObjectKind::Tag => self.parse_tag(handle, buffer),
            ObjectKind::None => Err(unknown_kind(id, type_code)),
        };
        if result.is_err() && was_placeholder {
            self.objects[handle.index()].revert_to_placeholder();
        }
        result
    }

    /// Materialize the object for `id` from `buffer`, registering it first
    /// if needed. Unknown type codes are rejected before anything is registered.
    pub fn parse_buffer(
        &mut self,
        id: ObjectId,
        type_code: u8,
        buffer: Vec<u8>,
    ) -> ParseResult<(ObjectHandle, BufferDisposition)> {
        if !ObjectKind::from_code(type_code).is_some_and(ObjectKind::is_concrete) {
            return Err(unknown_kind(id, type_code));
        }
        let handle = self.lookup_or_create_placeholder(id);
        let disposition = self.dispatch_parse(handle, type_code, buffer)?;
        Ok((handle, disposition))
    }

    /// Fetch, verify, and materialize the object for `id`.
    ///
    /// The fetch and the integrity check use the replacement target of `id`;
    /// the resulting object is still registered under `id`. Content that
    /// fails verification is dropped and nothing is registered.
    pub fn resolve_from_store(
        &mut self,
        id: &ObjectId,
        store: &dyn ObjectStore,
        verifier: &dyn IntegrityCheck,
    ) -> ParseResult<ObjectHandle> {
        if let Some(handle) = self.lookup(id) {
            if self.get(handle).is_parsed() {
                return Ok(handle);
            }
        }

        let target = self.replacements.resolve(id);
        let stored = store.fetch(&target)?;
        if !verifier.verify(&target, &stored.data, stored.kind_name()) {
            error!(id = %target, kind = stored.kind_name(), "hash mismatch");
            return Err(ParseFailure::HashMismatch(target));
        }

        // A buffer the parser hands back is released here.
        let (handle, _disposition) = self.parse_buffer(*id, stored.type_code, stored.data)?;
        Ok(handle)
    }
}

fn unknown_kind(id: ObjectId, type_code: u8) -> ParseFailure {
    warn!(id = %id, type_code, "object has unknown type id");
    ParseFailure::UnknownKind { id, type_code }
}
