use serde::{Deserialize, Serialize};
use oix_crypto::ContentHasher;
use oix_types::{typename, ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};

/// A stored object: type code + serialized data + cached size.
///
/// `StoredObject` is the unit of storage. The type code is kept raw so that
/// objects written with an unrecognized code reach the reader unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The declared type code (see [`ObjectKind::code`]).
    pub type_code: u8,
    /// The serialized bytes of the object.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self::with_type_code(kind.code(), data)
    }

    /// Create a stored object with an arbitrary, possibly unknown, type code.
    pub fn with_type_code(type_code: u8, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self {
            type_code,
            data,
            size,
        }
    }

    /// The declared kind, if the type code is recognized.
    pub fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_code(self.type_code)
    }

    /// Name of the declared kind; `"unknown"` for codes without a name.
    pub fn kind_name(&self) -> &'static str {
        self.kind().and_then(typename).unwrap_or("unknown")
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::for_name(self.kind_name()).hash(&self.data)
    }
}

fn decode<'a, T: Deserialize<'a>>(data: &'a [u8]) -> StoreResult<T> {
    serde_json::from_slice(data).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn encode<T: Serialize>(kind: ObjectKind, value: &T) -> StoreResult<StoredObject> {
    let data = serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(StoredObject::new(kind, data))
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry or an object array entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (0o100644).
    Regular,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Subtree / directory (0o040000).
    Directory,
    /// No mode recorded (0o030000, a file type no filesystem uses).
    #[default]
    Invalid,
}

impl EntryMode {
    /// Octal mode value (for display/serialization).
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
            Self::Invalid => 0o030000,
        }
    }

    /// The kind of object an entry with this mode refers to.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Directory => ObjectKind::Tree,
            _ => ObjectKind::Blob,
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// A single entry in a tree record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory).
    pub mode: EntryMode,
    /// Entry name (filename or directory name).
    pub name: String,
    /// Content-addressed ID of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }
}

/// Directory listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Entries sorted by name.
    pub entries: Vec<TreeEntry>,
}

impl TreeRecord {
    /// Create a new tree record. Entries are sorted by name for deterministic hashing.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode(ObjectKind::Tree, self)
    }

    /// Decode from serialized tree content.
    pub fn decode(data: &[u8]) -> StoreResult<Self> {
        decode(data)
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// A commit: one root tree and zero or more parent commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub tree: ObjectId,
    #[serde(default)]
    pub parents: Vec<ObjectId>,
    pub author: String,
    pub message: String,
}

impl CommitRecord {
    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode(ObjectKind::Commit, self)
    }

    /// Decode from serialized commit content.
    pub fn decode(data: &[u8]) -> StoreResult<Self> {
        decode(data)
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// A named, annotated reference to another object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub target: ObjectId,
    pub target_kind: ObjectKind,
    pub name: String,
    #[serde(default)]
    pub message: String,
}

impl TagRecord {
    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        encode(ObjectKind::Tag, self)
    }

    /// Decode from serialized tag content.
    pub fn decode(data: &[u8]) -> StoreResult<Self> {
        decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_entries_sorted() {
        let tree = TreeRecord::new(vec![
            TreeEntry::new(EntryMode::Regular, "zebra.txt", ObjectId::null()),
            TreeEntry::new(EntryMode::Regular, "alpha.txt", ObjectId::null()),
            TreeEntry::new(EntryMode::Directory, "middle", ObjectId::null()),
        ]);
        assert_eq!(tree.entries[0].name, "alpha.txt");
        assert_eq!(tree.entries[1].name, "middle");
        assert_eq!(tree.entries[2].name, "zebra.txt");
    }

    #[test]
    fn tree_decodes_stored_bytes() {
        let tree = TreeRecord::new(vec![
            TreeEntry::new(EntryMode::Regular, "file.txt", ObjectId::from_bytes(b"content")),
            TreeEntry::new(EntryMode::Directory, "subdir", ObjectId::from_bytes(b"tree")),
        ]);
        let stored = tree.to_stored_object().unwrap();
        assert_eq!(stored.kind(), Some(ObjectKind::Tree));
        assert_eq!(TreeRecord::decode(&stored.data).unwrap(), tree);
    }

    #[test]
    fn commit_without_parents_field_decodes() {
        let tree = ObjectId::from_bytes(b"t");
        let json = format!(r#"{{"tree":"{}","author":"a","message":"m"}}"#, tree.to_hex());
        let commit = CommitRecord::decode(json.as_bytes()).unwrap();
        assert_eq!(commit.tree, tree);
        assert!(commit.parents.is_empty());
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let err = TagRecord::decode(b"not json").unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn entry_mode_displays_octal_bits() {
        assert_eq!(EntryMode::Regular.to_string(), "100644");
        assert_eq!(EntryMode::Executable.to_string(), "100755");
        assert_eq!(EntryMode::Directory.to_string(), "040000");
        assert_eq!(EntryMode::Invalid.mode_bits(), 0o030000);
    }

    #[test]
    fn entry_mode_defaults_to_invalid() {
        assert_eq!(EntryMode::default(), EntryMode::Invalid);
        assert_eq!(EntryMode::Invalid.to_string(), "030000");
    }

    #[test]
    fn directory_entries_refer_to_trees() {
        assert_eq!(EntryMode::Directory.object_kind(), ObjectKind::Tree);
        assert_eq!(EntryMode::Executable.object_kind(), ObjectKind::Blob);
    }

    #[test]
    fn stored_object_kind_names() {
        let blob = Blob::new(b"x".to_vec()).to_stored_object();
        assert_eq!(blob.kind_name(), "blob");
        assert_eq!(blob.size, 1);
        let odd = StoredObject::with_type_code(9, b"x".to_vec());
        assert_eq!(odd.kind(), None);
        assert_eq!(odd.kind_name(), "unknown");
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let data = b"same data".to_vec();
        let blob = StoredObject::new(ObjectKind::Blob, data.clone());
        let tree = StoredObject::new(ObjectKind::Tree, data);
        assert_ne!(blob.compute_id(), tree.compute_id());
    }
}
