//! Indexed objects and their type-specific payloads.

use oix_store::EntryMode;
use oix_types::{ObjectId, ObjectKind};

/// Identity of an object within one [`ObjectRegistry`](crate::ObjectRegistry).
///
/// Two handles from the same registry are equal exactly when they name the
/// same object. Handles index the registry's arena and are never reused.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    /// # Panics
    ///
    /// Panics if `index` does not fit in 32 bits.
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("object arena exceeds u32 handles"))
    }

    /// Position of the object in the registry's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A commit: its root tree, parent commits, and the retained raw buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitData {
    pub tree: ObjectHandle,
    pub parents: Vec<ObjectHandle>,
    pub author: String,
    pub message: String,
    /// The content the commit was parsed from, once handed over.
    pub buffer: Option<Vec<u8>>,
}

/// One resolved tree entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeItem {
    pub mode: EntryMode,
    pub name: String,
    pub object: ObjectHandle,
}

/// A tree: its entries and the buffer they were parsed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeData {
    pub entries: Vec<TreeItem>,
    pub buffer: Option<Vec<u8>>,
}

/// An annotated tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagData {
    pub target: ObjectHandle,
    pub target_kind: ObjectKind,
    pub name: String,
    pub message: String,
}

/// Type-specific data attached to an object once its content is known.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Payload {
    /// Nothing materialized yet.
    #[default]
    Empty,
    Commit(CommitData),
    Tree(TreeData),
    /// Blobs carry no structure.
    Blob,
    Tag(TagData),
}

impl Payload {
    /// The kind this payload belongs to; `None` for [`Payload::Empty`].
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Empty => ObjectKind::None,
            Self::Commit(_) => ObjectKind::Commit,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Blob => ObjectKind::Blob,
            Self::Tag(_) => ObjectKind::Tag,
        }
    }

    /// Returns `true` for [`Payload::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// An indexed object.
///
/// `id`, `kind`, `parsed` and the payload are owned by the registry and only
/// change through it. `used` and `flags` belong to graph-walking code; the
/// registry never reads them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    id: ObjectId,
    kind: ObjectKind,
    parsed: bool,
    /// Generic mark bit for graph walks.
    pub used: bool,
    /// Bits reserved for graph walks.
    pub flags: u32,
    payload: Payload,
}

impl Object {
    pub(crate) fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            kind,
            parsed: false,
            used: false,
            flags: 0,
            payload: Payload::Empty,
        }
    }

    pub(crate) fn placeholder(id: ObjectId) -> Self {
        Self::new(id, ObjectKind::None)
    }

    /// The object's content hash.
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// The object's kind; `ObjectKind::None` while it is a placeholder.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Returns `true` once content has been validated and attached.
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Returns `true` while the kind is still unknown.
    pub fn is_placeholder(&self) -> bool {
        self.kind == ObjectKind::None
    }

    /// Type-specific data.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Commit data, if this is a parsed commit.
    pub fn as_commit(&self) -> Option<&CommitData> {
        match &self.payload {
            Payload::Commit(c) => Some(c),
            _ => None,
        }
    }

    /// Tree data, if this is a parsed tree.
    pub fn as_tree(&self) -> Option<&TreeData> {
        match &self.payload {
            Payload::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// Tag data, if this is a parsed tag.
    pub fn as_tag(&self) -> Option<&TagData> {
        match &self.payload {
            Payload::Tag(t) => Some(t),
            _ => None,
        }
    }

    /// Give a placeholder its kind. Concrete kinds are never overwritten.
    pub(crate) fn resolve_kind(&mut self, kind: ObjectKind) {
        if self.kind == ObjectKind::None {
            self.kind = kind;
        }
    }

    /// Undo a kind given for a parse that then failed.
    pub(crate) fn revert_to_placeholder(&mut self) {
        debug_assert!(!self.parsed, "object {} reverted after parsing", self.id);
        self.kind = ObjectKind::None;
    }

    /// Attach materialized content and mark the object parsed.
    pub(crate) fn materialize(&mut self, payload: Payload) {
        debug_assert!(!self.parsed, "object {} parsed twice", self.id);
        self.payload = payload;
        self.parsed = true;
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }
}
