//! Growable array of named object references.

use oix_store::EntryMode;

use crate::object::ObjectHandle;

/// One array entry. The object is referenced, not owned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectArrayEntry {
    pub object: ObjectHandle,
    pub name: String,
    pub mode: EntryMode,
}

/// Ordered `(object, name, mode)` entries, as collected by revision walks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectArray {
    entries: Vec<ObjectArrayEntry>,
}

impl ObjectArray {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the array has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Allocated capacity.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// The entry at `index`.
    pub fn get(&self, index: usize) -> Option<&ObjectArrayEntry> {
        self.entries.get(index)
    }

    /// All entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ObjectArrayEntry> {
        self.entries.iter()
    }

    /// Remove every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append an entry with no mode ([`EntryMode::Invalid`]).
    pub fn append(&mut self, object: ObjectHandle, name: impl Into<String>) {
        self.append_with_mode(object, name, EntryMode::Invalid);
    }

    /// Append an entry. A full array grows to `(capacity + 32) * 2` first.
    pub fn append_with_mode(&mut self, object: ObjectHandle, name: impl Into<String>, mode: EntryMode) {
        let len = self.entries.len();
        let capacity = self.entries.capacity();
        if len >= capacity {
            self.entries.reserve_exact((capacity + 32) * 2 - len);
        }
        self.entries.push(ObjectArrayEntry {
            object,
            name: name.into(),
            mode,
        });
    }

    /// Drop entries whose name repeats that of an earlier kept entry.
    ///
    /// Each kept entry in turn serves as the reference: every entry after it
    /// with the same name is removed, and the survivors are shifted left in
    /// order before the next reference is taken.
    pub fn remove_duplicates(&mut self) {
        let mut reference = 0;
        while reference + 1 < self.entries.len() {
            let mut dst = reference + 1;
            for src in reference + 1..self.entries.len() {
                if self.entries[src].name == self.entries[reference].name {
                    continue;
                }
                if src != dst {
                    self.entries.swap(src, dst);
                }
                dst += 1;
            }
            self.entries.truncate(dst);
            reference += 1;
        }
    }
}

impl<'a> IntoIterator for &'a ObjectArray {
    type Item = &'a ObjectArrayEntry;
    type IntoIter = std::slice::Iter<'a, ObjectArrayEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
