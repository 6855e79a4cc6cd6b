//! Persistent singly-linked list of object references.
//!
//! Prepending allocates one node and shares the existing chain as its tail,
//! so every earlier list value stays valid and unchanged. Nodes are
//! reference-counted and the list is not `Send`.

use std::fmt;
use std::rc::Rc;

use crate::object::ObjectHandle;

struct Node {
    item: ObjectHandle,
    next: Option<Rc<Node>>,
}

/// Prepend-only list of objects.
#[derive(Clone, Default)]
pub struct ObjectList {
    head: Option<Rc<Node>>,
}

impl ObjectList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new list with `item` in front of this one.
    pub fn prepend(&self, item: ObjectHandle) -> ObjectList {
        ObjectList {
            head: Some(Rc::new(Node {
                item,
                next: self.head.clone(),
            })),
        }
    }

    /// Prepend in place; this value becomes the new head.
    pub fn push_front(&mut self, item: ObjectHandle) {
        *self = self.prepend(item);
    }

    /// Returns `true` if `item` (by identity) is on the list.
    pub fn contains(&self, item: ObjectHandle) -> bool {
        self.iter().any(|h| h == item)
    }

    /// The first object, if any.
    pub fn head(&self) -> Option<ObjectHandle> {
        self.head.as_ref().map(|node| node.item)
    }

    /// The list without its first node (shared, not copied).
    pub fn tail(&self) -> ObjectList {
        ObjectList {
            head: self.head.as_ref().and_then(|node| node.next.clone()),
        }
    }

    /// Returns `true` if the list has no nodes.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of nodes. Walks the whole chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Objects from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl Drop for ObjectList {
    // Unlink uniquely owned nodes one by one so long chains do not recurse.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for ObjectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ObjectList {
    type Item = ObjectHandle;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an [`ObjectList`].
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl Iterator for Iter<'_> {
    type Item = ObjectHandle;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            node.item
        })
    }
}
