use std::collections::HashMap;

use oix_types::ObjectId;

/// Hash substitution table.
///
/// Maps an object ID to the ID whose content should be served in its place.
/// Chains are followed to their end. A cyclic chain stops after as many
/// steps as there are redirects, or as soon as it returns to the start.
#[derive(Clone, Debug, Default)]
pub struct ReplaceMap {
    redirects: HashMap<ObjectId, ObjectId>,
}

impl ReplaceMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `replacement` whenever `original` is requested.
    pub fn insert(&mut self, original: ObjectId, replacement: ObjectId) {
        self.redirects.insert(original, replacement);
    }

    /// Drop a redirect. Returns the previous target, if any.
    pub fn remove(&mut self, original: &ObjectId) -> Option<ObjectId> {
        self.redirects.remove(original)
    }

    /// Number of redirects.
    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    /// Returns `true` if no redirects are registered.
    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }

    /// The ID whose content stands in for `id` (`id` itself when not redirected).
    pub fn resolve(&self, id: &ObjectId) -> ObjectId {
        let mut current = *id;
        // A chain can be at most as long as the map.
        for _ in 0..self.redirects.len() {
            match self.redirects.get(&current) {
                Some(next) if next != id => current = *next,
                _ => break,
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> ObjectId {
        ObjectId::from_hash([n; 32])
    }

    #[test]
    fn unmapped_ids_resolve_to_themselves() {
        let map = ReplaceMap::new();
        assert_eq!(map.resolve(&id(1)), id(1));
        assert!(map.is_empty());
    }

    #[test]
    fn follows_chains() {
        let mut map = ReplaceMap::new();
        map.insert(id(1), id(2));
        map.insert(id(2), id(3));
        assert_eq!(map.resolve(&id(1)), id(3));
        assert_eq!(map.resolve(&id(2)), id(3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn cycles_terminate() {
        let mut map = ReplaceMap::new();
        map.insert(id(1), id(2));
        map.insert(id(2), id(1));
        assert_eq!(map.resolve(&id(1)), id(2));
    }

    #[test]
    fn remove_restores_identity() {
        let mut map = ReplaceMap::new();
        map.insert(id(1), id(2));
        assert_eq!(map.remove(&id(1)), Some(id(2)));
        assert_eq!(map.resolve(&id(1)), id(1));
    }
}
