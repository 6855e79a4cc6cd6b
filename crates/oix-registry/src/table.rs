//! Multi-probe cuckoo hash table of object back-references.
//!
//! Each hash maps to `probe_count` candidate slots: slot *i* is the hash's
//! *i*-th 32-bit word masked by `capacity - 1`. Capacity is always a power of
//! two. Lookups inspect at most `probe_count` slots regardless of load.
//!
//! Insertion places an object in the first empty candidate slot. When all
//! candidates are taken it evicts the occupant of the first candidate and
//! carries on with the evicted object, for a bounded number of rounds. An
//! insertion that runs out of rounds hands the still-unplaced object back
//! as [`Placement::NeedsReinsertion`]; [`HashTable::insert_or_grow`] then
//! grows the table and tries again.
//!
//! # Invariants
//!
//! - The table never owns objects; slots hold [`ObjectHandle`]s only.
//! - A rebuild is built off to the side and swapped in only once every
//!   occupant has been placed, so no handle is ever lost to a failed grow.

use oix_types::ObjectId;
use tracing::debug;

use crate::object::{Object, ObjectHandle};

/// Capacity of a table's first allocation.
const FIRST_CAPACITY: usize = 32;

/// Above this capacity the table doubles instead of growing eightfold.
const LARGE_CAPACITY: usize = 1024 * 1024;

/// Resolves a back-reference to the hash it is filed under.
pub trait HashSource {
    /// The hash of the object `handle` refers to.
    fn id_of(&self, handle: ObjectHandle) -> &ObjectId;
}

impl HashSource for [Object] {
    fn id_of(&self, handle: ObjectHandle) -> &ObjectId {
        self[handle.index()].id()
    }
}

/// Outcome of a single insertion attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Every object involved found a slot.
    Placed,
    /// The eviction chain ran out of rounds. The carried object (which may
    /// not be the one originally inserted) is not in the table.
    NeedsReinsertion(ObjectHandle),
}

/// Counters describing a table's history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Current number of slots.
    pub capacity: usize,
    /// Number of occupied slots.
    pub len: usize,
    /// Completed grows, including the first allocation.
    pub grows: u64,
    /// Rebuilds abandoned because an occupant could not be placed.
    pub rebuild_retries: u64,
    /// Occupants displaced by insertions and rebuilds.
    pub evictions: u64,
}

/// Next capacity in the growth schedule.
pub fn next_capacity(capacity: usize) -> usize {
    if capacity < FIRST_CAPACITY {
        FIRST_CAPACITY
    } else if capacity < LARGE_CAPACITY {
        capacity * 8
    } else {
        capacity * 2
    }
}

/// Multi-probe cuckoo hash table.
#[derive(Clone, Debug)]
pub struct HashTable {
    slots: Vec<Option<ObjectHandle>>,
    len: usize,
    probe_count: usize,
    grows: u64,
    rebuild_retries: u64,
    evictions: u64,
}

impl HashTable {
    /// Create an empty, unallocated table.
    ///
    /// # Panics
    ///
    /// Panics if `probe_count` is zero or larger than the number of words in
    /// an [`ObjectId`]. [`RegistryConfig::validate`](crate::RegistryConfig::validate)
    /// enforces the tighter supported range.
    pub fn new(probe_count: usize) -> Self {
        assert!(
            (1..=ObjectId::WORDS).contains(&probe_count),
            "probe_count {probe_count} out of range"
        );
        Self {
            slots: Vec::new(),
            len: 0,
            probe_count,
            grows: 0,
            rebuild_retries: 0,
            evictions: 0,
        }
    }

    /// Number of candidate slots per hash.
    pub fn probe_count(&self) -> usize {
        self.probe_count
    }

    /// Number of slots (zero before the first insertion).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of objects in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The occupant of slot `index`, if any. Out-of-range indices are empty.
    pub fn slot(&self, index: usize) -> Option<ObjectHandle> {
        self.slots.get(index).copied().flatten()
    }

    /// All occupants, in slot order.
    pub fn occupied(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Snapshot of the table's counters.
    pub fn stats(&self) -> TableStats {
        TableStats {
            capacity: self.capacity(),
            len: self.len,
            grows: self.grows,
            rebuild_retries: self.rebuild_retries,
            evictions: self.evictions,
        }
    }

    /// Find the object filed under `id`.
    pub fn lookup<S: HashSource + ?Sized>(&self, id: &ObjectId, ids: &S) -> Option<ObjectHandle> {
        if self.slots.is_empty() {
            return None;
        }
        let mask = self.slots.len() - 1;
        for i in 0..self.probe_count {
            if let Some(handle) = self.slots[id.word(i) as usize & mask] {
                if ids.id_of(handle) == id {
                    return Some(handle);
                }
            }
        }
        None
    }

    /// Make one attempt to insert `handle` without growing.
    ///
    /// An unallocated table places nothing and returns `handle` as-is.
    pub fn insert<S: HashSource + ?Sized>(&mut self, handle: ObjectHandle, ids: &S) -> Placement {
        let placement = place(
            &mut self.slots,
            self.probe_count,
            handle,
            ids,
            &mut self.evictions,
        );
        if placement == Placement::Placed {
            self.len += 1;
        }
        placement
    }

    /// Insert `handle`, growing the table as often as needed.
    pub fn insert_or_grow<S: HashSource + ?Sized>(&mut self, handle: ObjectHandle, ids: &S) {
        if self.slots.is_empty() {
            self.grow(ids);
        }
        let mut pending = handle;
        while let Placement::NeedsReinsertion(unplaced) = self.insert(pending, ids) {
            pending = unplaced;
            self.grow(ids);
        }
    }

    /// Rebuild the table at the next scheduled capacity.
    ///
    /// If some occupant cannot be placed, the new array is discarded and the
    /// capacity after it is tried. The live array is only replaced once every
    /// occupant has a slot.
    pub fn grow<S: HashSource + ?Sized>(&mut self, ids: &S) {
        let old_capacity = self.slots.len();
        let mut capacity = old_capacity;
        loop {
            capacity = next_capacity(capacity);
            let mut fresh = vec![None; capacity];
            let mut evictions = 0;
            let rebuilt = self.slots.iter().flatten().all(|&handle| {
                place(&mut fresh, self.probe_count, handle, ids, &mut evictions)
                    == Placement::Placed
            });
            self.evictions += evictions;
            if rebuilt {
                self.slots = fresh;
                self.grows += 1;
                debug!(
                    from = old_capacity,
                    to = capacity,
                    len = self.len,
                    "grew object table"
                );
                return;
            }
            self.rebuild_retries += 1;
            debug!(capacity, len = self.len, "object table rebuild failed; retrying larger");
        }
    }
}

/// Cuckoo placement into `slots`, which must be empty or a power of two long.
fn place<S: HashSource + ?Sized>(
    slots: &mut [Option<ObjectHandle>],
    probe_count: usize,
    handle: ObjectHandle,
    ids: &S,
    evictions: &mut u64,
) -> Placement {
    let capacity = slots.len();
    if capacity == 0 {
        return Placement::NeedsReinsertion(handle);
    }
    let mask = capacity - 1;
    let mut carried = handle;
    for _ in 0..=capacity - capacity / 8 {
        let id = ids.id_of(carried);
        let first = id.word(0) as usize & mask;
        for i in 0..probe_count {
            let ix = id.word(i) as usize & mask;
            if slots[ix].is_none() {
                slots[ix] = Some(carried);
                return Placement::Placed;
            }
        }
        match slots[first].replace(carried) {
            Some(evicted) => {
                *evictions += 1;
                carried = evicted;
            }
            None => return Placement::Placed,
        }
    }
    Placement::NeedsReinsertion(carried)
}
