//! Insertion-order index — a tombstoned slot log over a map.
//!
//! Attached to a map or set, the index assigns each first-seen key a
//! monotonically increasing slot. Iterating the slots reproduces
//! insertion order; removals tombstone their slot, and once more than
//! half the slots are dead the log is compacted.

use std::fmt;
use std::hash::Hash;

use crate::hamt::Hamt;
use crate::owner::Owner;
use crate::vector::PVec;

/// Slots below this are never worth compacting.
const COMPACT_MIN: usize = 32;

/// One position of the slot log.
#[derive(Clone)]
enum Slot<T> {
    Live(T),
    Tombstone,
}

/// Insertion order over a keyed collection.
///
/// `slot_to_val` is present only when the index shadows a map; a set
/// index tracks keys alone.
pub struct OrderIndex<K, V> {
    next: usize,
    holes: usize,
    key_to_slot: Hamt<K, usize>,
    slot_to_key: PVec<Slot<K>>,
    slot_to_val: Option<PVec<Slot<V>>>,
}

impl<K, V> Clone for OrderIndex<K, V> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            holes: self.holes,
            key_to_slot: self.key_to_slot.clone(),
            slot_to_key: self.slot_to_key.clone(),
            slot_to_val: self.slot_to_val.clone(),
        }
    }
}

impl<K, V> OrderIndex<K, V> {
    /// Creates an index tracking keys and values (for a map).
    #[must_use]
    pub fn with_values() -> Self {
        Self {
            next: 0,
            holes: 0,
            key_to_slot: Hamt::new(),
            slot_to_key: PVec::new(),
            slot_to_val: Some(PVec::new()),
        }
    }

    /// Creates an index tracking keys alone (for a set).
    #[must_use]
    pub fn keys_only() -> Self {
        Self {
            next: 0,
            holes: 0,
            key_to_slot: Hamt::new(),
            slot_to_key: PVec::new(),
            slot_to_val: None,
        }
    }

    /// Number of live slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.key_to_slot.len()
    }

    /// Returns `true` when no live slots remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_to_slot.is_empty()
    }
}

impl<K, V> OrderIndex<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Records an insertion or reassignment of `key`.
    ///
    /// A first-seen key is appended at the next slot; a reassigned key
    /// keeps its original slot (insertion order is first-insert order).
    pub fn record_insert(&mut self, owner: &Owner, key: K, value: Option<V>) {
        if let Some(&slot) = self.key_to_slot.get(&key) {
            if let (Some(vals), Some(value)) = (&mut self.slot_to_val, value) {
                let updated = vals.update(owner, slot, Slot::Live(value));
                debug_assert!(updated.is_ok());
            }
            return;
        }
        let slot = self.next;
        self.next += 1;
        self.key_to_slot.insert(owner, key.clone(), slot);
        self.slot_to_key.push(owner, Slot::Live(key));
        if let Some(vals) = &mut self.slot_to_val {
            match value {
                Some(value) => vals.push(owner, Slot::Live(value)),
                None => vals.push(owner, Slot::Tombstone),
            }
        }
    }

    /// Records a removal of `key`, tombstoning its slot.
    ///
    /// Compacts the log when more than half of the issued slots are dead
    /// (and enough slots exist for it to matter).
    pub fn record_remove(&mut self, owner: &Owner, key: &K) {
        let Some(slot) = self.key_to_slot.remove(owner, key) else {
            return;
        };
        let updated = self.slot_to_key.update(owner, slot, Slot::Tombstone);
        debug_assert!(updated.is_ok());
        if let Some(vals) = &mut self.slot_to_val {
            let updated = vals.update(owner, slot, Slot::Tombstone);
            debug_assert!(updated.is_ok());
        }
        self.holes += 1;
        if self.next > COMPACT_MIN && self.holes * 2 > self.next {
            self.compact(owner);
        }
    }

    /// Rebuilds the log with the holes squeezed out and slots renumbered.
    fn compact(&mut self, owner: &Owner) {
        let mut fresh = if self.slot_to_val.is_some() {
            Self::with_values()
        } else {
            Self::keys_only()
        };
        for (key, value) in self.entries() {
            fresh.record_insert(owner, key.clone(), value.cloned());
        }
        *self = fresh;
    }

    /// Live `(key, value)` pairs in slot order.
    ///
    /// The value side is `None` for a keys-only index.
    #[must_use]
    pub fn entries(&self) -> Vec<(&K, Option<&V>)> {
        let mut out = Vec::with_capacity(self.len());
        for (slot, key) in self.slot_to_key.iter().enumerate() {
            let Slot::Live(key) = key else {
                continue;
            };
            let value = self.slot_to_val.as_ref().and_then(|vals| {
                match vals.get(slot) {
                    Some(Slot::Live(v)) => Some(v),
                    _ => None,
                }
            });
            out.push((key, value));
        }
        out
    }

    /// Live keys in slot order.
    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }
}

impl<K, V> fmt::Debug for OrderIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderIndex")
            .field("len", &self.len())
            .field("slots", &self.next)
            .field("holes", &self.holes)
            .finish_non_exhaustive()
    }
}
