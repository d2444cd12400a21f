//! Persistent unordered map — a bitmap-compressed hash-array-mapped trie.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::hash;
use crate::owner::Owner;

pub(crate) mod node;
mod ops;

mod iter;
pub use iter::Iter;

use node::MapNode;
use ops::remove::RemoveOutcome;

/// A persistent hash map with transient (owner-stamped) editing.
///
/// Keys hash to 32 bits consumed five bits per level; full-hash
/// collisions fall into linear buckets. Cloning is O(1) and shares
/// structure; mutations copy at most one path of branches per call, and
/// none that already carry the active [`Owner`].
pub struct Hamt<K, V> {
    size: usize,
    root: Option<Rc<MapNode<K, V>>>,
}

impl<K, V> Clone for Hamt<K, V> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            root: self.root.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> Hamt<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            size: 0,
            root: None,
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns an iterator over `(&K, &V)` pairs, in unspecified order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_ref())
    }

    /// `true` when both maps share the same root object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> Hamt<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let root = self.root.as_ref()?;
        ops::get::get_in(root, hash::hash_one(key), key, 0)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq + Clone, V: Clone + PartialEq
// ---------------------------------------------------------------------------

impl<K, V> Hamt<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    /// Inserts a key-value pair.
    ///
    /// Returns `None` if the key was new, or the previous value if it was
    /// replaced. When the stored value already equals `value` the trie is
    /// left untouched — the root keeps its identity.
    pub fn insert(&mut self, owner: &Owner, key: K, value: V) -> Option<V> {
        if let Some(current) = self.get(&key) {
            if *current == value {
                return Some(value);
            }
        }
        let hash = hash::hash_one(&key);
        match &mut self.root {
            Some(root) => {
                let replaced = ops::insert::insert_in(root, owner, hash, key, value, 0);
                if replaced.is_none() {
                    self.size += 1;
                }
                replaced
            }
            None => {
                self.root = Some(Rc::new(MapNode::Leaf { hash, key, value }));
                self.size = 1;
                None
            }
        }
    }

    /// Removes a key. Returns the removed value, or `None` if the key was
    /// not present (in which case the trie keeps its identity).
    pub fn remove(&mut self, owner: &Owner, key: &K) -> Option<V> {
        if !self.contains_key(key) {
            return None;
        }
        let root = self.root.as_mut()?;
        let hash = hash::hash_one(key);
        match ops::remove::remove_in(root, owner, hash, key, 0) {
            RemoveOutcome::NotFound => None,
            RemoveOutcome::Removed(value) => {
                self.size -= 1;
                Some(value)
            }
            RemoveOutcome::RemovedEmpty(value) => {
                self.root = None;
                self.size -= 1;
                Some(value)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Default for Hamt<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Hamt<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hamt")
            .field("len", &self.size)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for Hamt<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let owner = Owner::new();
        for (k, v) in iter {
            self.insert(&owner, k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Hamt<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> PartialEq for Hamt<K, V>
where
    K: Hash + Eq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<'a, K, V> IntoIterator for &'a Hamt<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
