//! HAMT node types.

use std::rc::Rc;

use crate::owner::Owner;

/// A node of the hash trie.
///
/// Three variants:
/// - [`Leaf`](Self::Leaf) — a single entry with its precomputed hash.
/// - [`Collision`](Self::Collision) — two or more entries sharing the
///   entire 32-bit hash.
/// - [`Branch`](Self::Branch) — bitmap-compressed interior node; children
///   are stored packed in population-count order.
///
/// Only branches carry a transient stamp: leaves and collisions are small
/// and churn rarely, so they are replaced rather than edited (and carry
/// no owner).
pub(crate) enum MapNode<K, V> {
    /// A single entry.
    Leaf {
        /// Precomputed 32-bit hash of the key.
        hash: u32,
        /// The key.
        key: K,
        /// The value.
        value: V,
    },
    /// Entries sharing a full 32-bit hash.
    ///
    /// Invariant: `entries.len() >= 2`.
    Collision {
        /// The shared hash.
        hash: u32,
        /// The colliding entries.
        entries: Vec<(K, V)>,
    },
    /// Bitmap-compressed interior node.
    ///
    /// Invariant: `children.len() == bitmap.count_ones()`.
    Branch {
        /// Transient stamp.
        owner: u64,
        /// Occupied child positions.
        bitmap: u32,
        /// Children, packed in position order.
        children: Vec<Rc<MapNode<K, V>>>,
    },
}

impl<K: Clone, V: Clone> Clone for MapNode<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf { hash, key, value } => Self::Leaf {
                hash: *hash,
                key: key.clone(),
                value: value.clone(),
            },
            Self::Collision { hash, entries } => Self::Collision {
                hash: *hash,
                entries: entries.clone(),
            },
            Self::Branch {
                owner,
                bitmap,
                children,
            } => Self::Branch {
                owner: *owner,
                bitmap: *bitmap,
                children: children.clone(),
            },
        }
    }
}

impl<K, V> MapNode<K, V> {
    /// `true` for leaves and collisions — the kinds a shrinking branch
    /// may absorb in place of itself.
    pub(crate) const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Branch { .. })
    }
}

impl<K: Clone, V: Clone> MapNode<K, V> {
    /// Returns in-place mutable access to the branch in `slot`,
    /// cloning-and-stamping first unless it carries the active owner.
    pub(crate) fn edit<'a>(slot: &'a mut Rc<Self>, owner: &Owner) -> &'a mut Self {
        let stamped = match &**slot {
            Self::Branch { owner: o, .. } => *o == owner.id(),
            _ => false,
        };
        if !stamped {
            let mut copy = (**slot).clone();
            if let Self::Branch { owner: o, .. } = &mut copy {
                *o = owner.id();
            }
            *slot = Rc::new(copy);
        }
        Rc::make_mut(slot)
    }
}
