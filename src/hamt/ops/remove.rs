//! Removal operation — transient path edit with upward collapse.

use std::rc::Rc;

use crate::bits::{compact_index, fragment, mask, BITS_PER_LEVEL};
use crate::hamt::node::MapNode;
use crate::owner::Owner;

/// Outcome of a recursive remove.
pub(crate) enum RemoveOutcome<V> {
    /// Key was not found — subtree unchanged.
    NotFound,
    /// Key was removed; the slot holds the updated subtree.
    Removed(V),
    /// Key was removed and the subtree vanished; the caller must clear
    /// the slot's position.
    RemovedEmpty(V),
}

/// Removes `key` from the subtree in `slot`.
///
/// A branch left with a single leaf or collision child is replaced by
/// that child, merging it upward; a branch child is never collapsed, as
/// that would break the depth invariant for its hash prefix.
pub(crate) fn remove_in<K, V>(
    slot: &mut Rc<MapNode<K, V>>,
    owner: &Owner,
    hash: u32,
    key: &K,
    shift: u32,
) -> RemoveOutcome<V>
where
    K: Eq + Clone,
    V: Clone,
{
    match &**slot {
        MapNode::Leaf {
            hash: leaf_hash,
            key: leaf_key,
            value,
        } => {
            if *leaf_hash == hash && leaf_key == key {
                RemoveOutcome::RemovedEmpty(value.clone())
            } else {
                RemoveOutcome::NotFound
            }
        }
        MapNode::Collision {
            hash: node_hash,
            entries,
        } => {
            if *node_hash != hash {
                return RemoveOutcome::NotFound;
            }
            let Some(at) = entries.iter().position(|(k, _)| k == key) else {
                return RemoveOutcome::NotFound;
            };
            let value = entries[at].1.clone();
            if entries.len() == 2 {
                // A single survivor is a plain leaf again.
                let (k, v) = entries[1 - at].clone();
                *slot = Rc::new(MapNode::Leaf {
                    hash: *node_hash,
                    key: k,
                    value: v,
                });
            } else {
                let mut remaining = entries.clone();
                remaining.remove(at);
                *slot = Rc::new(MapNode::Collision {
                    hash: *node_hash,
                    entries: remaining,
                });
            }
            RemoveOutcome::Removed(value)
        }
        MapNode::Branch { bitmap, .. } => {
            let bit = mask(fragment(hash, shift));
            if bitmap & bit == 0 {
                return RemoveOutcome::NotFound;
            }
            let node = MapNode::edit(slot, owner);
            let MapNode::Branch {
                bitmap, children, ..
            } = node
            else {
                unreachable!("edit changed the node kind");
            };
            let pos = compact_index(*bitmap, bit);
            match remove_in(&mut children[pos], owner, hash, key, shift + BITS_PER_LEVEL) {
                RemoveOutcome::NotFound => RemoveOutcome::NotFound,
                RemoveOutcome::Removed(value) => {
                    collapse(slot);
                    RemoveOutcome::Removed(value)
                }
                RemoveOutcome::RemovedEmpty(value) => {
                    *bitmap &= !bit;
                    children.remove(pos);
                    if children.is_empty() {
                        return RemoveOutcome::RemovedEmpty(value);
                    }
                    collapse(slot);
                    RemoveOutcome::Removed(value)
                }
            }
        }
    }
}

/// Replaces a branch holding exactly one terminal child with that child.
fn collapse<K, V>(slot: &mut Rc<MapNode<K, V>>) {
    let only = match &**slot {
        MapNode::Branch { children, .. } if children.len() == 1 && children[0].is_terminal() => {
            Rc::clone(&children[0])
        }
        _ => return,
    };
    *slot = only;
}
