//! Insertion operation — transient path edit with leaf splitting.

use std::rc::Rc;

use crate::bits::{compact_index, fragment, mask, BITS_PER_LEVEL, MAX_SHIFT};
use crate::hamt::node::MapNode;
use crate::owner::Owner;

/// Inserts `(key, value)` into the subtree in `slot`.
///
/// Branches along the path are edited transiently; leaves and collisions
/// are replaced wholesale. Returns the previous value when the key was
/// already present.
pub(crate) fn insert_in<K, V>(
    slot: &mut Rc<MapNode<K, V>>,
    owner: &Owner,
    hash: u32,
    key: K,
    value: V,
    shift: u32,
) -> Option<V>
where
    K: Eq + Clone,
    V: Clone,
{
    match &**slot {
        MapNode::Leaf {
            hash: leaf_hash,
            key: leaf_key,
            value: leaf_value,
        } => {
            if *leaf_hash == hash && leaf_key == &key {
                // Same key — replace the leaf.
                let old = leaf_value.clone();
                *slot = Rc::new(MapNode::Leaf { hash, key, value });
                return Some(old);
            }
            if *leaf_hash == hash {
                // Full 32-bit collision — promote to a collision node.
                let entries = vec![(leaf_key.clone(), leaf_value.clone()), (key, value)];
                *slot = Rc::new(MapNode::Collision { hash, entries });
                return None;
            }
            // Hashes diverge somewhere below — build the spine.
            let existing = Rc::clone(slot);
            let existing_hash = *leaf_hash;
            let leaf = Rc::new(MapNode::Leaf { hash, key, value });
            *slot = split(owner, existing, existing_hash, leaf, hash, shift);
            None
        }
        MapNode::Collision {
            hash: node_hash,
            entries,
        } => {
            if *node_hash != hash {
                let existing = Rc::clone(slot);
                let existing_hash = *node_hash;
                let leaf = Rc::new(MapNode::Leaf { hash, key, value });
                *slot = split(owner, existing, existing_hash, leaf, hash, shift);
                return None;
            }
            // Same full hash: replace or append within the bucket.
            let mut new_entries = entries.clone();
            let old = match new_entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
                None => {
                    new_entries.push((key, value));
                    None
                }
            };
            *slot = Rc::new(MapNode::Collision {
                hash,
                entries: new_entries,
            });
            old
        }
        MapNode::Branch { bitmap, .. } => {
            let bit = mask(fragment(hash, shift));
            let occupied = bitmap & bit != 0;
            let node = MapNode::edit(slot, owner);
            let MapNode::Branch {
                bitmap, children, ..
            } = node
            else {
                unreachable!("edit changed the node kind");
            };
            let pos = compact_index(*bitmap, bit);
            if occupied {
                insert_in(&mut children[pos], owner, hash, key, value, shift + BITS_PER_LEVEL)
            } else {
                *bitmap |= bit;
                children.insert(pos, Rc::new(MapNode::Leaf { hash, key, value }));
                None
            }
        }
    }
}

/// Builds the branch spine separating two nodes whose hashes first
/// diverge at or below `shift`.
fn split<K, V>(
    owner: &Owner,
    a: Rc<MapNode<K, V>>,
    a_hash: u32,
    b: Rc<MapNode<K, V>>,
    b_hash: u32,
    shift: u32,
) -> Rc<MapNode<K, V>> {
    debug_assert!(a_hash != b_hash);
    debug_assert!(shift <= MAX_SHIFT);
    let frag_a = fragment(a_hash, shift);
    let frag_b = fragment(b_hash, shift);
    if frag_a == frag_b {
        let child = split(owner, a, a_hash, b, b_hash, shift + BITS_PER_LEVEL);
        return Rc::new(MapNode::Branch {
            owner: owner.id(),
            bitmap: mask(frag_a),
            children: vec![child],
        });
    }
    let children = if frag_a < frag_b { vec![a, b] } else { vec![b, a] };
    Rc::new(MapNode::Branch {
        owner: owner.id(),
        bitmap: mask(frag_a) | mask(frag_b),
        children,
    })
}
