//! Lookup operation — traverses the trie to find a key.

use crate::bits::{compact_index, fragment, mask, BITS_PER_LEVEL};
use crate::hamt::node::MapNode;

/// Searches for `key` in the subtree rooted at `node`.
pub(crate) fn get_in<'a, K: Eq, V>(
    node: &'a MapNode<K, V>,
    hash: u32,
    key: &K,
    shift: u32,
) -> Option<&'a V> {
    match node {
        MapNode::Leaf {
            hash: leaf_hash,
            key: leaf_key,
            value,
        } => {
            if *leaf_hash == hash && leaf_key == key {
                Some(value)
            } else {
                None
            }
        }
        MapNode::Collision {
            hash: node_hash,
            entries,
        } => {
            if *node_hash != hash {
                return None;
            }
            entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
        }
        MapNode::Branch {
            bitmap, children, ..
        } => {
            let bit = mask(fragment(hash, shift));
            if bitmap & bit == 0 {
                return None;
            }
            let child = &children[compact_index(*bitmap, bit)];
            get_in(child, hash, key, shift + BITS_PER_LEVEL)
        }
    }
}
