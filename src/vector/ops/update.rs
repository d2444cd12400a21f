//! Point update — transient path copy from root to leaf.

use std::rc::Rc;

use crate::bits::{radix, BITS_PER_LEVEL};
use crate::owner::Owner;
use crate::vector::node::{position, VecNode};

/// Replaces the element at `index` in the subtree in `slot`.
///
/// Every node on the path is made editable (cloned-and-stamped unless it
/// already carries the active owner) and then patched in place.
pub(crate) fn update_in<T: Clone>(
    slot: &mut Rc<VecNode<T>>,
    shift: u32,
    owner: &Owner,
    index: usize,
    value: T,
) {
    let node = VecNode::edit(slot, owner);
    match node {
        VecNode::Leaf { elems, .. } => elems[index] = value,
        VecNode::Branch {
            children,
            sizes: None,
            ..
        } => {
            let child = radix(index, shift);
            update_in(
                &mut children[child],
                shift - BITS_PER_LEVEL,
                owner,
                index - (child << shift),
                value,
            );
        }
        VecNode::Branch {
            children,
            sizes: Some(sizes),
            ..
        } => {
            let child = position(sizes, index);
            let sub_index = if child > 0 {
                index - sizes[child - 1]
            } else {
                index
            };
            update_in(
                &mut children[child],
                shift - BITS_PER_LEVEL,
                owner,
                sub_index,
                value,
            );
        }
    }
}
