//! Slicing — shaving the left and right spines of the trie.

use std::rc::Rc;

use crate::bits::{radix, BITS_PER_LEVEL};
use crate::owner::Owner;
use crate::vector::node::{branch, position, VecNode};

/// Keeps the first `new_size` elements of the subtree (`new_size ≥ 1`).
///
/// Children wholly past the boundary are dropped; the boundary child is
/// trimmed recursively. A regular branch stays regular (its prefix
/// children are untouched); a partially covered branch gets a recomputed
/// size table from [`branch`].
pub(crate) fn trim_right<T: Clone>(
    node: &Rc<VecNode<T>>,
    shift: u32,
    new_size: usize,
    owner: &Owner,
) -> Rc<VecNode<T>> {
    debug_assert!(new_size >= 1);
    match &**node {
        VecNode::Leaf { elems, .. } => {
            if new_size == elems.len() {
                return Rc::clone(node);
            }
            Rc::new(VecNode::Leaf {
                owner: owner.id(),
                elems: elems[..new_size].to_vec(),
            })
        }
        VecNode::Branch {
            children, sizes, ..
        } => {
            if new_size == node.size(shift) {
                return Rc::clone(node);
            }
            let last_index = new_size - 1;
            let (slot, child_start) = locate(children, sizes, shift, last_index);
            let boundary = trim_right(
                &children[slot],
                shift - BITS_PER_LEVEL,
                new_size - child_start,
                owner,
            );
            let mut kept: Vec<Rc<VecNode<T>>> = children[..slot].to_vec();
            kept.push(boundary);
            branch(owner, kept, shift)
        }
    }
}

/// Drops the first `drop` elements of the subtree (`drop < size`).
pub(crate) fn trim_left<T: Clone>(
    node: &Rc<VecNode<T>>,
    shift: u32,
    drop: usize,
    owner: &Owner,
) -> Rc<VecNode<T>> {
    if drop == 0 {
        return Rc::clone(node);
    }
    match &**node {
        VecNode::Leaf { elems, .. } => Rc::new(VecNode::Leaf {
            owner: owner.id(),
            elems: elems[drop..].to_vec(),
        }),
        VecNode::Branch {
            children, sizes, ..
        } => {
            let (slot, child_start) = locate(children, sizes, shift, drop);
            let boundary = trim_left(
                &children[slot],
                shift - BITS_PER_LEVEL,
                drop - child_start,
                owner,
            );
            let mut kept = Vec::with_capacity(children.len() - slot);
            kept.push(boundary);
            kept.extend(children[slot + 1..].iter().cloned());
            branch(owner, kept, shift)
        }
    }
}

/// Child slot containing `index`, and that child's starting element.
fn locate<T>(
    children: &[Rc<VecNode<T>>],
    sizes: &Option<Vec<usize>>,
    shift: u32,
    index: usize,
) -> (usize, usize) {
    match sizes {
        None => {
            let slot = radix(index, shift).min(children.len() - 1);
            (slot, slot << shift)
        }
        Some(sizes) => {
            let slot = position(sizes, index);
            let start = if slot > 0 { sizes[slot - 1] } else { 0 };
            (slot, start)
        }
    }
}
