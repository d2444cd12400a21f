//! Tail incorporation and demotion — the spine walks behind push and pop.

use std::rc::Rc;

use crate::bits::{BITS_PER_LEVEL, WIDTH};
use crate::owner::Owner;
use crate::vector::node::{branch, VecNode};

/// `true` when the subtree can absorb one more leaf on its right spine.
pub(crate) fn has_room<T>(node: &VecNode<T>, shift: u32) -> bool {
    match node {
        VecNode::Leaf { .. } => false,
        VecNode::Branch { children, .. } => {
            if shift == BITS_PER_LEVEL {
                children.len() < WIDTH
            } else {
                children.len() < WIDTH
                    || children
                        .last()
                        .is_some_and(|last| has_room(last, shift - BITS_PER_LEVEL))
            }
        }
    }
}

/// Appends `leaf` as the new rightmost leaf of the subtree in `slot`.
///
/// Precondition: `has_room` returned `true`. Descends the right spine,
/// making each node editable, and keeps size tables in step. A regular
/// branch turns relaxed when the leaf lands after a non-full sibling.
pub(crate) fn push_leaf<T: Clone>(
    slot: &mut Rc<VecNode<T>>,
    shift: u32,
    owner: &Owner,
    leaf: Rc<VecNode<T>>,
    leaf_len: usize,
) {
    let node = VecNode::edit(slot, owner);
    let VecNode::Branch {
        children, sizes, ..
    } = node
    else {
        debug_assert!(false, "push_leaf reached a leaf");
        return;
    };

    let descend = shift > BITS_PER_LEVEL
        && children
            .last()
            .is_some_and(|last| has_room(last, shift - BITS_PER_LEVEL));

    if descend {
        let last = children.len() - 1;
        push_leaf(&mut children[last], shift - BITS_PER_LEVEL, owner, leaf, leaf_len);
        if let Some(sizes) = sizes {
            if let Some(total) = sizes.last_mut() {
                *total += leaf_len;
            }
        }
        return;
    }

    // Append a new child at this level.
    let child_shift = shift - BITS_PER_LEVEL;
    let prev_last_full = children
        .last()
        .is_some_and(|last| last.is_full(child_shift));
    let child = if child_shift == 0 {
        leaf
    } else {
        new_path(owner, child_shift, leaf)
    };

    match sizes {
        Some(sizes) => {
            let total = sizes.last().copied().unwrap_or(0);
            sizes.push(total + leaf_len);
        }
        None if !prev_last_full => {
            // The branch was regular only because the non-full child was
            // last; it no longer is, so materialise the size table.
            let mut total = 0;
            let mut table: Vec<usize> = children
                .iter()
                .map(|c| {
                    total += c.size(child_shift);
                    total
                })
                .collect();
            table.push(total + leaf_len);
            *sizes = Some(table);
        }
        None => {}
    }
    children.push(child);
}

/// Wraps `leaf` in a chain of single-child branches up to bit offset `shift`.
pub(crate) fn new_path<T>(owner: &Owner, shift: u32, leaf: Rc<VecNode<T>>) -> Rc<VecNode<T>> {
    if shift == 0 {
        return leaf;
    }
    let child = new_path(owner, shift - BITS_PER_LEVEL, leaf);
    Rc::new(VecNode::Branch {
        owner: owner.id(),
        children: vec![child],
        sizes: None,
    })
}

/// Removes and returns the rightmost leaf of the subtree in `slot`.
///
/// Empty branches left behind on the spine are pruned; size tables are
/// kept in step. When the root itself is a leaf its elements are taken
/// and an empty leaf remains.
pub(crate) fn pop_leaf<T: Clone>(slot: &mut Rc<VecNode<T>>, shift: u32, owner: &Owner) -> Vec<T> {
    let node = VecNode::edit(slot, owner);
    match node {
        VecNode::Leaf { elems, .. } => std::mem::take(elems),
        VecNode::Branch {
            children, sizes, ..
        } => {
            if shift == BITS_PER_LEVEL {
                let elems = match children.pop() {
                    Some(leaf) => take_leaf(leaf),
                    None => Vec::new(),
                };
                if let Some(sizes) = sizes {
                    sizes.pop();
                }
                return elems;
            }

            let Some(last) = children.last_mut() else {
                return Vec::new();
            };
            let elems = pop_leaf(last, shift - BITS_PER_LEVEL, owner);
            let drop_child = last.is_empty();
            if drop_child {
                children.pop();
            }
            if let Some(sizes) = sizes {
                if drop_child {
                    sizes.pop();
                } else if let Some(total) = sizes.last_mut() {
                    *total -= elems.len();
                }
            }
            elems
        }
    }
}

fn take_leaf<T: Clone>(leaf: Rc<VecNode<T>>) -> Vec<T> {
    let node = Rc::try_unwrap(leaf).unwrap_or_else(|shared| (*shared).clone());
    match node {
        VecNode::Leaf { elems, .. } => elems,
        VecNode::Branch { .. } => {
            debug_assert!(false, "leaf level held a branch");
            Vec::new()
        }
    }
}

/// Pushes a full-or-partial leaf under a (possibly too-short) root,
/// growing the root when the spine is saturated. Returns the new shift.
pub(crate) fn push_tail<T: Clone>(
    root: &mut Rc<VecNode<T>>,
    shift: u32,
    owner: &Owner,
    tree_count: usize,
    elems: Vec<T>,
) -> u32 {
    let leaf_len = elems.len();
    let leaf = Rc::new(VecNode::Leaf {
        owner: owner.id(),
        elems,
    });

    if tree_count == 0 {
        *root = leaf;
        return 0;
    }

    if shift == 0 {
        // Root is a single leaf; grow to a two-child branch.
        let children = vec![Rc::clone(root), leaf];
        *root = branch(owner, children, BITS_PER_LEVEL);
        return BITS_PER_LEVEL;
    }

    if has_room(root, shift) {
        push_leaf(root, shift, owner, leaf, leaf_len);
        return shift;
    }

    // Saturated: introduce a new root level.
    let path = new_path(owner, shift, leaf);
    let children = vec![Rc::clone(root), path];
    let new_shift = shift + BITS_PER_LEVEL;
    *root = branch(owner, children, new_shift);
    new_shift
}
