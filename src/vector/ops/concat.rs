//! Concatenation — spine zip with child-count rebalancing.
//!
//! Merging descends the right spine of the left tree and the left spine
//! of the right tree in lockstep. At each level the children around the
//! seam are repacked so every produced branch holds at least `WIDTH - 1`
//! children (except a bounded number of stragglers), which keeps lookup
//! depth logarithmic after arbitrary concatenation chains. Branches that
//! end up non-uniform carry size tables.

use std::rc::Rc;

use crate::bits::{BITS_PER_LEVEL, WIDTH};
use crate::owner::Owner;
use crate::vector::node::{branch, VecNode};

/// Slack tolerated before the seam is repacked.
const MAX_EXTRA: usize = 2;

/// Merges two tail-free trees into one, returning the root and its shift.
pub(crate) fn concat_sub<T: Clone>(
    left: &Rc<VecNode<T>>,
    left_shift: u32,
    right: &Rc<VecNode<T>>,
    right_shift: u32,
    owner: &Owner,
) -> (Rc<VecNode<T>>, u32) {
    let top = left_shift.max(right_shift);
    let mut merged = merge(left, left_shift, right, right_shift, owner);
    debug_assert!(matches!(merged.len(), 1 | 2));
    if merged.len() == 1 {
        (merged.remove(0), top)
    } else {
        let new_shift = top + BITS_PER_LEVEL;
        (branch(owner, merged, new_shift), new_shift)
    }
}

/// Merges two subtrees into one or two nodes at level `max(ls, rs)`.
fn merge<T: Clone>(
    left: &Rc<VecNode<T>>,
    ls: u32,
    right: &Rc<VecNode<T>>,
    rs: u32,
    owner: &Owner,
) -> Vec<Rc<VecNode<T>>> {
    if ls > rs {
        let VecNode::Branch { children, .. } = &**left else {
            unreachable!("branch level {ls} held a leaf");
        };
        let last = children.len() - 1;
        let middle = merge(&children[last], ls - BITS_PER_LEVEL, right, rs, owner);
        rebalance(&children[..last], middle, &[], ls, owner)
    } else if rs > ls {
        let VecNode::Branch { children, .. } = &**right else {
            unreachable!("branch level {rs} held a leaf");
        };
        let middle = merge(left, ls, &children[0], rs - BITS_PER_LEVEL, owner);
        rebalance(&[], middle, &children[1..], rs, owner)
    } else if ls == 0 {
        merge_leaves(left, right, owner)
    } else {
        let VecNode::Branch { children: lc, .. } = &**left else {
            unreachable!("branch level {ls} held a leaf");
        };
        let VecNode::Branch { children: rc, .. } = &**right else {
            unreachable!("branch level {rs} held a leaf");
        };
        let last = lc.len() - 1;
        let middle = merge(&lc[last], ls - BITS_PER_LEVEL, &rc[0], rs - BITS_PER_LEVEL, owner);
        rebalance(&lc[..last], middle, &rc[1..], ls, owner)
    }
}

fn merge_leaves<T: Clone>(
    left: &Rc<VecNode<T>>,
    right: &Rc<VecNode<T>>,
    owner: &Owner,
) -> Vec<Rc<VecNode<T>>> {
    let (VecNode::Leaf { elems: le, .. }, VecNode::Leaf { elems: re, .. }) = (&**left, &**right)
    else {
        unreachable!("leaf level held a branch");
    };
    if le.len() + re.len() <= WIDTH {
        let mut elems = Vec::with_capacity(le.len() + re.len());
        elems.extend(le.iter().cloned());
        elems.extend(re.iter().cloned());
        vec![Rc::new(VecNode::Leaf {
            owner: owner.id(),
            elems,
        })]
    } else {
        vec![Rc::clone(left), Rc::clone(right)]
    }
}

/// Repacks the seam children and groups them into one or two parents at
/// level `shift`.
fn rebalance<T: Clone>(
    prefix: &[Rc<VecNode<T>>],
    middle: Vec<Rc<VecNode<T>>>,
    suffix: &[Rc<VecNode<T>>],
    shift: u32,
    owner: &Owner,
) -> Vec<Rc<VecNode<T>>> {
    let mut all: Vec<Rc<VecNode<T>>> =
        Vec::with_capacity(prefix.len() + middle.len() + suffix.len());
    all.extend(prefix.iter().cloned());
    all.extend(middle);
    all.extend(suffix.iter().cloned());

    let lens: Vec<usize> = all.iter().map(|n| n.len()).collect();
    let packed = match create_plan(&lens) {
        None => all,
        Some(plan) => execute_plan(&all, &plan, shift, owner),
    };

    debug_assert!(packed.len() <= 2 * WIDTH);
    if packed.len() <= WIDTH {
        vec![branch(owner, packed, shift)]
    } else {
        let right = packed[WIDTH..].to_vec();
        let mut left = packed;
        left.truncate(WIDTH);
        vec![branch(owner, left, shift), branch(owner, right, shift)]
    }
}

/// Decides the post-merge child counts.
///
/// Returns `None` when the current arrangement is already within
/// `MAX_EXTRA` nodes of optimal. Otherwise dissolves under-full nodes
/// into their right neighbours until it is.
fn create_plan(lens: &[usize]) -> Option<Vec<usize>> {
    let total: usize = lens.iter().sum();
    let optimal = total.div_ceil(WIDTH);
    if lens.len() <= optimal + MAX_EXTRA {
        return None;
    }

    let mut plan = lens.to_vec();
    while plan.len() > optimal + MAX_EXTRA {
        let mut i = 0;
        while plan[i] >= WIDTH - 1 {
            i += 1;
        }
        // Shift the short node's contents into the following nodes.
        let mut remaining = plan[i];
        let mut j = i;
        while remaining > 0 {
            debug_assert!(j + 1 < plan.len(), "seam repack ran off the end");
            let next = plan[j + 1];
            let merged = (remaining + next).min(WIDTH);
            plan[j] = merged;
            remaining = remaining + next - merged;
            j += 1;
        }
        plan.remove(j);
    }
    Some(plan)
}

/// Rebuilds the node list so node `k` holds exactly `plan[k]` items.
///
/// Items stream in order out of the old nodes; a node that already lines
/// up with the plan is reused untouched.
fn execute_plan<T: Clone>(
    all: &[Rc<VecNode<T>>],
    plan: &[usize],
    shift: u32,
    owner: &Owner,
) -> Vec<Rc<VecNode<T>>> {
    let child_shift = shift - BITS_PER_LEVEL;
    let mut out = Vec::with_capacity(plan.len());
    let mut node_idx = 0;
    let mut offset = 0;

    for &want in plan {
        if offset == 0 && all[node_idx].len() == want {
            out.push(Rc::clone(&all[node_idx]));
            node_idx += 1;
            continue;
        }
        if child_shift == 0 {
            // Repacking leaves: stream elements.
            let mut elems = Vec::with_capacity(want);
            while elems.len() < want {
                let VecNode::Leaf { elems: src, .. } = &*all[node_idx] else {
                    unreachable!("leaf level held a branch");
                };
                let take = (want - elems.len()).min(src.len() - offset);
                elems.extend(src[offset..offset + take].iter().cloned());
                offset += take;
                if offset == src.len() {
                    offset = 0;
                    node_idx += 1;
                }
            }
            out.push(Rc::new(VecNode::Leaf {
                owner: owner.id(),
                elems,
            }));
        } else {
            // Repacking branches: stream grandchildren.
            let mut children = Vec::with_capacity(want);
            while children.len() < want {
                let VecNode::Branch { children: src, .. } = &*all[node_idx] else {
                    unreachable!("branch level held a leaf");
                };
                let take = (want - children.len()).min(src.len() - offset);
                children.extend(src[offset..offset + take].iter().cloned());
                offset += take;
                if offset == src.len() {
                    offset = 0;
                    node_idx += 1;
                }
            }
            out.push(branch(owner, children, child_shift));
        }
    }
    out
}
