//! Vector trie node types and structural helpers.

use std::rc::Rc;

use crate::bits::{BITS_PER_LEVEL, WIDTH};
use crate::owner::{Owner, NO_OWNER};

/// A node of the vector trie.
///
/// Two variants:
/// - [`Leaf`](Self::Leaf) — up to 32 elements, only ever at the bottom.
/// - [`Branch`](Self::Branch) — up to 32 children. A *regular* branch
///   (`sizes == None`) has every child full for its level except possibly
///   the last, so a child slot is a pure radix of the index. A *relaxed*
///   branch carries cumulative `sizes` and resolves a slot by probing.
///
/// `owner` is the transient stamp: a node whose stamp equals the active
/// [`Owner`] was created during the current edit session and may be
/// mutated in place.
pub(crate) enum VecNode<T> {
    /// Terminal node holding elements.
    Leaf {
        /// Transient stamp.
        owner: u64,
        /// The elements; `1..=32` inside a trie, `0..=32` as an empty root.
        elems: Vec<T>,
    },
    /// Interior node holding children one level down.
    Branch {
        /// Transient stamp.
        owner: u64,
        /// Children at bit offset `shift - 5`.
        children: Vec<Rc<VecNode<T>>>,
        /// Cumulative subtree sizes; `None` for regular branches.
        sizes: Option<Vec<usize>>,
    },
}

impl<T: Clone> Clone for VecNode<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf { owner, elems } => Self::Leaf {
                owner: *owner,
                elems: elems.clone(),
            },
            Self::Branch {
                owner,
                children,
                sizes,
            } => Self::Branch {
                owner: *owner,
                children: children.clone(),
                sizes: sizes.clone(),
            },
        }
    }
}

impl<T> VecNode<T> {
    /// A fresh empty leaf, the root of an empty vector.
    pub(crate) fn empty_leaf() -> Rc<Self> {
        Rc::new(Self::Leaf {
            owner: NO_OWNER,
            elems: Vec::new(),
        })
    }

    /// The transient stamp of this node.
    pub(crate) const fn owner(&self) -> u64 {
        match self {
            Self::Leaf { owner, .. } | Self::Branch { owner, .. } => *owner,
        }
    }

    fn set_owner(&mut self, id: u64) {
        match self {
            Self::Leaf { owner, .. } | Self::Branch { owner, .. } => *owner = id,
        }
    }

    /// Arity: element count for leaves, child count for branches.
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Leaf { elems, .. } => elems.len(),
            Self::Branch { children, .. } => children.len(),
        }
    }

    /// `true` when the node holds nothing (pruned-away subtree).
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements in the subtree rooted here.
    ///
    /// `shift` is this node's own bit offset (`0` for a leaf).
    pub(crate) fn size(&self, shift: u32) -> usize {
        match self {
            Self::Leaf { elems, .. } => elems.len(),
            Self::Branch {
                sizes: Some(sizes), ..
            } => sizes.last().copied().unwrap_or(0),
            Self::Branch {
                children,
                sizes: None,
                ..
            } => match children.last() {
                None => 0,
                Some(last) => {
                    ((children.len() - 1) << shift) + last.size(shift - BITS_PER_LEVEL)
                }
            },
        }
    }

    /// `true` when the subtree holds its full capacity for its level.
    pub(crate) fn is_full(&self, shift: u32) -> bool {
        match self {
            Self::Leaf { elems, .. } => elems.len() == WIDTH,
            Self::Branch { .. } => self.size(shift) == 1 << (shift + BITS_PER_LEVEL),
        }
    }
}

impl<T: Clone> VecNode<T> {
    /// Returns in-place mutable access to the node in `slot`.
    ///
    /// If the node is not stamped with the active owner, a clone is made,
    /// stamped, and swapped into the slot first — one copy per touched
    /// node per edit session. `Rc::make_mut` backs the access, so a node
    /// that somehow became shared mid-session is still copied rather than
    /// mutated through the alias.
    pub(crate) fn edit<'a>(slot: &'a mut Rc<Self>, owner: &Owner) -> &'a mut Self {
        if slot.owner() != owner.id() {
            let mut copy = (**slot).clone();
            copy.set_owner(owner.id());
            *slot = Rc::new(copy);
        }
        Rc::make_mut(slot)
    }
}

/// Builds a branch at bit offset `shift`, computing its size table.
///
/// The result is regular (no table) exactly when every child except the
/// last is full for the child level.
pub(crate) fn branch<T>(owner: &Owner, children: Vec<Rc<VecNode<T>>>, shift: u32) -> Rc<VecNode<T>> {
    debug_assert!(!children.is_empty());
    debug_assert!(children.len() <= WIDTH);
    let child_shift = shift - BITS_PER_LEVEL;
    let regular = children[..children.len() - 1]
        .iter()
        .all(|child| child.is_full(child_shift));
    let sizes = if regular {
        None
    } else {
        let mut total = 0;
        Some(
            children
                .iter()
                .map(|child| {
                    total += child.size(child_shift);
                    total
                })
                .collect(),
        )
    };
    Rc::new(VecNode::Branch {
        owner: owner.id(),
        children,
        sizes,
    })
}

/// Child slot holding `index` in a relaxed branch with cumulative `sizes`.
pub(crate) fn position(sizes: &[usize], index: usize) -> usize {
    debug_assert!(index < sizes.last().copied().unwrap_or(0));
    let mut slot = 0;
    while sizes[slot] <= index {
        slot += 1;
    }
    slot
}
