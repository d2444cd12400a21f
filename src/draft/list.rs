//! Root/nested draft over a list.

use std::collections::HashMap;
use std::rc::Rc;

use crate::draft::Draft;
use crate::error::IndexError;
use crate::owner::Owner;
use crate::value::Value;
use crate::vector::PVec;

/// Mutable façade over a [`Value::List`] during one produce call.
///
/// Direct writes go through the vector's transient operations; aggregate
/// children mutate through nested drafts handed out by
/// [`draft_at`](Self::draft_at).
#[derive(Debug)]
pub struct ListDraft {
    pub(crate) owner: Rc<Owner>,
    pub(crate) base: Rc<PVec<Value>>,
    pub(crate) work: PVec<Value>,
    pub(crate) modified: bool,
    pub(crate) children: HashMap<usize, Draft>,
}

impl ListDraft {
    pub(crate) fn new(base: &Rc<PVec<Value>>, owner: Rc<Owner>) -> Self {
        Self {
            owner,
            base: Rc::clone(base),
            work: (**base).clone(),
            modified: false,
            children: HashMap::new(),
        }
    }

    /// Current length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.work.len()
    }

    /// `true` when the list holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.work.is_empty()
    }

    /// The underlying element at `index`.
    ///
    /// An aggregate that has an outstanding nested draft reflects the
    /// draft's edits only after finalisation; mutate it through
    /// [`draft_at`](Self::draft_at).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.work.get(index).cloned()
    }

    /// Replaces the element at `index`, invalidating any nested draft
    /// cached for that slot.
    ///
    /// # Errors
    ///
    /// [`IndexError`] when `index` is not in `[0, len)`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), IndexError> {
        self.work.update(&self.owner, index, value)?;
        self.modified = true;
        self.children.remove(&index);
        Ok(())
    }

    /// Appends an element.
    pub fn push(&mut self, value: Value) {
        self.work.push(&self.owner, value);
        self.modified = true;
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<Value> {
        let value = self.work.pop(&self.owner)?;
        self.modified = true;
        self.children.remove(&self.work.len());
        Some(value)
    }

    /// The nested draft for the aggregate at `index`.
    ///
    /// Created lazily on first access and cached, so repeated calls hand
    /// back the same draft. `None` for scalars and out-of-range indices.
    pub fn draft_at(&mut self, index: usize) -> Option<&mut Draft> {
        if !self.children.contains_key(&index) {
            let child = self.work.get(index)?.clone();
            if !child.is_managed() {
                return None;
            }
            let draft = Draft::new(&child, Rc::clone(&self.owner));
            self.children.insert(index, draft);
        }
        self.children.get_mut(&index)
    }

    pub(crate) fn is_modified(&self) -> bool {
        self.modified || self.children.values().any(Draft::is_modified)
    }

    pub(crate) fn finalize(self) -> Value {
        let Self {
            owner,
            base,
            mut work,
            mut modified,
            children,
        } = self;
        for (index, child) in children {
            if child.is_modified() {
                let value = child.finalize();
                let stored = work.update(&owner, index, value);
                debug_assert!(stored.is_ok());
                modified = true;
            }
        }
        if modified {
            Value::List(Rc::new(work))
        } else {
            Value::List(base)
        }
    }
}
