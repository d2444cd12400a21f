//! The draft engine — recipe-based immutable updates.
//!
//! [`produce`] wraps a base [`Value`] in a mutable [`Draft`], hands it to
//! a recipe exactly once, then finalises: every draft that observably
//! wrote is folded into a fresh persistent value; a draft that never
//! wrote yields the base back by identity. One [`Owner`] token per call
//! authorises in-place edits of every node created during the session.

use std::rc::Rc;

use crate::error::DraftError;
use crate::owner::Owner;
use crate::value::{Kind, Value};

mod list;
mod map;
mod record;

pub use list::ListDraft;
pub use map::{MapDraft, SetDraft};
pub use record::RecordDraft;

/// A mutable façade over a value, valid during one produce call.
///
/// The root draft is created by [`produce`]; nested drafts come from the
/// `draft_*` accessors of their parent and are cached per slot.
#[derive(Debug)]
pub struct Draft {
    node: DraftNode,
}

#[derive(Debug)]
enum DraftNode {
    /// Non-aggregate base: passed through, returned unchanged.
    Leaf(Value),
    List(ListDraft),
    Map(MapDraft),
    Set(SetDraft),
    Record(RecordDraft),
}

impl Draft {
    pub(crate) fn new(base: &Value, owner: Rc<Owner>) -> Self {
        let node = match base {
            Value::List(vec) => DraftNode::List(ListDraft::new(vec, owner)),
            Value::Map(core) => DraftNode::Map(MapDraft::new(core, owner)),
            Value::Set(core) => DraftNode::Set(SetDraft::new(core, owner)),
            Value::Record(record) => DraftNode::Record(RecordDraft::new(record, owner)),
            leaf => DraftNode::Leaf(leaf.clone()),
        };
        Self { node }
    }

    /// The kind of value this draft wraps.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match &self.node {
            DraftNode::Leaf(value) => value.kind(),
            DraftNode::List(_) => Kind::List,
            DraftNode::Map(_) => Kind::Map,
            DraftNode::Set(_) => Kind::Set,
            DraftNode::Record(_) => Kind::Record,
        }
    }

    /// The wrapped scalar, when the base is not an aggregate.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match &self.node {
            DraftNode::Leaf(value) => Some(value),
            _ => None,
        }
    }

    /// The list operations of this draft.
    ///
    /// # Errors
    ///
    /// [`DraftError::KindMismatch`] when the draft wraps another kind.
    pub fn as_list(&mut self) -> Result<&mut ListDraft, DraftError> {
        let found = self.kind();
        match &mut self.node {
            DraftNode::List(draft) => Ok(draft),
            _ => Err(DraftError::KindMismatch {
                expected: Kind::List,
                found,
            }),
        }
    }

    /// The map operations of this draft.
    ///
    /// # Errors
    ///
    /// [`DraftError::KindMismatch`] when the draft wraps another kind.
    pub fn as_map(&mut self) -> Result<&mut MapDraft, DraftError> {
        let found = self.kind();
        match &mut self.node {
            DraftNode::Map(draft) => Ok(draft),
            _ => Err(DraftError::KindMismatch {
                expected: Kind::Map,
                found,
            }),
        }
    }

    /// The set operations of this draft.
    ///
    /// # Errors
    ///
    /// [`DraftError::KindMismatch`] when the draft wraps another kind.
    pub fn as_set(&mut self) -> Result<&mut SetDraft, DraftError> {
        let found = self.kind();
        match &mut self.node {
            DraftNode::Set(draft) => Ok(draft),
            _ => Err(DraftError::KindMismatch {
                expected: Kind::Set,
                found,
            }),
        }
    }

    /// The record operations of this draft.
    ///
    /// # Errors
    ///
    /// [`DraftError::KindMismatch`] when the draft wraps another kind.
    pub fn as_record(&mut self) -> Result<&mut RecordDraft, DraftError> {
        let found = self.kind();
        match &mut self.node {
            DraftNode::Record(draft) => Ok(draft),
            _ => Err(DraftError::KindMismatch {
                expected: Kind::Record,
                found,
            }),
        }
    }

    /// The modification oracle: `true` when this draft wrote, or any
    /// cached nested draft did.
    pub(crate) fn is_modified(&self) -> bool {
        match &self.node {
            DraftNode::Leaf(_) => false,
            DraftNode::List(draft) => draft.is_modified(),
            DraftNode::Map(draft) => draft.is_modified(),
            DraftNode::Set(draft) => draft.is_modified(),
            DraftNode::Record(draft) => draft.is_modified(),
        }
    }

    /// Extraction: folds modified nested drafts in and produces the final
    /// value — the original base, by identity, when nothing changed.
    pub(crate) fn finalize(self) -> Value {
        match self.node {
            DraftNode::Leaf(value) => value,
            DraftNode::List(draft) => draft.finalize(),
            DraftNode::Map(draft) => draft.finalize(),
            DraftNode::Set(draft) => draft.finalize(),
            DraftNode::Record(draft) => draft.finalize(),
        }
    }
}

/// Applies `recipe` to a draft of `base` and returns the next value.
///
/// The recipe runs exactly once. If it performs no observable mutation,
/// the returned value is `base` itself (identity-equal); otherwise it is
/// a fresh persistent value sharing every untouched subtree with `base`.
/// A panicking recipe discards the draft — nothing is published.
pub fn produce<F>(base: &Value, recipe: F) -> Value
where
    F: FnOnce(&mut Draft),
{
    let mut draft = Draft::new(base, Rc::new(Owner::new()));
    recipe(&mut draft);
    draft.finalize()
}

/// Like [`produce`], for recipes that can fail.
///
/// A recipe error discards the draft and propagates unchanged; no value
/// is published.
///
/// # Errors
///
/// Whatever the recipe returns.
pub fn try_produce<F, E>(base: &Value, recipe: F) -> Result<Value, E>
where
    F: FnOnce(&mut Draft) -> Result<(), E>,
{
    let mut draft = Draft::new(base, Rc::new(Owner::new()));
    recipe(&mut draft)?;
    Ok(draft.finalize())
}
