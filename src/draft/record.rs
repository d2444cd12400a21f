//! Root/nested draft over a record — shallow copy-on-write.

use std::collections::HashMap;
use std::rc::Rc;

use crate::draft::Draft;
use crate::owner::Owner;
use crate::value::{Record, Value};

/// Mutable façade over a [`Value::Record`] during one produce call.
///
/// Records are plain aggregates, so the draft is a copy-on-write shell:
/// reads pass through to the base until the first write makes a shallow
/// copy. Holding a copy *is* the modification flag.
#[derive(Debug)]
pub struct RecordDraft {
    pub(crate) owner: Rc<Owner>,
    pub(crate) base: Rc<Record>,
    pub(crate) copy: Option<Record>,
    pub(crate) children: HashMap<Rc<str>, Draft>,
}

impl RecordDraft {
    pub(crate) fn new(base: &Rc<Record>, owner: Rc<Owner>) -> Self {
        Self {
            owner,
            base: Rc::clone(base),
            copy: None,
            children: HashMap::new(),
        }
    }

    fn current(&self) -> &Record {
        self.copy.as_ref().unwrap_or(&self.base)
    }

    fn ensure_copy(&mut self) -> &mut Record {
        self.copy.get_or_insert_with(|| (*self.base).clone())
    }

    /// Current number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current().len()
    }

    /// `true` when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// The underlying value of field `name`.
    ///
    /// A drafted aggregate field reflects its edits only after
    /// finalisation; mutate it through [`draft_field`](Self::draft_field).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.current().get(name).cloned()
    }

    /// Sets field `name`, invalidating any nested draft cached for it.
    ///
    /// The first write takes the shallow copy.
    pub fn set(&mut self, name: &str, value: Value) {
        self.ensure_copy().set(name, value);
        self.children.remove(name);
    }

    /// Removes field `name`. Returns `true` if it was present; removing
    /// an absent field leaves the draft unmodified.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.current().get(name).is_none() {
            return false;
        }
        let removed = self.ensure_copy().remove(name);
        self.children.remove(name);
        removed
    }

    /// The nested draft for the aggregate field `name`.
    ///
    /// Created lazily on first access and cached. `None` for absent
    /// fields and scalar values.
    pub fn draft_field(&mut self, name: &str) -> Option<&mut Draft> {
        if !self.children.contains_key(name) {
            let child = self.current().get(name)?.clone();
            if !child.is_managed() {
                return None;
            }
            let draft = Draft::new(&child, Rc::clone(&self.owner));
            self.children.insert(Rc::from(name), draft);
        }
        self.children.get_mut(name)
    }

    /// The field names in order.
    #[must_use]
    pub fn field_names(&self) -> Vec<Rc<str>> {
        self.current()
            .fields()
            .iter()
            .map(|(name, _)| Rc::clone(name))
            .collect()
    }

    pub(crate) fn is_modified(&self) -> bool {
        self.copy.is_some() || self.children.values().any(Draft::is_modified)
    }

    pub(crate) fn finalize(self) -> Value {
        let Self {
            owner: _,
            base,
            mut copy,
            children,
        } = self;
        for (name, child) in children {
            if child.is_modified() {
                let value = child.finalize();
                copy.get_or_insert_with(|| (*base).clone()).set(&name, value);
            }
        }
        match copy {
            Some(record) => Value::Record(Rc::new(record)),
            None => Value::Record(base),
        }
    }
}
