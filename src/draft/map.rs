//! Root/nested drafts over maps and sets.

use std::collections::HashMap;
use std::rc::Rc;

use crate::draft::Draft;
use crate::owner::Owner;
use crate::value::{MapCore, SetCore, Value};

/// Mutable façade over a [`Value::Map`] during one produce call.
#[derive(Debug)]
pub struct MapDraft {
    pub(crate) owner: Rc<Owner>,
    pub(crate) base: Rc<MapCore>,
    pub(crate) work: MapCore,
    pub(crate) modified: bool,
    pub(crate) children: HashMap<Value, Draft>,
}

impl MapDraft {
    pub(crate) fn new(base: &Rc<MapCore>, owner: Rc<Owner>) -> Self {
        Self {
            owner,
            base: Rc::clone(base),
            work: (**base).clone(),
            modified: false,
            children: HashMap::new(),
        }
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.work.len()
    }

    /// `true` when the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.work.is_empty()
    }

    /// `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.work.contains_key(key)
    }

    /// The underlying value for `key`.
    ///
    /// A drafted aggregate child reflects its edits only after
    /// finalisation; mutate it through [`draft_for`](Self::draft_for).
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.work.get(key).cloned()
    }

    /// Inserts or reassigns, invalidating any nested draft cached for
    /// the key. Writing a value equal to the stored one is a no-op.
    pub fn insert(&mut self, key: Value, value: Value) {
        if self.work.insert(&self.owner, key.clone(), value) {
            self.modified = true;
            self.children.remove(&key);
        }
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &Value) -> bool {
        if self.work.remove(&self.owner, key) {
            self.modified = true;
            self.children.remove(key);
            true
        } else {
            false
        }
    }

    /// The nested draft for the aggregate stored under `key`.
    ///
    /// Created lazily on first access and cached. `None` for absent keys
    /// and scalar values.
    pub fn draft_for(&mut self, key: &Value) -> Option<&mut Draft> {
        if !self.children.contains_key(key) {
            let child = self.work.get(key)?.clone();
            if !child.is_managed() {
                return None;
            }
            let draft = Draft::new(&child, Rc::clone(&self.owner));
            self.children.insert(key.clone(), draft);
        }
        self.children.get_mut(key)
    }

    /// The keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<Value> {
        self.work.keys()
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
        for (key, child) in children {
            if child.is_modified() {
                let value = child.finalize();
                work.insert(&owner, key, value);
                modified = true;
            }
        }
        if modified {
            Value::Map(Rc::new(work))
        } else {
            Value::Map(base)
        }
    }
}

/// Mutable façade over a [`Value::Set`] during one produce call.
#[derive(Debug)]
pub struct SetDraft {
    pub(crate) owner: Rc<Owner>,
    pub(crate) base: Rc<SetCore>,
    pub(crate) work: SetCore,
    pub(crate) modified: bool,
    pub(crate) children: HashMap<Value, Draft>,
}

impl SetDraft {
    pub(crate) fn new(base: &Rc<SetCore>, owner: Rc<Owner>) -> Self {
        Self {
            owner,
            base: Rc::clone(base),
            work: (**base).clone(),
            modified: false,
            children: HashMap::new(),
        }
    }

    /// Current number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.work.len()
    }

    /// `true` when the set holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.work.is_empty()
    }

    /// `true` if `member` is present.
    #[must_use]
    pub fn contains(&self, member: &Value) -> bool {
        self.work.contains(member)
    }

    /// Adds a member. Returns `true` if it was not already present.
    pub fn add(&mut self, member: Value) -> bool {
        if self.work.insert(&self.owner, member) {
            self.modified = true;
            true
        } else {
            false
        }
    }

    /// Removes a member. Returns `true` if it was present.
    pub fn remove(&mut self, member: &Value) -> bool {
        if self.work.remove(&self.owner, member) {
            self.modified = true;
            self.children.remove(member);
            true
        } else {
            false
        }
    }

    /// The nested draft for an aggregate member.
    ///
    /// A member modified through its draft is replaced at finalisation:
    /// the original member leaves the set and the extracted value joins
    /// it (identity keys the set, and the identity has changed).
    pub fn draft_of(&mut self, member: &Value) -> Option<&mut Draft> {
        if !self.children.contains_key(member) {
            if !self.work.contains(member) || !member.is_managed() {
                return None;
            }
            let draft = Draft::new(member, Rc::clone(&self.owner));
            self.children.insert(member.clone(), draft);
        }
        self.children.get_mut(member)
    }

    /// The members in insertion order.
    #[must_use]
    pub fn members(&self) -> Vec<Value> {
        self.work.members()
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
        for (member, child) in children {
            if child.is_modified() {
                let replacement = child.finalize();
                work.remove(&owner, &member);
                work.insert(&owner, replacement);
                modified = true;
            }
        }
        if modified {
            Value::Set(Rc::new(work))
        } else {
            Value::Set(base)
        }
    }
}
