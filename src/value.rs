//! Dynamic values — the collection kinds the draft engine operates on.
//!
//! `Value` closes over the host surface: scalars, strings, and the four
//! aggregate kinds (list, map, set, record). Aggregates are handles —
//! `Rc`s of the persistent structures — so cloning a `Value` is O(1) and
//! equality between aggregates is *identity* equality, exactly the
//! equality the map and set key their entries by.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::hamt::Hamt;
use crate::order::OrderIndex;
use crate::owner::Owner;
use crate::vector::PVec;

/// Bit pattern every NaN key collapses to (the quiet NaN).
const CANONICAL_NAN: u64 = 0x7FF8_0000_0000_0000;

/// A dynamic value: a scalar, a string, or an aggregate handle.
#[derive(Clone)]
pub enum Value {
    /// The absent/null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer. Distinct from `Float` even at equal magnitude.
    Int(i64),
    /// A double. `+0.0` equals `-0.0`; `NaN` equals `NaN`.
    Float(f64),
    /// An immutable string, compared by content.
    Str(Rc<str>),
    /// An indexed sequence.
    List(Rc<PVec<Value>>),
    /// A keyed map with insertion-ordered iteration.
    Map(Rc<MapCore>),
    /// A set of members with insertion-ordered iteration.
    Set(Rc<SetCore>),
    /// A plain record of named fields.
    Record(Rc<Record>),
}

/// The aggregate kind of a value, or `Leaf` for scalars and strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Indexed sequence.
    List,
    /// Keyed map.
    Map,
    /// Member set.
    Set,
    /// Named-field record.
    Record,
    /// Not an aggregate.
    Leaf,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Map => "map",
            Self::Set => "set",
            Self::Record => "record",
            Self::Leaf => "leaf",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Equality & hashing — SameValueZero over scalars, identity over aggregates
// ---------------------------------------------------------------------------

fn float_bits(f: f64) -> u64 {
    if f.is_nan() {
        CANONICAL_NAN
    } else if f == 0.0 {
        0 // folds -0.0 onto +0.0
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_bits(*a) == float_bits(*b),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Rc::ptr_eq(a, b),
            (Self::Set(a), Self::Set(b)) => Rc::ptr_eq(a, b),
            (Self::Record(a), Self::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => float_bits(*f).hash(state),
            Self::Str(s) => s.hash(state),
            // Aggregates hash by allocation address — the process-stable
            // identity tag. The address cannot be recycled while the key
            // is held anywhere, because holding the key keeps it alive.
            Self::List(rc) => (Rc::as_ptr(rc) as usize).hash(state),
            Self::Map(rc) => (Rc::as_ptr(rc) as usize).hash(state),
            Self::Set(rc) => (Rc::as_ptr(rc) as usize).hash(state),
            Self::Record(rc) => (Rc::as_ptr(rc) as usize).hash(state),
        }
    }
}

// ---------------------------------------------------------------------------
// Kind dispatch, construction, extraction
// ---------------------------------------------------------------------------

thread_local! {
    static EMPTY_LIST: Rc<PVec<Value>> = Rc::new(PVec::new());
    static EMPTY_MAP: Rc<MapCore> = Rc::new(MapCore::new());
    static EMPTY_SET: Rc<SetCore> = Rc::new(SetCore::new());
    static EMPTY_RECORD: Rc<Record> = Rc::new(Record::new());
}

impl Value {
    /// The aggregate kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::List(_) => Kind::List,
            Self::Map(_) => Kind::Map,
            Self::Set(_) => Kind::Set,
            Self::Record(_) => Kind::Record,
            _ => Kind::Leaf,
        }
    }

    /// `true` for aggregate values (backed by a managed structure).
    #[must_use]
    pub const fn is_managed(&self) -> bool {
        !matches!(self.kind(), Kind::Leaf)
    }

    /// Wraps a native sequence. Empty input yields the shared empty list.
    #[must_use]
    pub fn list_from(items: Vec<Value>) -> Self {
        if items.is_empty() {
            return Self::List(EMPTY_LIST.with(Rc::clone));
        }
        Self::List(Rc::new(items.into_iter().collect()))
    }

    /// Wraps native pairs as an insertion-ordered map.
    #[must_use]
    pub fn map_from(pairs: Vec<(Value, Value)>) -> Self {
        if pairs.is_empty() {
            return Self::Map(EMPTY_MAP.with(Rc::clone));
        }
        let owner = Owner::new();
        let mut core = MapCore::new();
        for (key, value) in pairs {
            core.insert(&owner, key, value);
        }
        Self::Map(Rc::new(core))
    }

    /// Wraps native members as an insertion-ordered set.
    #[must_use]
    pub fn set_from(members: Vec<Value>) -> Self {
        if members.is_empty() {
            return Self::Set(EMPTY_SET.with(Rc::clone));
        }
        let owner = Owner::new();
        let mut core = SetCore::new();
        for member in members {
            core.insert(&owner, member);
        }
        Self::Set(Rc::new(core))
    }

    /// Wraps native fields as a record, keeping field order.
    #[must_use]
    pub fn record_from(fields: Vec<(&str, Value)>) -> Self {
        if fields.is_empty() {
            return Self::Record(EMPTY_RECORD.with(Rc::clone));
        }
        let mut record = Record::new();
        for (name, value) in fields {
            record.set(name, value);
        }
        Self::Record(Rc::new(record))
    }

    /// Extracts a list into a fresh native vector.
    #[must_use]
    pub fn to_list(&self) -> Option<Vec<Value>> {
        match self {
            Self::List(vec) => Some(vec.to_vec()),
            _ => None,
        }
    }

    /// Extracts a map into fresh native pairs, in insertion order.
    #[must_use]
    pub fn to_pairs(&self) -> Option<Vec<(Value, Value)>> {
        match self {
            Self::Map(core) => Some(core.entries()),
            _ => None,
        }
    }

    /// Extracts a set into fresh native members, in insertion order.
    #[must_use]
    pub fn to_members(&self) -> Option<Vec<Value>> {
        match self {
            Self::Set(core) => Some(core.members()),
            _ => None,
        }
    }

    /// Extracts a record into fresh native fields, in field order.
    #[must_use]
    pub fn to_fields(&self) -> Option<Vec<(Rc<str>, Value)>> {
        match self {
            Self::Record(record) => Some(record.fields().to_vec()),
            _ => None,
        }
    }

    /// Structural (deep) equality, as opposed to the identity equality of
    /// `==`. Aggregates compare by content; map and set keys still match
    /// by identity, as they do inside the structures.
    #[must_use]
    pub fn deep_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq(y)))
            }
            (Self::Map(a), Self::Map(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.entries()
                            .iter()
                            .all(|(k, v)| b.get(k).is_some_and(|bv| bv.deep_eq(v))))
            }
            (Self::Set(a), Self::Set(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len() && a.members().iter().all(|m| b.contains(m)))
            }
            (Self::Record(a), Self::Record(b)) => {
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.fields()
                            .iter()
                            .all(|(name, v)| b.get(name).is_some_and(|bv| bv.deep_eq(v))))
            }
            _ => self == other,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Int(i) => write!(f, "Int({i})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::List(vec) => write!(f, "List(len={})", vec.len()),
            Self::Map(core) => write!(f, "Map(len={})", core.len()),
            Self::Set(core) => write!(f, "Set(len={})", core.len()),
            Self::Record(record) => write!(f, "Record(len={})", record.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(Rc::from(s.as_str()))
    }
}

// ---------------------------------------------------------------------------
// MapCore — HAMT plus insertion-order index
// ---------------------------------------------------------------------------

/// The structure behind [`Value::Map`]: a [`Hamt`] shadowed by an
/// [`OrderIndex`] so iteration reproduces insertion order.
pub struct MapCore {
    pub(crate) hamt: Hamt<Value, Value>,
    pub(crate) order: Option<OrderIndex<Value, Value>>,
}

impl Clone for MapCore {
    fn clone(&self) -> Self {
        Self {
            hamt: self.hamt.clone(),
            order: self.order.clone(),
        }
    }
}

impl MapCore {
    /// Creates an empty, insertion-ordered map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hamt: Hamt::new(),
            order: Some(OrderIndex::with_values()),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hamt.len()
    }

    /// `true` when the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hamt.is_empty()
    }

    /// The value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.hamt.get(key)
    }

    /// `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.hamt.contains_key(key)
    }

    /// Inserts or reassigns. Returns `false` (and leaves the structure
    /// untouched) when the stored value already equals `value`.
    pub fn insert(&mut self, owner: &Owner, key: Value, value: Value) -> bool {
        if self.hamt.get(&key).is_some_and(|current| *current == value) {
            return false;
        }
        self.hamt.insert(owner, key.clone(), value.clone());
        if let Some(order) = &mut self.order {
            order.record_insert(owner, key, Some(value));
        }
        true
    }

    /// Removes `key`. Returns `false` when it was absent.
    pub fn remove(&mut self, owner: &Owner, key: &Value) -> bool {
        if self.hamt.remove(owner, key).is_none() {
            return false;
        }
        if let Some(order) = &mut self.order {
            order.record_remove(owner, key);
        }
        true
    }

    /// Fresh `(key, value)` pairs — insertion order when indexed.
    #[must_use]
    pub fn entries(&self) -> Vec<(Value, Value)> {
        match &self.order {
            Some(order) => order
                .entries()
                .into_iter()
                .map(|(k, v)| {
                    let value = v.or_else(|| self.hamt.get(k)).cloned().unwrap_or(Value::Null);
                    (k.clone(), value)
                })
                .collect(),
            None => self
                .hamt
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Fresh keys — insertion order when indexed.
    #[must_use]
    pub fn keys(&self) -> Vec<Value> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }
}

impl Default for MapCore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SetCore — member HAMT plus insertion-order index
// ---------------------------------------------------------------------------

/// The structure behind [`Value::Set`].
pub struct SetCore {
    pub(crate) hamt: Hamt<Value, ()>,
    pub(crate) order: Option<OrderIndex<Value, ()>>,
}

impl Clone for SetCore {
    fn clone(&self) -> Self {
        Self {
            hamt: self.hamt.clone(),
            order: self.order.clone(),
        }
    }
}

impl SetCore {
    /// Creates an empty, insertion-ordered set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hamt: Hamt::new(),
            order: Some(OrderIndex::keys_only()),
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hamt.len()
    }

    /// `true` when the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hamt.is_empty()
    }

    /// `true` if `member` is present.
    #[must_use]
    pub fn contains(&self, member: &Value) -> bool {
        self.hamt.contains_key(member)
    }

    /// Adds a member. Returns `false` when it was already present.
    pub fn insert(&mut self, owner: &Owner, member: Value) -> bool {
        if self.hamt.contains_key(&member) {
            return false;
        }
        self.hamt.insert(owner, member.clone(), ());
        if let Some(order) = &mut self.order {
            order.record_insert(owner, member, None);
        }
        true
    }

    /// Removes a member. Returns `false` when it was absent.
    pub fn remove(&mut self, owner: &Owner, member: &Value) -> bool {
        if self.hamt.remove(owner, member).is_none() {
            return false;
        }
        if let Some(order) = &mut self.order {
            order.record_remove(owner, member);
        }
        true
    }

    /// Fresh members — insertion order when indexed.
    #[must_use]
    pub fn members(&self) -> Vec<Value> {
        match &self.order {
            Some(order) => order.keys().into_iter().cloned().collect(),
            None => self.hamt.iter().map(|(k, _)| k.clone()).collect(),
        }
    }
}

impl Default for SetCore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SetCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetCore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Record — a plain aggregate of named fields
// ---------------------------------------------------------------------------

/// An insertion-ordered list of named fields.
///
/// Records are the "plain object" of the model: small, shallow-copied by
/// the draft engine rather than path-copied, looked up linearly.
#[derive(Clone, Default)]
pub struct Record {
    fields: Vec<(Rc<str>, Value)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The value of the field `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| &**field == name)
            .map(|(_, value)| value)
    }

    /// Sets the field `name`, keeping its position when it exists and
    /// appending it otherwise.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(field, _)| &**field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((Rc::from(name), value)),
        }
    }

    /// Removes the field `name`. Returns `false` when it was absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|(field, _)| &**field != name);
        self.fields.len() != before
    }

    /// The fields in order.
    #[must_use]
    pub fn fields(&self) -> &[(Rc<str>, Value)] {
        &self.fields
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.fields {
            map.entry(&&**name, value);
        }
        map.finish()
    }
}
