//! Persistent collections with draft-based immutable updates.
//!
//! Three structures share one editing discipline:
//!
//! - [`PVec`] — an indexed sequence over a 32-way radix-balanced trie
//!   with a tail buffer; concatenation and slicing stay O(log n) via
//!   relaxed (size-table) branches
//! - [`Hamt`] — an unordered map over a bitmap-compressed hash trie with
//!   collision buckets
//! - [`PSet`] — an unordered set, a [`Hamt`] with unit values
//!
//! plus [`OrderIndex`], a tombstoned slot log that gives maps and sets
//! insertion-ordered iteration with lazy compaction.
//!
//! # Key properties
//!
//! - **Structural sharing**: cloning is O(1); updates copy one path
//! - **Transients**: per-session [`Owner`] tokens let a batch of edits
//!   mutate freshly created nodes in place, one copy per touched node
//! - **Drafts**: [`produce`] wraps a [`Value`] in a mutable façade, runs
//!   a recipe, and publishes a new value — or the base itself, by
//!   identity, when nothing changed
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # References
//!
//! - Bagwell, 2001 — "Ideal Hash Trees"
//! - Bagwell & Rompf, 2011 — "RRB-Trees: Efficient Immutable Vectors"
//! - Hickey, 2009 — transient data structures in Clojure

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod bits;
pub mod hash;
pub mod order;

mod draft;
mod error;
mod hamt;
mod owner;
mod set;
mod value;
mod vector;

#[cfg(test)]
mod tests;

pub use draft::{produce, try_produce, Draft, ListDraft, MapDraft, RecordDraft, SetDraft};
pub use error::{DraftError, IndexError};
pub use hamt::{Hamt, Iter as HamtIter};
pub use order::OrderIndex;
pub use owner::Owner;
pub use set::{Iter as SetIter, PSet};
pub use value::{Kind, MapCore, Record, SetCore, Value};
pub use vector::{Iter as VecIter, PVec};
