//! Owner tokens — the authority for in-place edits during one session.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stamp carried by nodes that were never created under an edit session.
pub(crate) const NO_OWNER: u64 = 0;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// An opaque, process-unique edit token.
///
/// A node stamped with the id of the active `Owner` may be mutated in
/// place; any other node must be cloned (and stamped) first. Tokens are
/// never reused: each `Owner::new` draws a fresh id from a process-global
/// counter, so nodes stamped in an earlier session are always copied by
/// later ones.
///
/// `Owner` is deliberately neither `Clone` nor `Copy` — holding the value
/// is holding the authority.
pub struct Owner {
    id: u64,
}

impl Owner {
    /// Allocates a fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The numeric stamp written into nodes created under this token.
    #[inline]
    #[must_use]
    pub(crate) const fn id(&self) -> u64 {
        self.id
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Owner").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        let a = Owner::new();
        let b = Owner::new();
        let c = Owner::new();
        assert_ne!(a.id(), b.id());
        assert_ne!(b.id(), c.id());
        assert_ne!(a.id(), NO_OWNER);
    }
}
