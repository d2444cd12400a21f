//! Key hashing — uniform 32-bit hashes, stable for the process lifetime.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Mixing seed (golden ratio constant).
const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Computes the 32-bit trie hash of a key.
///
/// The standard hasher's 64-bit output is folded through a multiply so
/// both halves contribute to every level of the trie.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(key: &T) -> u32 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    fold(hasher.finish())
}

/// Folds a 64-bit hash down to the 32 bits the tries consume.
#[inline]
#[must_use]
pub(crate) const fn fold(hash: u64) -> u32 {
    let mixed = hash.wrapping_mul(SEED);
    ((mixed >> 32) ^ mixed) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_within_process() {
        assert_eq!(hash_one("key"), hash_one("key"));
        assert_eq!(hash_one(&42_u64), hash_one(&42_u64));
    }

    #[test]
    fn distinct_keys_usually_differ() {
        // Not a guarantee, but a sanity check on the fold.
        let hashes: Vec<u32> = (0_u64..64).map(|i| hash_one(&i)).collect();
        let mut deduped = hashes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert!(deduped.len() > 60, "fold degenerated: {deduped:?}");
    }
}
