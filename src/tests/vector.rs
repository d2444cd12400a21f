use crate::{Owner, PVec};

fn build(n: usize) -> PVec<usize> {
    (0..n).collect()
}

#[test]
fn empty_vector() {
    let vec: PVec<i32> = PVec::new();
    assert_eq!(vec.len(), 0);
    assert!(vec.is_empty());
    assert_eq!(vec.get(0), None);
}

#[test]
fn push_and_get() {
    let owner = Owner::new();
    let mut vec = PVec::new();
    vec.push(&owner, "a");
    vec.push(&owner, "b");
    assert_eq!(vec.len(), 2);
    assert_eq!(vec.get(0), Some(&"a"));
    assert_eq!(vec.get(1), Some(&"b"));
    assert_eq!(vec.get(2), None);
}

/// Sizes straddling every tail/trie boundary behave identically.
#[test]
fn boundary_sizes() {
    for n in [1, 31, 32, 33, 63, 64, 65, 1023, 1024, 1025, 1056, 1057] {
        let vec = build(n);
        assert_eq!(vec.len(), n, "len at n={n}");
        for i in [0, n / 2, n - 1] {
            assert_eq!(vec.get(i), Some(&i), "get({i}) at n={n}");
        }
        assert_eq!(vec.get(n), None);
    }
}

#[test]
fn from_slice_to_vec_round_trip() {
    let items: Vec<u64> = (0..500).map(|i| i * 7).collect();
    let vec = PVec::from_slice(&items);
    assert_eq!(vec.to_vec(), items);
}

#[test]
fn update_in_tail_and_tree() {
    let owner = Owner::new();
    let mut vec = build(100); // tree holds 96, tail holds 4
    vec.update(&owner, 99, 990).unwrap();
    vec.update(&owner, 3, 30).unwrap();
    assert_eq!(vec.get(99), Some(&990));
    assert_eq!(vec.get(3), Some(&30));
    // Frame condition: everything else untouched.
    for i in (0..100).filter(|&i| i != 99 && i != 3) {
        assert_eq!(vec.get(i), Some(&i));
    }
}

#[test]
fn update_out_of_range() {
    let owner = Owner::new();
    let mut vec = build(3);
    let err = vec.update(&owner, 3, 0).unwrap_err();
    assert_eq!(err.index, 3);
    assert_eq!(err.len, 3);
    let err = vec.update(&owner, 100, 0).unwrap_err();
    assert_eq!(err.index, 100);
}

#[test]
fn pop_reverses_push() {
    let owner = Owner::new();
    let mut vec = build(3);
    vec.push(&owner, 4);
    vec.push(&owner, 5);
    assert_eq!(vec.to_vec(), vec![0, 1, 2, 4, 5]);
    assert_eq!(vec.pop(&owner), Some(5));
    assert_eq!(vec.pop(&owner), Some(4));
    assert_eq!(vec.to_vec(), vec![0, 1, 2]);
}

#[test]
fn pop_empty() {
    let owner = Owner::new();
    let mut vec: PVec<i32> = PVec::new();
    assert_eq!(vec.pop(&owner), None);
    assert_eq!(vec.len(), 0);
}

/// Pop across the tail boundary demotes a trie leaf into the tail.
#[test]
fn pop_across_boundaries() {
    let owner = Owner::new();
    for n in [33, 64, 65, 1025] {
        let mut vec = build(n);
        for expected in (0..n).rev() {
            assert_eq!(vec.pop(&owner), Some(expected), "pop at n={n}");
        }
        assert!(vec.is_empty());
        assert_eq!(vec.pop(&owner), None);
    }
}

/// Popping everything and pushing again reuses the empty state cleanly.
#[test]
fn drain_then_refill() {
    let owner = Owner::new();
    let mut vec = build(40);
    while vec.pop(&owner).is_some() {}
    assert!(vec.is_empty());
    for i in 0..40 {
        vec.push(&owner, i);
    }
    assert_eq!(vec.to_vec(), (0..40).collect::<Vec<_>>());
}

/// A clone is unaffected by edits to the original, whatever the owner.
#[test]
fn clone_is_persistent() {
    let owner = Owner::new();
    let mut vec = build(200);
    let snapshot = vec.clone();
    for i in 0..200 {
        vec.update(&owner, i, i + 1000).unwrap();
    }
    vec.push(&owner, 9999);
    for i in 0..200 {
        assert_eq!(snapshot.get(i), Some(&i));
    }
    assert_eq!(snapshot.len(), 200);
    assert_eq!(vec.get(0), Some(&1000));
}

/// Same owner, interleaved edits on a clone taken mid-session: the clone
/// must still see the state at the time it was taken.
#[test]
fn mid_session_clone_is_isolated() {
    let owner = Owner::new();
    let mut vec = PVec::new();
    for i in 0..50 {
        vec.push(&owner, i);
    }
    let snapshot = vec.clone();
    for i in 50..100 {
        vec.push(&owner, i);
    }
    vec.update(&owner, 10, 555).unwrap();
    assert_eq!(snapshot.len(), 50);
    assert_eq!(snapshot.get(10), Some(&10));
    assert_eq!(snapshot.to_vec(), (0..50).collect::<Vec<_>>());
}

#[test]
fn iter_matches_indices() {
    let vec = build(300);
    let collected: Vec<usize> = vec.iter().copied().collect();
    assert_eq!(collected, (0..300).collect::<Vec<_>>());
    assert_eq!(vec.iter().len(), 300);
}

#[test]
fn structural_equality() {
    let a = build(100);
    let b = build(100);
    let c = build(101);
    assert_eq!(a, b);
    assert_ne!(a, c);
}
