use crate::{OrderIndex, Owner};

fn keys_of(index: &OrderIndex<&'static str, i32>) -> Vec<&'static str> {
    index.keys().into_iter().copied().collect()
}

#[test]
fn insertion_order_preserved() {
    let owner = Owner::new();
    let mut index = OrderIndex::with_values();
    index.record_insert(&owner, "b", Some(2));
    index.record_insert(&owner, "a", Some(1));
    index.record_insert(&owner, "c", Some(3));
    assert_eq!(keys_of(&index), vec!["b", "a", "c"]);
    let values: Vec<i32> = index
        .entries()
        .into_iter()
        .map(|(_, v)| *v.expect("map index carries values"))
        .collect();
    assert_eq!(values, vec![2, 1, 3]);
}

/// Reassigning a key keeps its original slot.
#[test]
fn reassign_keeps_slot() {
    let owner = Owner::new();
    let mut index = OrderIndex::with_values();
    index.record_insert(&owner, "x", Some(1));
    index.record_insert(&owner, "y", Some(2));
    index.record_insert(&owner, "x", Some(10));
    assert_eq!(keys_of(&index), vec!["x", "y"]);
    assert_eq!(index.entries()[0].1, Some(&10));
}

/// Delete then re-insert moves the key to the end.
#[test]
fn reinsert_after_delete_goes_last() {
    let owner = Owner::new();
    let mut index = OrderIndex::with_values();
    index.record_insert(&owner, "a", Some(1));
    index.record_insert(&owner, "b", Some(2));
    index.record_insert(&owner, "c", Some(3));
    index.record_remove(&owner, &"a");
    assert_eq!(keys_of(&index), vec!["b", "c"]);
    index.record_insert(&owner, "a", Some(9));
    assert_eq!(keys_of(&index), vec!["b", "c", "a"]);
}

#[test]
fn remove_absent_is_noop() {
    let owner = Owner::new();
    let mut index: OrderIndex<&str, i32> = OrderIndex::with_values();
    index.record_insert(&owner, "a", Some(1));
    index.record_remove(&owner, &"zzz");
    assert_eq!(index.len(), 1);
    assert_eq!(keys_of(&index), vec!["a"]);
}

/// Heavy deletion triggers compaction; order and contents survive it.
#[test]
fn compaction_preserves_order() {
    let owner = Owner::new();
    let mut index = OrderIndex::with_values();
    for i in 0..100 {
        index.record_insert(&owner, i, Some(i * 10));
    }
    // Remove the first 60 keys — 51 holes out of 100 slots crosses the
    // threshold along the way.
    for i in 0..60 {
        index.record_remove(&owner, &i);
    }
    assert_eq!(index.len(), 40);
    let keys: Vec<i32> = index.keys().into_iter().copied().collect();
    assert_eq!(keys, (60..100).collect::<Vec<_>>());

    // The index keeps working after compaction.
    index.record_insert(&owner, 1000, Some(0));
    let keys: Vec<i32> = index.keys().into_iter().copied().collect();
    assert_eq!(*keys.last().expect("non-empty"), 1000);
}

#[test]
fn keys_only_index() {
    let owner = Owner::new();
    let mut index: OrderIndex<&str, ()> = OrderIndex::keys_only();
    index.record_insert(&owner, "one", None);
    index.record_insert(&owner, "two", None);
    index.record_insert(&owner, "one", None);
    assert_eq!(index.len(), 2);
    let keys: Vec<&str> = index.keys().into_iter().copied().collect();
    assert_eq!(keys, vec!["one", "two"]);
    assert!(index.entries().iter().all(|(_, v)| v.is_none()));
}
