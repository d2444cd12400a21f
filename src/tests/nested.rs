//! Nested draft behaviour: lazy creation, caching, bubbling, identity.

use crate::{produce, Value};

fn sample_record() -> Value {
    Value::record_from(vec![
        (
            "user",
            Value::record_from(vec![("name", Value::from("ada"))]),
        ),
        ("tags", Value::list_from(vec![Value::Int(1), Value::Int(2)])),
        ("count", Value::Int(0)),
    ])
}

#[test]
fn nested_record_write_bubbles_up() {
    let base = sample_record();
    let tags_before = base.to_fields().unwrap()[1].1.clone();

    let next = produce(&base, |d| {
        let record = d.as_record().unwrap();
        let user = record.draft_field("user").unwrap();
        user.as_record().unwrap().set("name", Value::from("grace"));
    });

    assert_ne!(next, base);
    let fields = next.to_fields().unwrap();
    let user = &fields[0].1;
    assert_eq!(
        user.to_fields().unwrap()[0].1,
        Value::from("grace")
    );
    // The untouched sibling keeps its identity.
    assert_eq!(fields[1].1, tags_before);
}

/// Reading a nested value without writing modifies nothing: the base
/// comes back by identity, and the nested record is never re-wrapped.
#[test]
fn nested_read_only_is_identity() {
    let base = sample_record();
    let next = produce(&base, |d| {
        let record = d.as_record().unwrap();
        let user = record.draft_field("user").unwrap();
        assert_eq!(
            user.as_record().unwrap().get("name"),
            Some(Value::from("ada"))
        );
    });
    assert_eq!(next, base);
}

/// Repeated access to the same slot hands back the same cached draft.
#[test]
fn nested_draft_is_cached() {
    let base = sample_record();
    let next = produce(&base, |d| {
        let record = d.as_record().unwrap();
        record
            .draft_field("user")
            .unwrap()
            .as_record()
            .unwrap()
            .set("a", Value::Int(1));
        // Second access sees the first edit.
        let user = record.draft_field("user").unwrap().as_record().unwrap();
        assert_eq!(user.get("a"), Some(Value::Int(1)));
        user.set("b", Value::Int(2));
    });
    let fields = next.to_fields().unwrap();
    let user = &fields[0].1;
    assert_eq!(user.to_fields().unwrap().len(), 3); // name, a, b
}

#[test]
fn nested_list_inside_record() {
    let base = sample_record();
    let next = produce(&base, |d| {
        let record = d.as_record().unwrap();
        let tags = record.draft_field("tags").unwrap().as_list().unwrap();
        tags.push(Value::Int(3));
        tags.set(0, Value::Int(10)).unwrap();
    });
    let tags = next.to_fields().unwrap()[1].1.clone();
    assert_eq!(
        tags.to_list().unwrap(),
        vec![Value::Int(10), Value::Int(2), Value::Int(3)]
    );
}

#[test]
fn nested_map_inside_list() {
    let inner = Value::map_from(vec![(Value::from("x"), Value::Int(1))]);
    let base = Value::list_from(vec![inner, Value::Int(7)]);
    let next = produce(&base, |d| {
        let list = d.as_list().unwrap();
        // Scalars have no drafts.
        assert!(list.draft_at(1).is_none());
        let map = list.draft_at(0).unwrap().as_map().unwrap();
        map.insert(Value::from("y"), Value::Int(2));
    });
    let out = next.to_list().unwrap();
    let pairs = out[0].to_pairs().unwrap();
    assert_eq!(
        pairs,
        vec![
            (Value::from("x"), Value::Int(1)),
            (Value::from("y"), Value::Int(2)),
        ]
    );
    assert_eq!(out[1], Value::Int(7));
}

/// Two levels of nesting: record → record → record.
#[test]
fn deep_nesting() {
    let base = Value::record_from(vec![(
        "a",
        Value::record_from(vec![(
            "b",
            Value::record_from(vec![("c", Value::Int(1))]),
        )]),
    )]);
    let next = produce(&base, |d| {
        let a = d.as_record().unwrap().draft_field("a").unwrap();
        let b = a.as_record().unwrap().draft_field("b").unwrap();
        b.as_record().unwrap().set("c", Value::Int(2));
    });
    let a = next.to_fields().unwrap()[0].1.clone();
    let b = a.to_fields().unwrap()[0].1.clone();
    assert_eq!(b.to_fields().unwrap()[0].1, Value::Int(2));
    // The base chain is untouched.
    let a0 = base.to_fields().unwrap()[0].1.clone();
    let b0 = a0.to_fields().unwrap()[0].1.clone();
    assert_eq!(b0.to_fields().unwrap()[0].1, Value::Int(1));
}

/// A direct write to a slot discards the nested draft cached for it.
#[test]
fn direct_write_invalidates_nested_draft() {
    let base = sample_record();
    let next = produce(&base, |d| {
        let record = d.as_record().unwrap();
        record
            .draft_field("user")
            .unwrap()
            .as_record()
            .unwrap()
            .set("name", Value::from("discarded"));
        // Overwrite the slot itself; the nested edit above must not leak
        // into the final value.
        record.set("user", Value::from("plain"));
    });
    let fields = next.to_fields().unwrap();
    assert_eq!(fields[0].1, Value::from("plain"));
}

/// Set members with drafts: the modified member replaces the original.
#[test]
fn set_member_draft_replaces() {
    let member = Value::record_from(vec![("id", Value::Int(1))]);
    let base = Value::set_from(vec![member.clone(), Value::Int(9)]);
    let next = produce(&base, |d| {
        let set = d.as_set().unwrap();
        let draft = set.draft_of(&member).unwrap();
        draft.as_record().unwrap().set("id", Value::Int(2));
    });
    let members = next.to_members().unwrap();
    assert_eq!(members.len(), 2);
    assert!(!members.contains(&member));
    let replaced = members
        .iter()
        .find(|m| m.kind() == crate::Kind::Record)
        .unwrap();
    assert_eq!(replaced.to_fields().unwrap()[0].1, Value::Int(2));
}

/// Pop invalidates the popped slot's nested draft.
#[test]
fn pop_invalidates_tail_draft() {
    let inner = Value::record_from(vec![("x", Value::Int(1))]);
    let base = Value::list_from(vec![Value::Int(0), inner]);
    let next = produce(&base, |d| {
        let list = d.as_list().unwrap();
        list.draft_at(1)
            .unwrap()
            .as_record()
            .unwrap()
            .set("x", Value::Int(99));
        let popped = list.pop().unwrap();
        assert_eq!(popped.kind(), crate::Kind::Record);
    });
    assert_eq!(next.to_list().unwrap(), vec![Value::Int(0)]);
}
