use crate::{produce, try_produce, DraftError, Kind, Value};

fn ints(items: &[i64]) -> Value {
    Value::list_from(items.iter().map(|&i| Value::Int(i)).collect())
}

#[test]
fn list_push_set_pop() {
    let base = ints(&[1, 2, 3]);
    let next = produce(&base, |d| {
        let list = d.as_list().unwrap();
        list.push(Value::Int(4));
        list.set(0, Value::Int(10)).unwrap();
        assert_eq!(list.pop(), Some(Value::Int(4)));
        assert_eq!(list.len(), 3);
    });
    assert_eq!(next.to_list().unwrap(), vec![Value::Int(10), Value::Int(2), Value::Int(3)]);
    // The base never moved.
    assert_eq!(base.to_list().unwrap(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn list_set_out_of_range() {
    let base = ints(&[1]);
    produce(&base, |d| {
        let list = d.as_list().unwrap();
        let err = list.set(5, Value::Null).unwrap_err();
        assert_eq!(err.index, 5);
        assert_eq!(err.len, 1);
    });
}

#[test]
fn map_insert_get_remove() {
    let base = Value::map_from(vec![
        (Value::from("a"), Value::Int(1)),
        (Value::from("b"), Value::Int(2)),
    ]);
    let next = produce(&base, |d| {
        let map = d.as_map().unwrap();
        assert_eq!(map.get(&Value::from("a")), Some(Value::Int(1)));
        map.insert(Value::from("c"), Value::Int(3));
        assert!(map.remove(&Value::from("a")));
        assert!(!map.remove(&Value::from("zzz")));
        assert_eq!(map.len(), 2);
    });
    let pairs = next.to_pairs().unwrap();
    assert_eq!(
        pairs,
        vec![
            (Value::from("b"), Value::Int(2)),
            (Value::from("c"), Value::Int(3)),
        ]
    );
}

/// Writing the stored value back does not count as a modification.
#[test]
fn equal_write_is_not_a_modification() {
    let base = Value::map_from(vec![(Value::from("k"), Value::Int(7))]);
    let next = produce(&base, |d| {
        d.as_map().unwrap().insert(Value::from("k"), Value::Int(7));
    });
    assert_eq!(next, base);
}

#[test]
fn set_add_remove() {
    let base = Value::set_from(vec![Value::Int(1), Value::Int(2)]);
    let next = produce(&base, |d| {
        let set = d.as_set().unwrap();
        assert!(set.contains(&Value::Int(1)));
        assert!(set.add(Value::Int(3)));
        assert!(!set.add(Value::Int(1)));
        assert!(set.remove(&Value::Int(2)));
    });
    assert_eq!(
        next.to_members().unwrap(),
        vec![Value::Int(1), Value::Int(3)]
    );
}

#[test]
fn record_set_remove() {
    let base = Value::record_from(vec![("name", Value::from("ada")), ("age", Value::Int(36))]);
    let next = produce(&base, |d| {
        let record = d.as_record().unwrap();
        record.set("age", Value::Int(37));
        record.set("title", Value::from("countess"));
        assert!(record.remove("name"));
        assert!(!record.remove("missing"));
    });
    let fields = next.to_fields().unwrap();
    let names: Vec<&str> = fields.iter().map(|(n, _)| &**n).collect();
    assert_eq!(names, vec!["age", "title"]);
    assert_eq!(next.to_fields().unwrap()[0].1, Value::Int(37));
    // Removing an absent field alone would not have modified the draft.
    let untouched = produce(&base, |d| {
        assert!(!d.as_record().unwrap().remove("missing"));
    });
    assert_eq!(untouched, base);
}

#[test]
fn kind_mismatch() {
    let base = ints(&[1]);
    produce(&base, |d| {
        let err = d.as_map().unwrap_err();
        assert_eq!(
            err,
            DraftError::KindMismatch {
                expected: Kind::Map,
                found: Kind::List,
            }
        );
        assert!(d.as_list().is_ok());
    });
}

/// Non-aggregate bases pass through untouched.
#[test]
fn leaf_base_passes_through() {
    let base = Value::Int(42);
    let next = produce(&base, |d| {
        assert_eq!(d.kind(), Kind::Leaf);
        assert_eq!(d.as_value(), Some(&Value::Int(42)));
        assert!(d.as_list().is_err());
    });
    assert_eq!(next, Value::Int(42));
}

/// A failing recipe publishes nothing and propagates its error.
#[test]
fn try_produce_propagates_errors() {
    let base = ints(&[1, 2]);
    let result: Result<Value, &str> = try_produce(&base, |d| {
        d.as_list().unwrap().push(Value::Int(3));
        Err("recipe failed")
    });
    assert_eq!(result.unwrap_err(), "recipe failed");
    assert_eq!(base.to_list().unwrap().len(), 2);
}

#[test]
fn try_produce_ok() {
    let base = ints(&[1]);
    let result: Result<Value, std::convert::Infallible> = try_produce(&base, |d| {
        d.as_list().unwrap().push(Value::Int(2));
        Ok(())
    });
    assert_eq!(result.unwrap().to_list().unwrap().len(), 2);
}

/// Successive produces form independent versions.
#[test]
fn produce_chain_is_persistent() {
    let v0 = ints(&[]);
    let mut versions = vec![v0.clone()];
    let mut current = v0;
    for i in 0..100 {
        current = produce(&current, |d| {
            d.as_list().unwrap().push(Value::Int(i));
        });
        versions.push(current.clone());
    }
    for (n, version) in versions.iter().enumerate() {
        assert_eq!(version.to_list().unwrap().len(), n, "version {n}");
    }
}
