use proptest::prelude::*;
use track_changes_value::{deep_equal, get_path_value, Scalar, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::null()),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
        any::<i64>().prop_map(Value::date),
        prop::collection::vec(any::<u8>(), 0..4).prop_map(Value::binary),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(Value::Object),
        ]
    })
}

proptest! {
    #[test]
    fn deep_equal_is_reflexive(v in tree()) {
        prop_assert!(deep_equal(&v, &v.clone()));
    }

    #[test]
    fn deep_equal_agrees_with_structural_eq(a in tree(), b in tree()) {
        prop_assert_eq!(deep_equal(&a, &b), a == b);
    }

    #[test]
    fn rebuild_touches_only_the_edited_key(
        map in prop::collection::btree_map("[a-d]", tree(), 1..4),
        replacement in tree(),
    ) {
        let key = map.keys().next().cloned().unwrap();
        let original = Value::Object(map.clone());
        let rebuilt = original.clone().rebuild([(key.clone(), Some(replacement.clone()))]);
        for (k, v) in &map {
            let got = get_path_value(&rebuilt, std::slice::from_ref(k)).unwrap();
            if *k == key {
                prop_assert!(deep_equal(got, &replacement));
            } else {
                prop_assert!(deep_equal(got, v));
            }
        }
    }

    #[test]
    fn json_conversion_preserves_plain_trees(v in tree()) {
        let plain = !contains_domain_leaf(&v);
        if plain {
            prop_assert_eq!(Value::from(v.to_json()), v);
        }
    }
}

fn contains_domain_leaf(v: &Value) -> bool {
    match v {
        Value::Leaf(Scalar::Date(_)) | Value::Leaf(Scalar::Binary(_)) => true,
        Value::Leaf(_) => false,
        Value::Array(arr) => arr.iter().any(contains_domain_leaf),
        Value::Object(map) => map.values().any(contains_domain_leaf),
    }
}
