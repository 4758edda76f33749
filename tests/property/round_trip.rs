//! Packed change-sets agree with live data for arbitrary operation sequences

use change_cache::tree::{resolve_value, Path};
use change_cache::{ChangeCache, Value};
use proptest::prelude::*;
use serde_json::json;

/// Paths over a small fixed key space so operations collide often
fn arb_path() -> impl Strategy<Value = Path> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 1..=3)
        .prop_map(|segments| Path::from_segments(segments).unwrap())
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        Just(json!({})),
        Just(json!({"a": 1, "b": {"c": 2}})),
        Just(json!([1, 2])),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Set(Path, Value),
    Remove(Path),
    Append(Path, i32, bool),
    Pull(Path, i32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_path(), arb_value()).prop_map(|(p, v)| Op::Set(p, v)),
        arb_path().prop_map(Op::Remove),
        (arb_path(), 0..3i32, any::<bool>()).prop_map(|(p, v, x)| Op::Append(p, v, x)),
        (arb_path(), 0..3i32).prop_map(|(p, v)| Op::Pull(p, v)),
    ]
}

fn apply(cache: &mut ChangeCache, op: &Op) {
    match op {
        Op::Set(p, v) => {
            cache.set(p, v.clone());
        }
        Op::Remove(p) => {
            cache.remove(p);
        }
        Op::Append(p, v, exclusive) => {
            cache.list_append(p, *v, *exclusive);
        }
        Op::Pull(p, v) => {
            cache.list_remove_value(p, &json!(*v));
        }
    }
}

fn initial() -> ChangeCache {
    ChangeCache::from_value(json!({"a": {"a": 1, "b": [1, 2]}, "b": 2, "c": {"c": {}}})).unwrap()
}

proptest! {
    #[test]
    fn test_updated_entries_equal_live_values(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut cache = initial();
        for op in &ops {
            apply(&mut cache, op);
        }
        let snapshot = cache.data().clone();
        let packed = cache.pack(true).into_owned();

        for (dotted, value) in &packed.updated {
            let path = Path::parse(dotted).unwrap();
            prop_assert_eq!(resolve_value(&snapshot, &path).ok(), Some(value));
        }
        for dotted in &packed.removed {
            let path = Path::parse(dotted).unwrap();
            prop_assert!(resolve_value(&snapshot, &path).is_err());
        }
    }

    #[test]
    fn test_shadow_trees_stay_disjoint(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut cache = initial();
        for op in &ops {
            apply(&mut cache, op);
            let tracker = cache.tracker();
            for leaf in tracker.removed().leaf_paths() {
                prop_assert!(!tracker.updated().covers(&Path::parse(&leaf).unwrap()));
            }
            for leaf in tracker.updated().leaf_paths() {
                prop_assert!(!tracker.removed().covers(&Path::parse(&leaf).unwrap()));
            }
        }
    }

    #[test]
    fn test_no_path_is_both_removed_and_updated(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut cache = initial();
        for op in &ops {
            apply(&mut cache, op);
        }
        let packed = cache.pack(true).into_owned();
        for dotted in &packed.removed {
            prop_assert!(!packed.updated.contains_key(dotted));
        }
        prop_assert!(cache.pack(true).is_empty());
    }

    #[test]
    fn test_failed_operations_leave_state_untouched(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut cache = initial();
        for op in &ops {
            let data_before = cache.data().clone();
            let tracker_before = cache.tracker().clone();
            let ok = match op {
                Op::Set(p, v) => cache.set(p, v.clone()),
                Op::Remove(p) => cache.remove(p),
                Op::Append(p, v, x) => cache.list_append(p, *v, *x),
                Op::Pull(p, v) => cache.list_remove_value(p, &json!(*v)),
            };
            if !ok {
                prop_assert_eq!(cache.data(), &data_before);
                prop_assert_eq!(cache.tracker(), &tracker_before);
            }
        }
    }
}
