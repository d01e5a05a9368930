//! Property-based tests for the round-trip and ordering guarantees.
//!
//! Each property runs through both the hand-written engine entry points
//! and the serde bridge, and a few are cross-checked against serde_json.

use codable_json::{
    decode, encode, encode_to_string_with_options, from_str, to_string, Decode, Encode, EncodeOptions, Value,
    WriteOptions,
};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

fn codable_roundtrip<T: Encode + Decode + PartialEq + Debug>(value: &T) -> bool {
    match encode(value) {
        Ok(bytes) => match decode::<T>(&bytes) {
            Ok(back) => *value == back,
            Err(e) => {
                eprintln!("Decode failed: {}", e);
                eprintln!("Encoded was: {}", String::from_utf8_lossy(&bytes));
                false
            }
        },
        Err(e) => {
            eprintln!("Encode failed: {}", e);
            false
        }
    }
}

fn serde_roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + Debug>(value: &T) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u64,
    name: String,
    score: f64,
    tags: Vec<String>,
    parent: Option<i32>,
}

fn record() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        ".*",
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
        prop::collection::vec("[a-z]{0,8}", 0..5),
        proptest::option::of(any::<i32>()),
    )
        .prop_map(|(id, name, score, tags, parent)| Record {
            id,
            name,
            score,
            tags,
            parent,
        })
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,10}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-zA-Z_]{1,6}", inner), 0..6)
                .prop_map(|members| Value::Object(members.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(codable_roundtrip(&n));
        prop_assert!(serde_roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(codable_roundtrip(&n));
        prop_assert!(serde_roundtrip(&n));
    }

    #[test]
    fn prop_i16(n in any::<i16>()) {
        prop_assert!(codable_roundtrip(&n));
    }

    #[test]
    fn prop_finite_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(codable_roundtrip(&f));
        prop_assert!(serde_roundtrip(&f));
    }

    #[test]
    fn prop_finite_f32(f in any::<f32>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(codable_roundtrip(&f));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(codable_roundtrip(&b));
    }

    #[test]
    fn prop_string(s in "\\PC*") {
        prop_assert!(codable_roundtrip(&s));
        prop_assert!(serde_roundtrip(&s));
    }

    #[test]
    fn prop_printable_string_matches_serde_json(s in "[ -~]*") {
        prop_assert_eq!(to_string(&s).unwrap(), serde_json::to_string(&s).unwrap());
    }

    #[test]
    fn prop_vec_option(v in prop::collection::vec(proptest::option::of(any::<i32>()), 0..20)) {
        prop_assert!(codable_roundtrip(&v));
        prop_assert!(serde_roundtrip(&v));
    }

    #[test]
    fn prop_string_map(m in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..10)) {
        prop_assert!(codable_roundtrip(&m));
        prop_assert!(serde_roundtrip(&m));
    }

    #[test]
    fn prop_tuple(t in (any::<u8>(), "[a-z]*", any::<bool>())) {
        prop_assert!(codable_roundtrip(&t));
    }

    #[test]
    fn prop_record(r in record()) {
        prop_assert!(serde_roundtrip(&r));
        let ours: serde_json::Value = serde_json::from_str(&to_string(&r).unwrap()).unwrap();
        let theirs = serde_json::to_value(&r).unwrap();
        prop_assert_eq!(ours, theirs);
    }

    #[test]
    fn prop_value_roundtrip(v in json_value()) {
        prop_assert!(codable_roundtrip(&v));
        prop_assert!(serde_roundtrip(&v));
    }

    #[test]
    fn prop_sorting_is_idempotent(v in json_value()) {
        let options = EncodeOptions::new().with_write_options(WriteOptions::SORTED_KEYS);
        let once = encode_to_string_with_options(&v, &options).unwrap();
        let reparsed: Value = decode(once.as_bytes()).unwrap();
        let twice = encode_to_string_with_options(&reparsed, &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_sorted_keys_are_ordered(m in prop::collection::hash_map("[a-zA-Z]{1,6}", any::<u8>(), 0..12)) {
        let options = EncodeOptions::new().with_write_options(WriteOptions::SORTED_KEYS);
        let json = encode_to_string_with_options(&m, &options).unwrap();
        let back: Value = decode(json.as_bytes()).unwrap();
        let keys: Vec<String> = back.as_object().unwrap().keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}

#[test]
fn test_boundary_integers() {
    for n in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX] {
        assert!(codable_roundtrip(&n));
    }
    for n in [0u64, u64::from(u32::MAX), i64::MAX as u64, i64::MAX as u64 + 1, u64::MAX] {
        assert!(codable_roundtrip(&n));
    }
    let map: BTreeMap<String, u64> = [("max".to_string(), u64::MAX)].into_iter().collect();
    assert!(codable_roundtrip(&map));
}
