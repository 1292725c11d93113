//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple model and to verify the
//! tag index stays consistent with the keyed store.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::{codec, derive_key, CacheStore};

// == Strategies ==
/// Generates caller keys from a small pool so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

fn tags_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[xyz]", 0..4)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Save { key: String, value: String, tags: Vec<String> },
    SaveNumber { key: String, value: u64 },
    Get { key: String },
    GetByTag { tag: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy(), tags_strategy())
            .prop_map(|(key, value, tags)| CacheOp::Save { key, value, tags }),
        (key_strategy(), any::<u64>()).prop_map(|(key, value)| CacheOp::SaveNumber { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        "[xyz]".prop_map(|tag| CacheOp::GetByTag { tag }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn as_strs(tags: &[String]) -> Vec<&str> {
    tags.iter().map(String::as_str).collect()
}

/// Every key listed under a tag exists and its envelope carries that tag.
fn assert_index_consistent(store: &CacheStore, keys: &[String], tags: &[&str]) {
    for tag in tags {
        let mut listed = 0;
        for key in keys {
            let cache_key = derive_key::<String>(key);
            let Some(encoded) = store.entries_for_test().get(&cache_key) else {
                continue;
            };
            let header = codec::decode_header(&cache_key, encoded).unwrap();
            if header.into_tags().iter().any(|t| t == tag) {
                listed += 1;
            }
        }
        assert_eq!(store.tag_len(tag), listed, "tag '{}' out of step", tag);
        assert_eq!(store.contains_tag(tag), listed > 0, "tag '{}' bucket state", tag);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of operations, Get returns exactly what a plain map
    // model holds, per type, and the tag index never lists a missing key.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::default();
        let mut strings: HashMap<String, (String, Vec<String>)> = HashMap::new();
        let mut numbers: HashMap<String, u64> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Save { key, value, tags } => {
                    store.save(&key, &value, None, &as_strs(&tags)).unwrap();
                    strings.insert(key, (value, tags));
                }
                CacheOp::SaveNumber { key, value } => {
                    store.save(&key, &value, None, &[]).unwrap();
                    numbers.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get::<String>(&key).unwrap();
                    prop_assert_eq!(got, strings.get(&key).map(|(v, _)| v.clone()));
                    prop_assert_eq!(store.get::<u64>(&key).unwrap(), numbers.get(&key).copied());
                }
                CacheOp::GetByTag { tag } => {
                    let mut got = store.get_by_tag::<String>(&tag).unwrap();
                    let mut expected: Vec<String> = strings
                        .values()
                        .filter(|(_, tags)| tags.contains(&tag))
                        .map(|(v, _)| v.clone())
                        .collect();
                    got.sort();
                    expected.sort();
                    prop_assert_eq!(got, expected);
                }
                CacheOp::Delete { key } => {
                    store.delete::<String>(&key).unwrap();
                    strings.remove(&key);
                }
            }
        }

        prop_assert_eq!(store.len(), strings.len() + numbers.len());

        let keys: Vec<String> = strings.keys().cloned().collect();
        assert_index_consistent(&store, &keys, &["x", "y", "z"]);
    }

    // *For any* key and value, saving then getting returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::default();

        store.save(&key, &value, None, &[]).unwrap();

        prop_assert_eq!(store.get::<String>(&key).unwrap(), Some(value));
    }

    // *For any* tagged key, delete removes it from the store and every tag.
    #[test]
    fn prop_delete_removes_entry_and_tags(
        key in key_strategy(),
        value in value_strategy(),
        tags in tags_strategy()
    ) {
        let mut store = CacheStore::default();

        store.save(&key, &value, None, &as_strs(&tags)).unwrap();
        store.delete::<String>(&key).unwrap();

        prop_assert!(store.get::<String>(&key).unwrap().is_none());
        for tag in &tags {
            prop_assert!(!store.contains_tag(tag));
            prop_assert!(store.get_by_tag::<String>(tag).unwrap().is_empty());
        }
        prop_assert_eq!(store.tag_count(), 0);
    }

    // *For any* number of repeated saves with the same tags, each tag lists
    // the key once.
    #[test]
    fn prop_tag_membership_idempotent(
        key in key_strategy(),
        tags in prop::collection::vec("[xyz]", 1..6),
        repeats in 1usize..5
    ) {
        let mut store = CacheStore::default();

        for _ in 0..repeats {
            store.save(&key, &1u8, None, &as_strs(&tags)).unwrap();
        }

        let distinct: HashSet<&String> = tags.iter().collect();
        for tag in distinct {
            prop_assert_eq!(store.tag_len(tag), 1);
        }
    }
}
