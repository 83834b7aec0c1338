// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The statistics store interface and its in-memory implementation.

use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;

use fnv::FnvHasher;
use hashbrown::HashMap;
use serde::Serialize;

use crate::errors::StoreError;

/// Increment primitives a statistics backend must provide. Each call must be atomic for its
/// key; callers never rely on ordering between keys.
pub trait Store {
    fn increment_counter(&mut self, key: &str) -> Result<(), StoreError>;

    fn increment_sorted_set_member(
        &mut self,
        key: &str,
        member: &str,
        delta: i64,
    ) -> Result<(), StoreError>;

    fn increment_hash_field(&mut self, key: &str, field: &str, delta: i64)
        -> Result<(), StoreError>;
}

type FnvMap<V> = HashMap<String, V, BuildHasherDefault<FnvHasher>>;

const COUNTER: &str = "counter";
const SORTED_SET: &str = "sorted set";
const HASH: &str = "hash";

/// Keeps every aggregate in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counters: FnvMap<i64>,
    sorted_sets: FnvMap<FnvMap<i64>>,
    hashes: FnvMap<FnvMap<i64>>,
}

impl MemoryStore {
    pub fn counter(&self, key: &str) -> Option<i64> {
        self.counters.get(key).copied()
    }

    pub fn score(&self, key: &str, member: &str) -> Option<i64> {
        self.sorted_sets.get(key)?.get(member).copied()
    }

    pub fn hash_field(&self, key: &str, field: &str) -> Option<i64> {
        self.hashes.get(key)?.get(field).copied()
    }

    /// The `n` highest scoring members of a sorted set, ties broken by member name.
    pub fn top(&self, key: &str, n: usize) -> Vec<(String, i64)> {
        self.sorted_sets
            .get(key)
            .map(|set| {
                let mut ranked = ranked(set);
                ranked.truncate(n);
                ranked
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.counters.len() + self.sorted_sets.len() + self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            counters: self
                .counters
                .iter()
                .map(|(key, value)| (key.clone(), *value))
                .collect(),
            sorted_sets: self
                .sorted_sets
                .iter()
                .map(|(key, set)| (key.clone(), ranked(set)))
                .collect(),
            hashes: self
                .hashes
                .iter()
                .map(|(key, fields)| {
                    let fields = fields
                        .iter()
                        .map(|(field, value)| (field.clone(), *value))
                        .collect();
                    (key.clone(), fields)
                })
                .collect(),
        }
    }

    fn kind_of(&self, key: &str) -> Option<&'static str> {
        if self.counters.contains_key(key) {
            Some(COUNTER)
        } else if self.sorted_sets.contains_key(key) {
            Some(SORTED_SET)
        } else if self.hashes.contains_key(key) {
            Some(HASH)
        } else {
            None
        }
    }

    fn check_kind(&self, key: &str, expected: &'static str) -> Result<(), StoreError> {
        match self.kind_of(key) {
            Some(actual) if actual != expected => Err(StoreError::WrongType {
                key: key.to_string(),
                expected,
                actual,
            }),
            _ => Ok(()),
        }
    }
}

impl Store for MemoryStore {
    fn increment_counter(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_kind(key, COUNTER)?;
        bump(&mut self.counters, key, 1);
        Ok(())
    }

    fn increment_sorted_set_member(
        &mut self,
        key: &str,
        member: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        self.check_kind(key, SORTED_SET)?;
        bump(self.sorted_sets.entry_ref(key).or_default(), member, delta);
        Ok(())
    }

    fn increment_hash_field(
        &mut self,
        key: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        self.check_kind(key, HASH)?;
        bump(self.hashes.entry_ref(key).or_default(), field, delta);
        Ok(())
    }
}

fn bump(map: &mut FnvMap<i64>, key: &str, delta: i64) {
    *map.entry_ref(key).or_insert(0) += delta;
}

fn ranked(set: &FnvMap<i64>) -> Vec<(String, i64)> {
    let mut ranked: Vec<(String, i64)> = set
        .iter()
        .map(|(member, score)| (member.clone(), *score))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Ordered copy of a store's contents, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub counters: BTreeMap<String, i64>,
    /// Members ranked by descending score.
    pub sorted_sets: BTreeMap<String, Vec<(String, i64)>>,
    pub hashes: BTreeMap<String, BTreeMap<String, i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut store = MemoryStore::default();
        store.increment_counter("downloads").unwrap();
        store.increment_counter("downloads").unwrap();
        store.increment_counter("downloads:rubygem:rake").unwrap();

        assert_eq!(store.counter("downloads"), Some(2));
        assert_eq!(store.counter("downloads:rubygem:rake"), Some(1));
        assert_eq!(store.counter("downloads:rubygem:rails"), None);
    }

    #[test]
    fn test_sorted_set_ranking() {
        let mut store = MemoryStore::default();
        store
            .increment_sorted_set_member("downloads:all", "rake-10.4.2", 1)
            .unwrap();
        store
            .increment_sorted_set_member("downloads:all", "rack-1.6.4", 2)
            .unwrap();
        store
            .increment_sorted_set_member("downloads:all", "json-1.8.3", 2)
            .unwrap();

        assert_eq!(store.score("downloads:all", "rack-1.6.4"), Some(2));
        assert_eq!(
            store.top("downloads:all", 2),
            vec![
                ("json-1.8.3".to_string(), 2),
                ("rack-1.6.4".to_string(), 2)
            ]
        );
        assert!(store.top("downloads:today:2015-08-24", 5).is_empty());
    }

    #[test]
    fn test_hash_fields() {
        let mut store = MemoryStore::default();
        store
            .increment_hash_field("usage:ruby_version:2015-08-24", "2.0.0", 1)
            .unwrap();
        store
            .increment_hash_field("usage:ruby_version:2015-08-24", "2.2.3", 1)
            .unwrap();
        store
            .increment_hash_field("usage:ruby_version:2015-08-24", "2.0.0", 1)
            .unwrap();

        assert_eq!(
            store.hash_field("usage:ruby_version:2015-08-24", "2.0.0"),
            Some(2)
        );
        assert_eq!(
            store.hash_field("usage:ruby_version:2015-08-24", "2.2.3"),
            Some(1)
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_wrong_type() {
        let mut store = MemoryStore::default();
        store.increment_counter("downloads").unwrap();

        let result = store.increment_hash_field("downloads", "2015-08-24", 1);
        assert!(matches!(
            result,
            Err(StoreError::WrongType {
                expected: "hash",
                actual: "counter",
                ..
            })
        ));
        assert_eq!(store.hash_field("downloads", "2015-08-24"), None);
    }

    #[test]
    fn test_snapshot_serializes_in_key_order() {
        let mut store = MemoryStore::default();
        store.increment_counter("downloads:version:rake-10.4.2").unwrap();
        store.increment_counter("downloads").unwrap();
        store
            .increment_sorted_set_member("downloads:all", "rake-10.4.2", 1)
            .unwrap();
        store
            .increment_hash_field("downloads:rubygem_history:rake", "2015-08-24", 1)
            .unwrap();

        let json = serde_json::to_string(&store.snapshot()).unwrap();
        assert_eq!(
            json,
            r#"{"counters":{"downloads":1,"downloads:version:rake-10.4.2":1},"sorted_sets":{"downloads:all":[["rake-10.4.2",1]]},"hashes":{"downloads:rubygem_history:rake":{"2015-08-24":1}}}"#
        );
    }
}
