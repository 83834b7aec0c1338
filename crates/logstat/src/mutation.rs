// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::errors::StoreError;
use crate::store::Store;

/// A single increment against the statistics store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mutation {
    IncrementCounter {
        key: String,
    },
    IncrementSortedSetMember {
        key: String,
        member: String,
        delta: i64,
    },
    IncrementHashField {
        key: String,
        field: String,
        delta: i64,
    },
}

impl Mutation {
    pub fn key(&self) -> &str {
        match self {
            Self::IncrementCounter { key }
            | Self::IncrementSortedSetMember { key, .. }
            | Self::IncrementHashField { key, .. } => key.as_str(),
        }
    }

    pub fn apply<S: Store + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        match self {
            Self::IncrementCounter { key } => store.increment_counter(key),
            Self::IncrementSortedSetMember { key, member, delta } => {
                store.increment_sorted_set_member(key, member, *delta)
            }
            Self::IncrementHashField { key, field, delta } => {
                store.increment_hash_field(key, field, *delta)
            }
        }
    }
}

/// Renders the equivalent Redis command, e.g. `HINCRBY downloads:rubygem_history:rake 2015-08-24 1`.
impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncrementCounter { key } => write!(f, "INCR {key}"),
            Self::IncrementSortedSetMember { key, member, delta } => {
                write!(f, "ZINCRBY {key} {delta} {member}")
            }
            Self::IncrementHashField { key, field, delta } => {
                write!(f, "HINCRBY {key} {field} {delta}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_display() {
        let counter = Mutation::IncrementCounter {
            key: "downloads".to_string(),
        };
        let zset = Mutation::IncrementSortedSetMember {
            key: "downloads:all".to_string(),
            member: "rake-10.4.2".to_string(),
            delta: 1,
        };
        let hash = Mutation::IncrementHashField {
            key: "downloads:rubygem_history:rake".to_string(),
            field: "2015-08-24".to_string(),
            delta: 1,
        };

        assert_eq!(counter.to_string(), "INCR downloads");
        assert_eq!(zset.to_string(), "ZINCRBY downloads:all 1 rake-10.4.2");
        assert_eq!(
            hash.to_string(),
            "HINCRBY downloads:rubygem_history:rake 2015-08-24 1"
        );
    }

    #[test]
    fn test_apply() {
        let mut store = MemoryStore::default();
        let mutations = [
            Mutation::IncrementCounter {
                key: "downloads".to_string(),
            },
            Mutation::IncrementSortedSetMember {
                key: "downloads:all".to_string(),
                member: "rake-10.4.2".to_string(),
                delta: 3,
            },
            Mutation::IncrementHashField {
                key: "downloads:rubygem_history:rake".to_string(),
                field: "2015-08-24".to_string(),
                delta: 2,
            },
        ];
        for mutation in &mutations {
            mutation.apply(&mut store).unwrap();
        }

        assert_eq!(store.counter("downloads"), Some(1));
        assert_eq!(store.score("downloads:all", "rake-10.4.2"), Some(3));
        assert_eq!(
            store.hash_field("downloads:rubygem_history:rake", "2015-08-24"),
            Some(2)
        );
        assert_eq!(mutations[1].key(), "downloads:all");
    }
}
