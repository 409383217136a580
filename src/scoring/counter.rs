use std::collections::hash_map::{self, HashMap};
use std::hash::Hash;
use std::iter::FromIterator;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Occurrence counts keyed by value; absent keys count zero.
///
/// Serialized as a sequence of `(key, count)` pairs sorted by key since keys are not
/// strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter<K: Eq + Hash> {
    counts: HashMap<K, u64>,
}

impl<K: Eq + Hash> Counter<K> {
    pub fn new() -> Self {
        Counter {
            counts: HashMap::new(),
        }
    }

    pub fn increment(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &K) -> u64 {
        self.counts.get(key).cloned().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> hash_map::Iter<K, u64> {
        self.counts.iter()
    }
}

impl<K: Eq + Hash> Default for Counter<K> {
    fn default() -> Self {
        Counter::new()
    }
}

impl<K: Eq + Hash> FromIterator<K> for Counter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Counter::new();
        for key in iter {
            counter.increment(key);
        }
        counter
    }
}

impl<K: Eq + Hash + Ord + Serialize> Serialize for Counter<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pairs: Vec<(&K, &u64)> = self.counts.iter().collect();
        pairs.sort();
        serializer.collect_seq(pairs)
    }
}

impl<'de, K: Eq + Hash + Deserialize<'de>> Deserialize<'de> for Counter<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs: Vec<(K, u64)> = Vec::deserialize(deserializer)?;
        Ok(Counter {
            counts: pairs.into_iter().collect(),
        })
    }
}

/// `(tag, label)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagLabel(pub u32, pub u32);

/// `(head tag, child tag)` or `(child tag, head tag)`, depending on the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagPair(pub u32, pub u32);

/// `(head tag, child tag, label)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArcKey(pub u32, pub u32, pub u32);

/// `(head lemma, child lemma)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LemmaPair(pub u32, pub u32);

/// `(label, feature)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatLabel(pub u32, pub u32);

#[cfg(test)]
mod tests {
    use serde_json;

    use super::{Counter, TagPair};

    #[test]
    fn counts_keys() {
        let counter: Counter<TagPair> = vec![TagPair(1, 2), TagPair(1, 2), TagPair(2, 1)]
            .into_iter()
            .collect();
        assert_eq!(counter.get(&TagPair(1, 2)), 2);
        assert_eq!(counter.get(&TagPair(2, 1)), 1);
        assert_eq!(counter.get(&TagPair(3, 3)), 0);
        assert_eq!(counter.len(), 2);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn serializes_as_pairs() {
        let mut counter = Counter::new();
        counter.increment(TagPair(4, 5));
        let json = serde_json::to_string(&counter).unwrap();
        assert_eq!(json, "[[[4,5],1]]");
        let restored: Counter<TagPair> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, counter);
    }

    #[test]
    fn serializes_in_key_order() {
        let keys = vec![TagPair(9, 1), TagPair(2, 7), TagPair(2, 3), TagPair(9, 1)];
        let forward: Counter<TagPair> = keys.iter().cloned().collect();
        let backward: Counter<TagPair> = keys.iter().rev().cloned().collect();
        let json = serde_json::to_string(&forward).unwrap();
        assert_eq!(json, "[[[2,3],1],[[2,7],1],[[9,1],2]]");
        assert_eq!(serde_json::to_string(&backward).unwrap(), json);
    }
}
