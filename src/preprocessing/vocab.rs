use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer};

/// String inventory mapping every distinct entry to a dense id.
///
/// Id 0 is reserved for the default (unknown) token, so any lookup of an unseen entry
/// yields 0 and every entry added through `add` gets an id of at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocab {
    #[serde(serialize_with = "serialize_sorted")]
    s2i: HashMap<String, u32>,
    i2s: Vec<String>,
    freq: Vec<u32>,
}

fn serialize_sorted<S: Serializer>(
    map: &HashMap<String, u32>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    map.iter().collect::<BTreeMap<_, _>>().serialize(serializer)
}

const DEFAULT_CAPACITY: usize = 32;
pub static UNKNOWN_TOKEN: &'static str = "<UNK>";

impl Vocab {
    pub fn new() -> Self {
        Self::with_capacity_and_default_token(DEFAULT_CAPACITY, UNKNOWN_TOKEN)
    }

    pub fn with_default_token<S: Into<String>>(default_token: S) -> Self {
        Self::with_capacity_and_default_token(DEFAULT_CAPACITY, default_token)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_default_token(capacity, UNKNOWN_TOKEN)
    }

    pub fn with_capacity_and_default_token<S: Into<String>>(
        capacity: usize,
        default_token: S,
    ) -> Self {
        let default_token = default_token.into();
        let mut s2i = HashMap::with_capacity(capacity);
        s2i.insert(default_token.clone(), 0);
        let mut i2s = Vec::with_capacity(capacity);
        i2s.push(default_token);
        let mut freq = Vec::with_capacity(capacity);
        freq.push(0);
        Vocab {
            s2i: s2i,
            i2s: i2s,
            freq: freq,
        }
    }

    /// Adds one occurrence of `word` and returns its id.
    pub fn add<S: Into<String> + Borrow<str>>(&mut self, word: S) -> u32 {
        if let Some(&id) = self.s2i.get(word.borrow()) {
            if id > 0 {
                self.freq[id as usize] += 1;
            }
            return id;
        }
        let word = word.into();
        let id = self.i2s.len() as u32;
        self.i2s.push(word.clone());
        self.s2i.insert(word, id);
        self.freq.push(1);
        id
    }

    pub fn get<Q: Borrow<str> + ?Sized>(&self, word: &Q) -> u32 {
        self.s2i.get(word.borrow()).map(|v| *v).unwrap_or(0)
    }

    pub fn contains<Q: Borrow<str> + ?Sized>(&self, word: &Q) -> bool {
        self.s2i.contains_key(word.borrow())
    }

    pub fn freq(&self, id: u32) -> Option<u32> {
        self.freq.get(id as usize).map(|v| *v)
    }

    pub fn lookup(&self, id: u32) -> Option<&str> {
        self.i2s.get(id as usize).map(|v| v.as_str())
    }

    /// Number of entries, the default token included.
    pub fn size(&self) -> usize {
        self.i2s.len()
    }

    /// Added entries in id order; the default token is skipped.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.i2s.iter().skip(1).map(|s| s.as_str())
    }
}

impl Default for Vocab {
    fn default() -> Self {
        Vocab::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json;

    use super::Vocab;

    #[test]
    fn assigns_dense_ids_and_counts() {
        let mut v = Vocab::new();
        assert_eq!(v.add("nsubj"), 1);
        assert_eq!(v.add("obj".to_string()), 2);
        assert_eq!(v.add("nsubj"), 1);
        assert_eq!(v.size(), 3);
        assert_eq!(v.freq(1), Some(2));
        assert_eq!(v.freq(2), Some(1));
        assert_eq!(v.lookup(2), Some("obj"));
        assert_eq!(v.entries().collect::<Vec<_>>(), vec!["nsubj", "obj"]);
    }

    #[test]
    fn serializes_reproducibly() {
        let words = ["obj", "nsubj", "amod", "det", "case"];
        let mut forward = Vocab::new();
        let mut backward = Vocab::new();
        for word in &words {
            forward.add(*word);
        }
        for word in words.iter().rev() {
            backward.add(*word);
        }
        let json = serde_json::to_string(&forward).unwrap();
        assert!(json.starts_with(r#"{"s2i":{"<UNK>":0,"amod":3,"case":5,"det":4,"nsubj":2,"obj":1}"#));
        let restored: Vocab = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, forward);
        assert_ne!(serde_json::to_string(&backward).unwrap(), json);
    }

    #[test]
    fn maps_unknown_entries_to_default() {
        let mut v = Vocab::with_default_token("dep");
        v.add("amod");
        assert_eq!(v.get("nmod"), 0);
        assert_eq!(v.lookup(0), Some("dep"));
        assert_eq!(v.add("dep"), 0);
        assert_eq!(v.freq(0), Some(0));
    }
}
