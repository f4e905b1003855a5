// Deduplicating dictionary for IPC-2581 export
// Every distinct key gets exactly one entry and one stable string id;
// re-inserting an equal key hands back the id issued the first time.

use indexmap::IndexMap;
use std::hash::Hash;

/// A dictionary entry: the id written to the document plus its value
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V> {
    pub id: String,
    pub value: V,
}

#[derive(Debug, Clone)]
pub struct Interner<K, V> {
    entries: IndexMap<K, Entry<V>>,
}

impl<K, V> Default for Interner<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> Interner<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `key`, creating the entry on first use
    ///
    /// `make` is only called when the key is not present yet.
    pub fn intern_with(&mut self, key: K, make: impl FnOnce(&K) -> (String, V)) -> &str {
        let entry = self.entries.entry(key).or_insert_with_key(|key| {
            let (id, value) = make(key);
            Entry { id, value }
        });
        &entry.id
    }

    pub fn get(&self, key: &K) -> Option<&str> {
        self.entries.get(key).map(|e| e.id.as_str())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &Entry<V>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
