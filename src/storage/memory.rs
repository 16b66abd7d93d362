//! In-memory store implementation for testing and caching.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::Result;
use crate::storage::{KeyValueStore, KvKey};

/// An in-memory key-value store.
///
/// Batches are applied under a single write lock, so readers never observe
/// half a batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<KvKey, Value>>,
}

impl MemoryStore {
    /// Create a new, empty memory store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Get the number of entries stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &KvKey) -> Result<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_batch(&self, entries: Vec<(KvKey, Value)>) -> Result<()> {
        self.entries.write().extend(entries);
        Ok(())
    }

    fn list_by_prefix(&self, prefix: &KvKey) -> Result<Vec<(KvKey, Value)>> {
        Ok(list_range(&self.entries.read(), prefix))
    }

    fn delete_batch(&self, keys: &[KvKey]) -> Result<()> {
        let mut entries = self.entries.write();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

/// Entries of `map` under `prefix`. Keys sharing a prefix are contiguous, so
/// the scan starts at the prefix and stops at the first key past it.
pub(crate) fn list_range(map: &BTreeMap<KvKey, Value>, prefix: &KvKey) -> Vec<(KvKey, Value)> {
    map.range(prefix.clone()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DICTIONARY_PREFIX, SYNONYMS_PREFIX};

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .set_batch(vec![
                (KvKey::synonym("コンピュータ"), Value::from("電算機")),
                (KvKey::synonym("アルゴリズム"), Value::from("算法")),
                (KvKey::dictionary_word("コンピュータ"), Value::Bool(true)),
                (KvKey::metadata(), serde_json::json!({"synonymCount": 2})),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_get() {
        let store = store();
        assert_eq!(
            store.get(&KvKey::synonym("コンピュータ")).unwrap(),
            Some(Value::from("電算機"))
        );
        assert_eq!(store.get(&KvKey::synonym("猫")).unwrap(), None);
    }

    #[test]
    fn test_list_by_prefix() {
        let store = store();
        let synonyms = store.list_by_prefix(&KvKey::prefix(SYNONYMS_PREFIX)).unwrap();
        assert_eq!(synonyms.len(), 2);
        assert!(synonyms.iter().all(|(key, _)| key.parts()[0] == SYNONYMS_PREFIX));

        let words = store.list_by_prefix(&KvKey::prefix(DICTIONARY_PREFIX)).unwrap();
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_overwrite() {
        let store = store();
        store
            .set_batch(vec![(KvKey::synonym("コンピュータ"), Value::from("計算機"))])
            .unwrap();
        assert_eq!(
            store.get(&KvKey::synonym("コンピュータ")).unwrap(),
            Some(Value::from("計算機"))
        );
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_delete() {
        let store = store();
        store.delete(&KvKey::metadata()).unwrap();
        store.delete(&KvKey::metadata()).unwrap();
        assert_eq!(store.get(&KvKey::metadata()).unwrap(), None);

        let removed = store.delete_by_prefix(&KvKey::prefix(SYNONYMS_PREFIX)).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
    }
}
