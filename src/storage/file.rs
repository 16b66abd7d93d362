//! File-based store implementation.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ShukuyakuError};
use crate::storage::memory::list_range;
use crate::storage::{KeyValueStore, KvKey};

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    key: KvKey,
    value: Value,
}

/// A key-value store persisted as a single JSON file.
///
/// The whole map is kept in memory. Every batch is applied to a copy, the
/// copy is written to a temporary sibling file and renamed over the store
/// file, and only then does the in-memory map change. A batch that fails to
/// persist therefore leaves both the file and the map as they were.
#[derive(Debug)]
pub struct FileStore {
    /// The store file.
    path: PathBuf,
    entries: RwLock<BTreeMap<KvKey, Value>>,
}

impl FileStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet. The file itself is written on the first batch.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries: BTreeMap<KvKey, Value> = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                ShukuyakuError::storage(format!(
                    "Failed to read store '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let stored: Vec<StoredEntry> = serde_json::from_str(&content)?;
            stored
                .into_iter()
                .map(|entry| (entry.key, entry.value))
                .collect()
        } else {
            BTreeMap::new()
        };

        debug!("Opened store {} with {} entries", path.display(), entries.len());
        Ok(FileStore {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the map, persist it, then swap it in.
    fn commit<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<KvKey, Value>),
    {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        change(&mut next);
        self.write_file(&next)?;
        *entries = next;
        Ok(())
    }

    fn write_file(&self, entries: &BTreeMap<KvKey, Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let stored: Vec<StoredEntry> = entries
            .iter()
            .map(|(key, value)| StoredEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, &stored)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| {
            ShukuyakuError::storage(format!(
                "Failed to persist store '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &KvKey) -> Result<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_batch(&self, batch: Vec<(KvKey, Value)>) -> Result<()> {
        self.commit(|entries| entries.extend(batch))
    }

    fn list_by_prefix(&self, prefix: &KvKey) -> Result<Vec<(KvKey, Value)>> {
        Ok(list_range(&self.entries.read(), prefix))
    }

    fn delete_batch(&self, keys: &[KvKey]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.commit(|entries| {
            for key in keys {
                entries.remove(key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SYNONYMS_PREFIX;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.get(&KvKey::metadata()).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let store = FileStore::open(&path).unwrap();
            store
                .set_batch(vec![
                    (KvKey::synonym("コンピュータ"), Value::from("電算機")),
                    (KvKey::dictionary_word("コンピュータ"), Value::Bool(true)),
                ])
                .unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(
            store.get(&KvKey::synonym("コンピュータ")).unwrap(),
            Some(Value::from("電算機"))
        );
        assert_eq!(
            store.get(&KvKey::dictionary_word("コンピュータ")).unwrap(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_delete_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store
            .set_batch(vec![
                (KvKey::synonym("a"), Value::from("b")),
                (KvKey::synonym("c"), Value::from("d")),
            ])
            .unwrap();
        assert_eq!(store.delete_by_prefix(&KvKey::prefix(SYNONYMS_PREFIX)).unwrap(), 2);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.count_by_prefix(&KvKey::prefix(SYNONYMS_PREFIX)).unwrap(), 0);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(ShukuyakuError::Json(_))));
    }
}
