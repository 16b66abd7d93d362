//! Key-value persistence for compiled dictionaries.
//!
//! A compiled dictionary is stored as one entry per synonym mapping and per
//! dictionary word under composite keys, plus a single metadata record:
//!
//! | key                          | value                  |
//! |------------------------------|------------------------|
//! | `["synonyms", word]`         | replacement string     |
//! | `["dictionary", word]`       | `true`                 |
//! | `["metadata", "dictionary"]` | [`DictionaryMetadata`] |
//!
//! # Architecture
//!
//! - **KeyValueStore trait**: batched writes, prefix listing and deletes
//! - **StoreConfig enum**: configuration for the supported backends
//! - **StoreFactory**: helper for constructing concrete stores
//! - **DictionaryStore**: dictionary-level operations on top of any store
//!
//! # Example
//!
//! ```
//! use shukuyaku::storage::{KeyValueStore, KvKey, StoreConfig, StoreFactory};
//!
//! # fn main() -> shukuyaku::error::Result<()> {
//! let store = StoreFactory::create(StoreConfig::Memory)?;
//! store.set_batch(vec![(KvKey::synonym("コンピュータ"), "電算機".into())])?;
//!
//! let value = store.get(&KvKey::synonym("コンピュータ"))?;
//! assert_eq!(value.as_ref().and_then(|v| v.as_str()), Some("電算機"));
//! # Ok(())
//! # }
//! ```
//!
//! [`DictionaryMetadata`]: crate::dictionary::DictionaryMetadata

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

pub mod dictionary_store;
pub mod file;
pub mod memory;
pub mod retry;

pub use dictionary_store::{DictionaryStore, StoreStats};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use retry::RetryPolicy;

/// Key prefix of synonym mappings.
pub const SYNONYMS_PREFIX: &str = "synonyms";
/// Key prefix of dictionary words.
pub const DICTIONARY_PREFIX: &str = "dictionary";
/// Key prefix of metadata records.
pub const METADATA_PREFIX: &str = "metadata";

/// A composite key made of string parts.
///
/// Keys order part by part, so all keys sharing a prefix are contiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KvKey(Vec<String>);

impl KvKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KvKey(parts.into_iter().map(Into::into).collect())
    }

    /// `["synonyms", word]`
    pub fn synonym(word: &str) -> Self {
        KvKey::new([SYNONYMS_PREFIX, word])
    }

    /// `["dictionary", word]`
    pub fn dictionary_word(word: &str) -> Self {
        KvKey::new([DICTIONARY_PREFIX, word])
    }

    /// `["metadata", "dictionary"]`
    pub fn metadata() -> Self {
        KvKey::new([METADATA_PREFIX, DICTIONARY_PREFIX])
    }

    /// A single-part key used as a listing prefix.
    pub fn prefix(part: &str) -> Self {
        KvKey::new([part])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// The last part of the key.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn starts_with(&self, prefix: &KvKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for KvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// A trait for key-value backends that can hold a dictionary.
///
/// Writes within one call to [`KeyValueStore::set_batch`] or
/// [`KeyValueStore::delete_batch`] are applied all-or-nothing. Nothing is
/// promised across calls.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Get the value stored under `key`.
    fn get(&self, key: &KvKey) -> Result<Option<Value>>;

    /// Set every entry of the batch atomically.
    fn set_batch(&self, entries: Vec<(KvKey, Value)>) -> Result<()>;

    /// All entries whose key starts with `prefix`, in key order.
    fn list_by_prefix(&self, prefix: &KvKey) -> Result<Vec<(KvKey, Value)>>;

    /// Delete every key of the batch atomically. Missing keys are ignored.
    fn delete_batch(&self, keys: &[KvKey]) -> Result<()>;

    /// Delete a single key.
    fn delete(&self, key: &KvKey) -> Result<()> {
        self.delete_batch(std::slice::from_ref(key))
    }

    /// Number of entries whose key starts with `prefix`.
    fn count_by_prefix(&self, prefix: &KvKey) -> Result<usize> {
        Ok(self.list_by_prefix(prefix)?.len())
    }

    /// Delete every entry whose key starts with `prefix` and return how many
    /// were removed.
    fn delete_by_prefix(&self, prefix: &KvKey) -> Result<usize> {
        let keys: Vec<KvKey> = self
            .list_by_prefix(prefix)?
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        self.delete_batch(&keys)?;
        Ok(keys.len())
    }
}

/// Configuration for the supported store backends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-process store, lost on exit.
    #[default]
    Memory,
    /// A JSON file on disk.
    File { path: PathBuf },
}

/// Factory for creating stores from a [`StoreConfig`].
pub struct StoreFactory;

impl StoreFactory {
    pub fn create(config: StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
        match config {
            StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreConfig::File { path } => Ok(Arc::new(FileStore::open(path)?)),
        }
    }
}
