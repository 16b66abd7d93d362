//! Dictionary-level operations over a [`KeyValueStore`].

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dictionary::compiled::{BuildSource, CompiledDictionary, DictionaryMetadata};
use crate::error::{Result, ShukuyakuError};
use crate::storage::retry::RetryPolicy;
use crate::storage::{DICTIONARY_PREFIX, KeyValueStore, KvKey, SYNONYMS_PREFIX};

/// Default number of entries written per batch.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Summary of what a store currently holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub is_initialized: bool,
    pub synonym_count: usize,
    pub dictionary_word_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub build_source: Option<BuildSource>,
}

/// Reads and writes a compiled dictionary in a key-value store.
///
/// The metadata record doubles as the "initialized" marker. [`publish`]
/// removes it before touching any entry and writes it back only after every
/// batch has been committed, so a publish that fails halfway leaves a store
/// that reports itself as uninitialized.
///
/// [`publish`]: DictionaryStore::publish
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    store: Arc<dyn KeyValueStore>,
    batch_size: usize,
    retry: RetryPolicy,
}

impl DictionaryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        DictionaryStore {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the number of entries per batch. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// The replacement stored for `word`.
    pub fn get_synonym(&self, word: &str) -> Result<Option<String>> {
        Ok(self
            .store
            .get(&KvKey::synonym(word))?
            .and_then(|value| value.as_str().map(String::from)))
    }

    /// Whether `word` is stored as a dictionary word.
    pub fn word_exists(&self, word: &str) -> Result<bool> {
        Ok(self.store.get(&KvKey::dictionary_word(word))?.is_some())
    }

    /// The metadata of the published dictionary, if any.
    pub fn metadata(&self) -> Result<Option<DictionaryMetadata>> {
        match self.store.get(&KvKey::metadata())? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// A store is initialized once metadata with at least one synonym exists.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self
            .metadata()?
            .is_some_and(|metadata| metadata.synonym_count > 0))
    }

    /// Statistics from the metadata record, or from counting entries when the
    /// metadata is missing.
    pub fn stats(&self) -> Result<StoreStats> {
        if let Some(metadata) = self.metadata()? {
            return Ok(StoreStats {
                is_initialized: metadata.synonym_count > 0,
                synonym_count: metadata.synonym_count,
                dictionary_word_count: metadata.dictionary_word_count,
                last_updated: Some(metadata.last_updated),
                build_source: Some(metadata.build_source),
            });
        }

        debug!("No dictionary metadata, counting entries");
        Ok(StoreStats {
            is_initialized: false,
            synonym_count: self.store.count_by_prefix(&KvKey::prefix(SYNONYMS_PREFIX))?,
            dictionary_word_count: self
                .store
                .count_by_prefix(&KvKey::prefix(DICTIONARY_PREFIX))?,
            last_updated: None,
            build_source: None,
        })
    }

    /// Remove every synonym, dictionary word and the metadata record.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize> {
        // Metadata goes first so a partial clear reads as uninitialized.
        let metadata = usize::from(self.store.get(&KvKey::metadata())?.is_some());
        self.store.delete(&KvKey::metadata())?;
        let synonyms = self.store.delete_by_prefix(&KvKey::prefix(SYNONYMS_PREFIX))?;
        let words = self.store.delete_by_prefix(&KvKey::prefix(DICTIONARY_PREFIX))?;

        info!("Cleared dictionary store ({synonyms} synonyms, {words} words)");
        Ok(synonyms + words + metadata)
    }

    /// Replace the stored dictionary with `dictionary`.
    ///
    /// Entries are written in batches, each retried according to the retry
    /// policy. If a batch exhausts its retries the publish stops with
    /// [`ShukuyakuError::Persistence`] and no metadata is written.
    pub fn publish(
        &self,
        dictionary: &CompiledDictionary,
        build_source: BuildSource,
        now: DateTime<Utc>,
    ) -> Result<DictionaryMetadata> {
        self.clear()?;

        let entries: Vec<(KvKey, Value)> = dictionary
            .sorted_synonyms()
            .into_iter()
            .map(|(word, replacement)| (KvKey::synonym(word), Value::from(replacement)))
            .chain(
                dictionary
                    .sorted_words()
                    .into_iter()
                    .map(|word| (KvKey::dictionary_word(word), Value::Bool(true))),
            )
            .collect();

        let total_batches = entries.len().div_ceil(self.batch_size);
        info!(
            "Saving {} entries in {} batches of up to {}",
            entries.len(),
            total_batches,
            self.batch_size
        );

        for (index, batch) in entries.chunks(self.batch_size).enumerate() {
            let label = format!("Batch {}/{}", index + 1, total_batches);
            self.retry
                .run(&label, |_| self.store.set_batch(batch.to_vec()))
                .inspect_err(|e| warn!("Aborting publish: {e}"))?;
            debug!("{label} saved");
        }

        let metadata = dictionary.metadata(build_source, now);
        let value = serde_json::to_value(&metadata)?;
        self.retry
            .run("Metadata", |_| {
                self.store.set_batch(vec![(KvKey::metadata(), value.clone())])
            })?;

        info!(
            "Published {} synonyms and {} dictionary words",
            metadata.synonym_count, metadata.dictionary_word_count
        );
        Ok(metadata)
    }

    /// Reassemble the stored dictionary.
    pub fn load(&self) -> Result<CompiledDictionary> {
        let mut synonym_map = AHashMap::new();
        for (key, value) in self.store.list_by_prefix(&KvKey::prefix(SYNONYMS_PREFIX))? {
            let (Some(word), Some(replacement)) = (key.last(), value.as_str()) else {
                return Err(ShukuyakuError::storage(format!(
                    "Malformed synonym entry {key}"
                )));
            };
            synonym_map.insert(word.to_string(), replacement.to_string());
        }

        let dictionary_words: AHashSet<String> = self
            .store
            .list_by_prefix(&KvKey::prefix(DICTIONARY_PREFIX))?
            .into_iter()
            .filter_map(|(key, _)| key.last().map(String::from))
            .collect();

        Ok(CompiledDictionary::new(synonym_map, dictionary_words))
    }
}
