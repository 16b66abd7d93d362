//! The compiled dictionary artifact and its metadata.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShukuyakuError};

/// The immutable result of one build cycle.
///
/// `synonym_map` maps a word to its cheaper replacement and never maps a
/// word to itself. `dictionary_words` holds every word seen in any group,
/// including words that received no replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledDictionary {
    synonym_map: AHashMap<String, String>,
    dictionary_words: AHashSet<String>,
}

impl CompiledDictionary {
    /// Assemble a dictionary from its parts, dropping self-mappings.
    pub fn new(
        mut synonym_map: AHashMap<String, String>,
        dictionary_words: AHashSet<String>,
    ) -> Self {
        synonym_map.retain(|word, replacement| {
            if word == replacement {
                debug!("Dropping self-mapping for '{word}'");
                false
            } else {
                true
            }
        });

        CompiledDictionary {
            synonym_map,
            dictionary_words,
        }
    }

    /// An empty dictionary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the replacement registered for `word`, if any.
    pub fn replacement(&self, word: &str) -> Option<&str> {
        self.synonym_map.get(word).map(String::as_str)
    }

    /// Whether `word` appeared in any synonym group.
    pub fn contains_word(&self, word: &str) -> bool {
        self.dictionary_words.contains(word)
    }

    pub fn synonym_count(&self) -> usize {
        self.synonym_map.len()
    }

    pub fn word_count(&self) -> usize {
        self.dictionary_words.len()
    }

    pub fn synonym_map(&self) -> &AHashMap<String, String> {
        &self.synonym_map
    }

    pub fn dictionary_words(&self) -> &AHashSet<String> {
        &self.dictionary_words
    }

    /// Mappings sorted by source word.
    pub fn sorted_synonyms(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .synonym_map
            .iter()
            .map(|(w, r)| (w.as_str(), r.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Dictionary words in sorted order.
    pub fn sorted_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.dictionary_words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }

    /// Describe this dictionary for staleness checks.
    pub fn metadata(&self, build_source: BuildSource, now: DateTime<Utc>) -> DictionaryMetadata {
        DictionaryMetadata {
            version: now.to_rfc3339(),
            synonym_count: self.synonym_count(),
            dictionary_word_count: self.word_count(),
            last_updated: now,
            build_source,
        }
    }

    /// Write the dictionary as a JSON snapshot.
    ///
    /// Keys and words are sorted so the same dictionary always produces the
    /// same file. The file is written to a temporary sibling and renamed into
    /// place.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let snapshot = SnapshotFile {
            synonym_map: self
                .sorted_synonyms()
                .into_iter()
                .map(|(w, r)| (w.to_string(), r.to_string()))
                .collect(),
            dictionary_words: self.sorted_words().into_iter().map(String::from).collect(),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| {
            ShukuyakuError::storage(format!(
                "Failed to persist snapshot to '{}': {}",
                path.display(),
                e
            ))
        })?;

        info!(
            "Saved dictionary snapshot to {} ({} synonyms, {} words)",
            path.display(),
            self.synonym_count(),
            self.word_count()
        );
        Ok(())
    }

    /// Load a dictionary from a JSON snapshot.
    ///
    /// Accepts `{"synonymMap": {...}, "dictionaryWords": [...]}` as well as a
    /// bare `{word: replacement}` object written by older builds, which yields
    /// an empty word set.
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ShukuyakuError::storage(format!(
                "Failed to read dictionary snapshot '{}': {}",
                path.display(),
                e
            ))
        })?;
        let dictionary = Self::from_snapshot_json(&content)?;

        info!(
            "Loaded dictionary snapshot from {} ({} synonyms, {} words)",
            path.display(),
            dictionary.synonym_count(),
            dictionary.word_count()
        );
        Ok(dictionary)
    }

    /// Parse a snapshot from its JSON text.
    pub fn from_snapshot_json(content: &str) -> Result<Self> {
        let snapshot: SnapshotFormat = serde_json::from_str(content)?;
        let dictionary = match snapshot {
            SnapshotFormat::Full(file) => Self::new(
                file.synonym_map.into_iter().collect(),
                file.dictionary_words.into_iter().collect(),
            ),
            SnapshotFormat::Legacy(map) => Self::new(map.into_iter().collect(), AHashSet::new()),
        };
        Ok(dictionary)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    synonym_map: BTreeMap<String, String>,
    #[serde(default)]
    dictionary_words: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFormat {
    Full(SnapshotFile),
    Legacy(BTreeMap<String, String>),
}

/// Where a published dictionary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSource {
    /// Compiled from the Sudachi synonym source.
    Sudachi,
    /// Loaded from a snapshot file.
    Prebuilt,
}

/// Describes a published dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryMetadata {
    pub version: String,
    pub synonym_count: usize,
    pub dictionary_word_count: usize,
    pub last_updated: DateTime<Utc>,
    pub build_source: BuildSource,
}
