//! Initialization and scheduled refresh of a stored dictionary.
//!
//! These are the primitives a scheduler (cron job, systemd timer, ...) calls.
//! Nothing here schedules anything by itself.

use chrono::{DateTime, TimeDelta, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::dictionary::builder::{BuildReport, SynonymMapBuilder};
use crate::dictionary::compiled::{BuildSource, DictionaryMetadata};
use crate::dictionary::source::DictionarySource;
use crate::error::Result;
use crate::storage::dictionary_store::{DictionaryStore, StoreStats};

/// Default maximum age of a stored dictionary.
pub fn default_max_age() -> TimeDelta {
    TimeDelta::days(1)
}

/// Result of [`DictionaryMaintainer::initialize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InitializeOutcome {
    /// The store was already initialized and nothing was written.
    Skipped { stats: StoreStats },
    /// A new dictionary was built and published.
    Published {
        before: StoreStats,
        after: StoreStats,
        report: BuildReport,
    },
}

/// Result of [`DictionaryMaintainer::update_if_stale`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The stored dictionary is younger than the maximum age.
    Fresh { last_updated: DateTime<Utc> },
    /// The dictionary was rebuilt and published.
    Updated {
        previous: Option<DictionaryMetadata>,
        current: DictionaryMetadata,
        /// Change in synonym count, when there was a previous dictionary.
        synonym_delta: Option<i64>,
        /// Change in dictionary word count, when there was a previous dictionary.
        word_delta: Option<i64>,
        report: BuildReport,
    },
}

/// Whether a dictionary described by `metadata` needs rebuilding at `now`.
///
/// Missing metadata is always stale.
pub fn is_stale(metadata: Option<&DictionaryMetadata>, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
    match metadata {
        None => true,
        Some(metadata) => now.signed_duration_since(metadata.last_updated) >= max_age,
    }
}

fn delta(current: usize, previous: usize) -> i64 {
    current as i64 - previous as i64
}

/// Builds dictionaries from a source and publishes them into a store.
pub struct DictionaryMaintainer<'a> {
    store: &'a DictionaryStore,
    builder: &'a SynonymMapBuilder,
}

impl<'a> DictionaryMaintainer<'a> {
    pub fn new(store: &'a DictionaryStore, builder: &'a SynonymMapBuilder) -> Self {
        DictionaryMaintainer { store, builder }
    }

    /// Build from `source` and publish, unless the store is already
    /// initialized and `force` is false.
    pub fn initialize(
        &self,
        source: &dyn DictionarySource,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<InitializeOutcome> {
        let before = self.store.stats()?;
        if before.is_initialized && !force {
            info!(
                "Dictionary already initialized ({} synonyms), skipping",
                before.synonym_count
            );
            return Ok(InitializeOutcome::Skipped { stats: before });
        }

        let report = self.rebuild(source, now)?;
        let after = self.store.stats()?;
        Ok(InitializeOutcome::Published {
            before,
            after,
            report,
        })
    }

    /// Rebuild and publish when the stored dictionary is older than `max_age`.
    ///
    /// Metadata that cannot be read counts as stale.
    pub fn update_if_stale(
        &self,
        source: &dyn DictionarySource,
        now: DateTime<Utc>,
        max_age: TimeDelta,
    ) -> Result<UpdateOutcome> {
        let previous = self.store.metadata().unwrap_or_else(|e| {
            warn!("Failed to read dictionary metadata, treating as stale: {e}");
            None
        });

        match previous.as_ref() {
            Some(metadata) if !is_stale(Some(metadata), now, max_age) => {
                info!(
                    "Dictionary is up to date (last updated {})",
                    metadata.last_updated.to_rfc3339()
                );
                return Ok(UpdateOutcome::Fresh {
                    last_updated: metadata.last_updated,
                });
            }
            Some(metadata) => info!(
                "Dictionary last updated {}, rebuilding",
                metadata.last_updated.to_rfc3339()
            ),
            None => info!("No dictionary metadata, building for the first time"),
        }

        let report = self.rebuild(source, now)?;
        let current = self
            .store
            .metadata()?
            .unwrap_or_else(|| self.fallback_metadata(&report, now));

        let synonym_delta = previous
            .as_ref()
            .map(|p| delta(current.synonym_count, p.synonym_count));
        let word_delta = previous
            .as_ref()
            .map(|p| delta(current.dictionary_word_count, p.dictionary_word_count));
        if let (Some(synonyms), Some(words)) = (synonym_delta, word_delta) {
            info!("Changes: synonyms {synonyms:+}, dictionary words {words:+}");
        }

        Ok(UpdateOutcome::Updated {
            previous,
            current,
            synonym_delta,
            word_delta,
            report,
        })
    }

    fn rebuild(&self, source: &dyn DictionarySource, now: DateTime<Utc>) -> Result<BuildReport> {
        info!("Building synonym dictionary from {}", source.describe());
        let text = source.fetch()?;
        let (dictionary, report) = self.builder.build(&text);
        self.store.publish(&dictionary, BuildSource::Sudachi, now)?;
        Ok(report)
    }

    fn fallback_metadata(&self, report: &BuildReport, now: DateTime<Utc>) -> DictionaryMetadata {
        DictionaryMetadata {
            version: now.to_rfc3339(),
            synonym_count: report.synonyms,
            dictionary_word_count: report.dictionary_words,
            last_updated: now,
            build_source: BuildSource::Sudachi,
        }
    }
}
