//! Ownership and publication of the active compiled dictionary.

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;

use crate::dictionary::builder::{BuildReport, SynonymMapBuilder};
use crate::dictionary::compiled::CompiledDictionary;
use crate::dictionary::source::DictionarySource;
use crate::error::{Result, ShukuyakuError};

/// Holds the currently published [`CompiledDictionary`].
///
/// A build runs to completion on a private value and is then published by
/// swapping one `Arc`. Readers clone that `Arc` and keep using their
/// snapshot without further locking; a failed build leaves the previous
/// dictionary in place.
pub struct DictionaryService {
    builder: SynonymMapBuilder,
    current: RwLock<Option<Arc<CompiledDictionary>>>,
}

impl DictionaryService {
    pub fn new(builder: SynonymMapBuilder) -> Self {
        DictionaryService {
            builder,
            current: RwLock::new(None),
        }
    }

    pub fn builder(&self) -> &SynonymMapBuilder {
        &self.builder
    }

    /// Fetch, compile and publish a dictionary from `source`.
    ///
    /// On error nothing is published.
    pub fn load(&self, source: &dyn DictionarySource) -> Result<(Arc<CompiledDictionary>, BuildReport)> {
        info!("Building synonym dictionary from {}", source.describe());

        let text = source.fetch().inspect_err(|e| {
            warn!("Dictionary build aborted, keeping previous dictionary: {e}");
        })?;

        let (dictionary, report) = self.builder.build(&text);
        let dictionary = self.publish(dictionary);
        Ok((dictionary, report))
    }

    /// Load and publish a snapshot file.
    pub fn load_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<Arc<CompiledDictionary>> {
        let dictionary = CompiledDictionary::load_snapshot(path)?;
        Ok(self.publish(dictionary))
    }

    /// Publish an already built dictionary, replacing the current one.
    pub fn publish(&self, dictionary: CompiledDictionary) -> Arc<CompiledDictionary> {
        let dictionary = Arc::new(dictionary);
        *self.current.write() = Some(Arc::clone(&dictionary));
        info!(
            "Published dictionary with {} synonyms and {} words",
            dictionary.synonym_count(),
            dictionary.word_count()
        );
        dictionary
    }

    /// The latest published dictionary.
    pub fn current_snapshot(&self) -> Result<Arc<CompiledDictionary>> {
        self.current.read().clone().ok_or_else(|| {
            ShukuyakuError::uninitialized("no dictionary has been built or loaded yet")
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.current.read().is_some()
    }
}
