//! Runtime configuration.
//!
//! Every section has defaults, so an empty JSON object is a valid config file
//! and only the fields that differ need to be written.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::TokenizerKind;
use crate::dictionary::builder::ReductionPolicy;
use crate::dictionary::source::{HttpSource, SUDACHI_SYNONYMS_URL};
use crate::error::{Result, ShukuyakuError};
use crate::storage::dictionary_store::DEFAULT_BATCH_SIZE;
use crate::storage::retry::RetryPolicy;

/// Where the raw dictionary is downloaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: SUDACHI_SYNONYMS_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl SourceConfig {
    pub fn http_source(&self) -> HttpSource {
        HttpSource::new(self.url.clone()).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Dictionary compilation settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub policy: ReductionPolicy,
}

/// Store write settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub batch_size: usize,
    pub retry: RetryPolicy,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

/// When a stored dictionary is considered out of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StalenessConfig {
    pub max_age_hours: u32,
}

impl Default for StalenessConfig {
    fn default() -> Self {
        StalenessConfig { max_age_hours: 24 }
    }
}

impl StalenessConfig {
    pub fn max_age(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.max_age_hours))
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShukuyakuConfig {
    pub source: SourceConfig,
    pub build: BuildConfig,
    pub persistence: PersistenceConfig,
    pub staleness: StalenessConfig,
    pub segmenter: TokenizerKind,
    pub parallel_lines: bool,
}

impl ShukuyakuConfig {
    /// Load a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ShukuyakuError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ShukuyakuError::config(format!(
                "Invalid config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
