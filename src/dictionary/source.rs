//! Dictionary sources.
//!
//! A source only has to produce the raw text blob; where it lives is not the
//! compiler's concern. Every failure to retrieve it is reported as
//! [`ShukuyakuError::SourceFetch`] and is never retried here.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

use crate::error::{Result, ShukuyakuError};

/// The Sudachi synonym dictionary in its upstream repository.
pub const SUDACHI_SYNONYMS_URL: &str = "https://raw.githubusercontent.com/WorksApplications/SudachiDict/refs/heads/develop/src/main/text/synonyms.txt";

/// Trait for anything that can supply raw dictionary text.
pub trait DictionarySource: Send + Sync {
    /// Fetch the full source text.
    fn fetch(&self) -> Result<String>;

    /// Human-readable description of the source (for logging).
    fn describe(&self) -> String;
}

/// Fetches the source over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new<S: Into<String>>(url: S) -> Self {
        HttpSource {
            url: url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    /// The upstream Sudachi synonym dictionary.
    pub fn sudachi() -> Self {
        Self::new(SUDACHI_SYNONYMS_URL)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DictionarySource for HttpSource {
    fn fetch(&self) -> Result<String> {
        info!("Downloading synonym dictionary from {}", self.url);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ShukuyakuError::source_fetch(format!("Failed to build HTTP client: {e}")))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| ShukuyakuError::source_fetch(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShukuyakuError::source_fetch(format!(
                "HTTP error! status: {} ({})",
                status.as_u16(),
                self.url
            )));
        }

        let text = response.text().map_err(|e| {
            ShukuyakuError::source_fetch(format!("Failed to read response body: {e}"))
        })?;
        info!("Dictionary source size: {}KB", text.len() / 1024);
        Ok(text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the source from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DictionarySource for FileSource {
    fn fetch(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            ShukuyakuError::source_fetch(format!(
                "Failed to read dictionary source '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory source.
#[derive(Debug, Clone)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new<S: Into<String>>(text: S) -> Self {
        StaticSource { text: text.into() }
    }
}

impl DictionarySource for StaticSource {
    fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        format!("<static {} bytes>", self.text.len())
    }
}
