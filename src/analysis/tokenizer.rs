//! Tokenizer implementations for word segmentation.
//!
//! The text rewriter looks up every segment of a line in the compiled
//! dictionary, so a tokenizer here must be *lossless*: the concatenation of
//! the emitted token texts equals the input. Whitespace and punctuation are
//! therefore emitted as tokens of their own rather than dropped.
//!
//! # Available Tokenizers
//!
//! - [`lindera::LinderaTokenizer`] - Morphological analysis with Lindera (default)
//! - [`script_run::ScriptRunTokenizer`] - Splits on changes of script, needs no dictionary
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//!
//! # Examples
//!
//! ```
//! use shukuyaku::analysis::tokenizer::Tokenizer;
//! use shukuyaku::analysis::tokenizer::script_run::ScriptRunTokenizer;
//!
//! let tokenizer = ScriptRunTokenizer::new();
//! let words = tokenizer.segment("辞書を使う").unwrap();
//! assert_eq!(words, vec!["辞書", "を", "使", "う"]);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that split a line into word-like segments.
///
/// The trait requires `Send + Sync` so one tokenizer can serve concurrent
/// optimization requests.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Segment the text into the ordered list of token strings.
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.tokenize(text)?.map(|token| token.text).collect())
    }
}

/// Selects one of the built-in tokenizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// [`lindera::LinderaTokenizer`] over the embedded UniDic dictionary
    #[default]
    Lindera,
    /// [`script_run::ScriptRunTokenizer`]
    ScriptRun,
    /// [`unicode_word::UnicodeWordTokenizer`]
    UnicodeWord,
}

impl TokenizerKind {
    /// Instantiate the selected tokenizer.
    ///
    /// Fails only for [`TokenizerKind::Lindera`] when its dictionary cannot
    /// be loaded.
    pub fn build(self) -> Result<Box<dyn Tokenizer>> {
        Ok(match self {
            TokenizerKind::Lindera => Box::new(lindera::LinderaTokenizer::default_japanese()?),
            TokenizerKind::ScriptRun => Box::new(script_run::ScriptRunTokenizer::new()),
            TokenizerKind::UnicodeWord => Box::new(unicode_word::UnicodeWordTokenizer::new()),
        })
    }

    /// Like [`build`](Self::build), but falls back to the script-run
    /// tokenizer when the selected one cannot be created.
    pub fn build_or_fallback(self) -> Box<dyn Tokenizer> {
        match self.build() {
            Ok(tokenizer) => tokenizer,
            Err(e) => {
                warn!("Tokenizer '{self:?}' unavailable, falling back to script_run: {e}");
                Box::new(script_run::ScriptRunTokenizer::new())
            }
        }
    }
}

// Individual tokenizer modules
pub mod lindera;
pub mod script_run;
pub mod unicode_word;
