//! # Shukuyaku
//!
//! Rewrites Japanese text with cheaper synonyms so that it costs fewer
//! language-model tokens.
//!
//! ## Features
//!
//! - Compiles the Sudachi synonym dictionary into a `word -> replacement` map
//! - Picks replacements by real BPE token counts (`o200k_base`)
//! - Exact-match rewriting plus greedy compound-word decomposition
//! - Snapshot files and pluggable key-value stores for compiled dictionaries
//! - Staleness-checked rebuilds for scheduled updates
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use shukuyaku::analysis::counter::CharCounter;
//! use shukuyaku::analysis::tokenizer::script_run::ScriptRunTokenizer;
//! use shukuyaku::dictionary::SynonymMapBuilder;
//! use shukuyaku::optimizer::TextRewriter;
//!
//! # fn main() -> shukuyaku::error::Result<()> {
//! let source = "\
//! 000001,1,0,1,0,0,0,(),コンピュータ,,
//! 000001,1,0,1,0,0,0,(),電算機,,
//! ";
//! let builder = SynonymMapBuilder::new(Arc::new(CharCounter::new()));
//! let (dictionary, _report) = builder.build(source);
//!
//! let tokenizer = ScriptRunTokenizer::new();
//! let rewriter = TextRewriter::new(&dictionary, &tokenizer);
//! assert_eq!(rewriter.rewrite("コンピュータを使う")?, "電算機を使う");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod maintenance;
pub mod optimizer;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::counter::{TiktokenCounter, TokenCounter};
    pub use crate::analysis::tokenizer::{Tokenizer, TokenizerKind};
    pub use crate::config::ShukuyakuConfig;
    pub use crate::dictionary::{
        CompiledDictionary, DictionaryService, DictionarySource, SynonymMapBuilder,
    };
    pub use crate::error::{Result, ShukuyakuError};
    pub use crate::optimizer::{OptimizationService, OptimizeRequest, OptimizeResponse, TextRewriter};
    pub use crate::storage::{DictionaryStore, KeyValueStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
