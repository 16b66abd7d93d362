//! Token counting.
//!
//! The optimization objective is the number of language-model tokens, not the
//! number of characters. [`TiktokenCounter`] measures it with the `o200k_base`
//! BPE encoding used by GPT-4o.

use std::fmt;

use ahash::AHashMap;
use tiktoken_rs::CoreBPE;

use crate::error::{Result, ShukuyakuError};

/// Trait for measuring the token cost of a string.
///
/// Implementations must be pure: the same text always yields the same count.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens in `text`.
    fn count_tokens(&self, text: &str) -> usize;

    /// Get the name of this counter (for logging and metadata).
    fn name(&self) -> &'static str;
}

/// Token counter backed by the `o200k_base` BPE encoding.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Create a counter using the `o200k_base` encoding.
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::o200k_base().map_err(|e| {
            ShukuyakuError::analysis(format!("Failed to load o200k_base encoding: {e}"))
        })?;
        Ok(TiktokenCounter { bpe })
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &"o200k_base")
            .finish()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &'static str {
        "o200k_base"
    }
}

/// Counts one token per character.
///
/// A rough stand-in when the BPE vocabulary cannot be used; Japanese text in
/// modern encodings averages close to one token per character.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharCounter;

impl CharCounter {
    pub fn new() -> Self {
        CharCounter
    }
}

impl TokenCounter for CharCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn name(&self) -> &'static str {
        "chars"
    }
}

/// Counts tokens from an explicit cost table.
///
/// Words present in the table cost their listed amount; anything else falls
/// back to one token per character. Useful for reproducible builds against a
/// known vocabulary and for tests.
#[derive(Clone, Debug, Default)]
pub struct TableCounter {
    costs: AHashMap<String, usize>,
}

impl TableCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cost of one word.
    pub fn with_cost<S: Into<String>>(mut self, word: S, tokens: usize) -> Self {
        self.costs.insert(word.into(), tokens);
        self
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for TableCounter {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        TableCounter {
            costs: iter.into_iter().map(|(w, n)| (w.into(), n)).collect(),
        }
    }
}

impl TokenCounter for TableCounter {
    fn count_tokens(&self, text: &str) -> usize {
        match self.costs.get(text) {
            Some(&tokens) => tokens,
            None => text.chars().count(),
        }
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_counter() {
        let counter = CharCounter::new();
        assert_eq!(counter.count_tokens(""), 0);
        assert_eq!(counter.count_tokens("電算機"), 3);
        assert_eq!(counter.count_tokens("コンピュータ"), 6);
        assert_eq!(counter.name(), "chars");
    }

    #[test]
    fn test_table_counter() {
        let counter = TableCounter::new().with_cost("猫", 2).with_cost("ネコ", 1);
        assert_eq!(counter.count_tokens("猫"), 2);
        assert_eq!(counter.count_tokens("ネコ"), 1);
        // Unlisted words cost one token per character.
        assert_eq!(counter.count_tokens("ねこ"), 2);

        let counter: TableCounter = vec![("電算機", 1)].into_iter().collect();
        assert_eq!(counter.count_tokens("電算機"), 1);
    }

    #[test]
    fn test_tiktoken_counter() {
        let counter = TiktokenCounter::new().unwrap();
        assert_eq!(counter.count_tokens(""), 0);

        let tokens = counter.count_tokens("Hello, world!");
        assert!(tokens > 0);
        assert!(tokens < 10);

        let japanese = counter.count_tokens("コンピュータとアルゴリズムを活用した");
        assert!(japanese > 0);
        assert_eq!(japanese, counter.count_tokens("コンピュータとアルゴリズムを活用した"));
    }
}
