//! Unicode word tokenizer implementation.
//!
//! This module provides a tokenizer that splits text using Unicode word boundary
//! rules (UAX #29). Unlike a search tokenizer it keeps the non-word segments
//! (punctuation, whitespace) so the rewritten line can be reassembled.
//!
//! # Examples
//!
//! ```
//! use shukuyaku::analysis::tokenizer::Tokenizer;
//! use shukuyaku::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let words = tokenizer.segment("Hello, world!").unwrap();
//! assert_eq!(words, vec!["Hello", ",", " ", "world", "!"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::script::detect_token_type;
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
///
/// UAX #29 groups a run of katakana into one word and splits ideographs into
/// single characters, which suits mixed Latin/katakana technical prose.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .split_word_bound_indices()
            .enumerate()
            .map(|(position, (start_offset, word))| {
                Token::with_offsets(word, position, start_offset, start_offset + word.len())
                    .with_token_type(detect_token_type(word))
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
