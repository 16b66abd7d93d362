//! Token types produced by word segmentation.
//!
//! # Examples
//!
//! ```
//! use shukuyaku::analysis::token::Token;
//!
//! let token = Token::with_offsets("辞書", 1, 6, 12);
//! assert_eq!(token.text, "辞書");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.end_offset, 12);
//! ```

use serde::{Deserialize, Serialize};

/// A single word-like segment of a line.
///
/// Offsets are byte offsets into the segmented text. Segmenters in this crate
/// are lossless, so concatenating the `text` of every token of a line
/// reproduces the line exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Script classification of the token, when the segmenter knows it
    pub token_type: Option<TokenType>,
}

/// Token type classification by script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// ASCII letters
    Alphabet,
    /// Numeric values
    Num,
    /// CJK ideographs
    Kanji,
    /// Katakana characters (including the prolonged sound mark)
    Katakana,
    /// Hiragana characters
    Hiragana,
    /// Punctuation marks
    Punctuation,
    /// Whitespace
    Whitespace,
    /// Other/unknown token types
    Other,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
            token_type: None,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            token_type: None,
        }
    }

    /// Set the token type.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A boxed iterator of tokens.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;
