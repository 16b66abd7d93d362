//! Morphological tokenizer backed by Lindera.
//!
//! Splits Japanese text into dictionary words, so okurigana forms such as
//! `取り扱う` or `申し込み` survive as one segment and can be looked up in the
//! compiled synonym map.
//!
//! # Examples
//!
//! ```no_run
//! use shukuyaku::analysis::tokenizer::Tokenizer;
//! use shukuyaku::analysis::tokenizer::lindera::LinderaTokenizer;
//!
//! let tokenizer = LinderaTokenizer::default_japanese().unwrap();
//! let words = tokenizer.segment("書類を取り扱う").unwrap();
//! assert_eq!(words.concat(), "書類を取り扱う");
//! ```

use std::borrow::Cow;
use std::str::FromStr;

use lindera::dictionary::{load_dictionary, load_user_dictionary};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;

use crate::analysis::script::detect_token_type;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, ShukuyakuError};

use super::Tokenizer;

/// Dictionary used when no other is configured.
pub const DEFAULT_DICTIONARY: &str = "embedded://unidic";

pub struct LinderaTokenizer {
    inner: Segmenter,
}

impl LinderaTokenizer {
    /// Create a new Lindera tokenizer.
    pub fn new(mode_str: &str, dict_uri: &str, user_dict_uri: Option<&str>) -> Result<Self> {
        let mode = Mode::from_str(mode_str).map_err(|e| {
            ShukuyakuError::analysis(format!("Invalid mode '{}': {}", mode_str, e))
        })?;
        let dict = load_dictionary(dict_uri)
            .map_err(|e| ShukuyakuError::analysis(format!("Failed to load dictionary: {}", e)))?;
        let metadata = &dict.metadata;
        let user_dict = match user_dict_uri {
            Some(uri) => Some(load_user_dictionary(uri, metadata).map_err(|e| {
                ShukuyakuError::analysis(format!("Failed to load user dictionary: {}", e))
            })?),
            None => None,
        };
        let inner = Segmenter::new(mode, dict, user_dict);

        Ok(Self { inner })
    }

    /// Normal-mode segmentation over the embedded UniDic dictionary.
    pub fn default_japanese() -> Result<Self> {
        Self::new("normal", DEFAULT_DICTIONARY, None)
    }
}

impl Tokenizer for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let segments = self
            .inner
            .segment(Cow::Borrowed(text))
            .map_err(|e| ShukuyakuError::analysis(format!("Failed to segment text: {}", e)))?;

        // Surfaces are re-sliced from the input and any uncovered byte range
        // becomes a token of its own, so the stream stays lossless.
        let mut tokens = Vec::with_capacity(segments.len());
        let mut cursor = 0;
        let push = |tokens: &mut Vec<Token>, start: usize, end: usize| {
            let surface = &text[start..end];
            let position = tokens.len();
            tokens.push(
                Token::with_offsets(surface, position, start, end)
                    .with_token_type(detect_token_type(surface)),
            );
        };

        for segment in segments {
            let (start, end) = (segment.byte_start, segment.byte_end);
            if start < cursor || end <= start || text.get(start..end).is_none() {
                continue;
            }
            if start > cursor {
                push(&mut tokens, cursor, start);
            }
            push(&mut tokens, start, end);
            cursor = end;
        }
        if cursor < text.len() {
            push(&mut tokens, cursor, text.len());
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lindera"
    }
}

impl std::fmt::Debug for LinderaTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinderaTokenizer").finish_non_exhaustive()
    }
}
