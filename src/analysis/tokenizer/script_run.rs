//! Script-run tokenizer implementation.
//!
//! Japanese has no spaces between words, but a change of script is a strong
//! word boundary hint: kanji stems are followed by hiragana inflections and
//! particles, loanwords are written in katakana. This tokenizer emits maximal
//! runs of characters that share one [`TokenType`].
//!
//! # Examples
//!
//! ```
//! use shukuyaku::analysis::tokenizer::Tokenizer;
//! use shukuyaku::analysis::tokenizer::script_run::ScriptRunTokenizer;
//!
//! let tokenizer = ScriptRunTokenizer::new();
//! let words = tokenizer.segment("コンピュータとアルゴリズムを活用した").unwrap();
//! assert_eq!(words, vec!["コンピュータ", "と", "アルゴリズム", "を", "活用", "した"]);
//! ```

use crate::analysis::script::classify_char;
use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

const PROLONGED_SOUND_MARK: char = 'ー';

/// A tokenizer that splits text wherever the character class changes.
///
/// The prolonged sound mark `ー` continues whatever run precedes it, so
/// `すごーい` stays in one hiragana run.
#[derive(Clone, Debug, Default)]
pub struct ScriptRunTokenizer;

impl ScriptRunTokenizer {
    /// Create a new script-run tokenizer.
    pub fn new() -> Self {
        ScriptRunTokenizer
    }
}

impl Tokenizer for ScriptRunTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut run_start = 0;
        let mut run_type: Option<TokenType> = None;

        for (offset, c) in text.char_indices() {
            let class = classify_char(c);
            match run_type {
                None => run_type = Some(class),
                Some(_) if c == PROLONGED_SOUND_MARK => {}
                Some(current) if current == class => {}
                Some(current) => {
                    let position = tokens.len();
                    tokens.push(
                        Token::with_offsets(&text[run_start..offset], position, run_start, offset)
                            .with_token_type(current),
                    );
                    run_start = offset;
                    run_type = Some(class);
                }
            }
        }

        if let Some(current) = run_type {
            let position = tokens.len();
            tokens.push(
                Token::with_offsets(&text[run_start..], position, run_start, text.len())
                    .with_token_type(current),
            );
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "script_run"
    }
}
