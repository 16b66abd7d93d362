//! Line- and token-level application of the synonym map.

use std::borrow::Cow;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::counter::TokenCounter;
use crate::analysis::tokenizer::Tokenizer;
use crate::dictionary::compiled::CompiledDictionary;
use crate::error::Result;
use crate::optimizer::compound::optimize_compound_word;

/// Result of rewriting a text, with token counts for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    pub optimized: String,
    pub original_tokens: usize,
    pub optimized_tokens: usize,
}

impl RewriteOutcome {
    /// Tokens saved by the rewrite (zero if none).
    pub fn saved_tokens(&self) -> usize {
        self.original_tokens.saturating_sub(self.optimized_tokens)
    }
}

/// Rewrites text with a compiled dictionary.
///
/// For each token of each non-blank line, in order:
///
/// 1. an exact entry in the synonym map always wins;
/// 2. a token the dictionary knows as a word is kept as is;
/// 3. anything else goes through [`optimize_compound_word`].
///
/// Tokens are concatenated without separators and lines are joined with
/// `\n`, so the tokenizer must be lossless.
pub struct TextRewriter<'a> {
    dictionary: &'a CompiledDictionary,
    tokenizer: &'a dyn Tokenizer,
    parallel: bool,
}

impl<'a> TextRewriter<'a> {
    pub fn new(dictionary: &'a CompiledDictionary, tokenizer: &'a dyn Tokenizer) -> Self {
        TextRewriter {
            dictionary,
            tokenizer,
            parallel: false,
        }
    }

    /// Process lines on the rayon thread pool. Output is identical to the
    /// sequential rewrite.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rewrite a single token.
    pub fn rewrite_token<'t>(&self, token: &'t str) -> Cow<'t, str> {
        if let Some(replacement) = self.dictionary.replacement(token) {
            return Cow::Owned(replacement.to_string());
        }
        if self.dictionary.contains_word(token) {
            return Cow::Borrowed(token);
        }
        Cow::Owned(optimize_compound_word(token, self.dictionary))
    }

    /// Rewrite one line. Blank lines are returned untouched.
    pub fn rewrite_line(&self, line: &str) -> Result<String> {
        if line.trim().is_empty() {
            return Ok(line.to_string());
        }

        let mut optimized = String::with_capacity(line.len());
        for token in self.tokenizer.tokenize(line)? {
            optimized.push_str(&self.rewrite_token(&token.text));
        }
        Ok(optimized)
    }

    /// Rewrite a multi-line text.
    pub fn rewrite(&self, text: &str) -> Result<String> {
        let lines: Vec<&str> = text.split('\n').collect();

        let optimized: Vec<String> = if self.parallel {
            lines
                .par_iter()
                .map(|line| self.rewrite_line(line))
                .collect::<Result<_>>()?
        } else {
            lines
                .iter()
                .map(|line| self.rewrite_line(line))
                .collect::<Result<_>>()?
        };

        Ok(optimized.join("\n"))
    }

    /// Rewrite a text and count tokens before and after.
    pub fn rewrite_with_counts(
        &self,
        text: &str,
        counter: &dyn TokenCounter,
    ) -> Result<RewriteOutcome> {
        let optimized = self.rewrite(text)?;
        Ok(RewriteOutcome {
            original_tokens: counter.count_tokens(text),
            optimized_tokens: counter.count_tokens(&optimized),
            optimized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::counter::CharCounter;
    use crate::analysis::tokenizer::script_run::ScriptRunTokenizer;
    use ahash::{AHashMap, AHashSet};

    fn dictionary(synonyms: &[(&str, &str)], words: &[&str]) -> CompiledDictionary {
        CompiledDictionary::new(
            synonyms
                .iter()
                .map(|(w, r)| (w.to_string(), r.to_string()))
                .collect::<AHashMap<_, _>>(),
            words.iter().map(|w| w.to_string()).collect::<AHashSet<_>>(),
        )
    }

    #[test]
    fn test_exact_match() {
        let dictionary = dictionary(&[("コンピュータ", "電算機")], &["コンピュータ", "電算機"]);
        let tokenizer = ScriptRunTokenizer::new();
        let rewriter = TextRewriter::new(&dictionary, &tokenizer);

        assert_eq!(
            rewriter.rewrite("コンピュータとアルゴリズムを活用した").unwrap(),
            "電算機とアルゴリズムを活用した"
        );
    }

    #[test]
    fn test_exact_match_beats_compound() {
        let dictionary = dictionary(
            &[("再構築処理", "再処理"), ("再構築", "再構")],
            &["再構築"],
        );
        let tokenizer = ScriptRunTokenizer::new();
        let rewriter = TextRewriter::new(&dictionary, &tokenizer);
        assert_eq!(rewriter.rewrite_token("再構築処理"), "再処理");
    }

    #[test]
    fn test_known_word_kept() {
        let dictionary = dictionary(&[("再構築", "再構成")], &["再構築処理"]);
        let tokenizer = ScriptRunTokenizer::new();
        let rewriter = TextRewriter::new(&dictionary, &tokenizer);
        assert_eq!(rewriter.rewrite_token("再構築処理"), "再構築処理");
    }

    #[test]
    fn test_compound_token() {
        let dictionary = dictionary(&[("再構築", "再構成")], &["再構築", "再構成"]);
        let tokenizer = ScriptRunTokenizer::new();
        let rewriter = TextRewriter::new(&dictionary, &tokenizer);
        assert_eq!(
            rewriter.rewrite("再構築処理を行う").unwrap(),
            "再構成処理を行う"
        );
    }

    #[test]
    fn test_lines_preserved() {
        let dictionary = dictionary(&[("コンピュータ", "電算機")], &["コンピュータ"]);
        let tokenizer = ScriptRunTokenizer::new();
        let rewriter = TextRewriter::new(&dictionary, &tokenizer);

        let text = "コンピュータ\n\n   \n古いコンピュータ。\r\n";
        assert_eq!(
            rewriter.rewrite(text).unwrap(),
            "電算機\n\n   \n古い電算機。\r\n"
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dictionary = dictionary(
            &[("コンピュータ", "電算機"), ("再構築", "再構成")],
            &["コンピュータ", "再構築"],
        );
        let tokenizer = ScriptRunTokenizer::new();
        let text = (0..200)
            .map(|i| format!("{i}行目: コンピュータの再構築処理"))
            .collect::<Vec<_>>()
            .join("\n");

        let sequential = TextRewriter::new(&dictionary, &tokenizer).rewrite(&text).unwrap();
        let parallel = TextRewriter::new(&dictionary, &tokenizer)
            .parallel(true)
            .rewrite(&text)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_rewrite_with_counts() {
        let dictionary = dictionary(&[("コンピュータ", "電算機")], &["コンピュータ"]);
        let tokenizer = ScriptRunTokenizer::new();
        let rewriter = TextRewriter::new(&dictionary, &tokenizer);

        let outcome = rewriter
            .rewrite_with_counts("コンピュータを使う", &CharCounter::new())
            .unwrap();
        assert_eq!(outcome.optimized, "電算機を使う");
        assert_eq!(outcome.original_tokens, 9);
        assert_eq!(outcome.optimized_tokens, 6);
        assert_eq!(outcome.saved_tokens(), 3);
    }
}
