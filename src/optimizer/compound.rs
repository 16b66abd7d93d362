//! Greedy decomposition of compound words.
//!
//! A token the dictionary does not know as a whole is assumed to be a
//! concatenation of known words. The longest prefix of at least
//! [`MIN_COMPOUND_CHARS`] characters that has a replacement is substituted,
//! and the remainder is processed the same way.
//!
//! The search is greedy and never backtracks: once the longest matching
//! prefix is found, shorter prefixes are not explored even when a different
//! split would save more tokens.

use crate::dictionary::compiled::CompiledDictionary;

/// Shortest word, prefix or remainder that is considered for decomposition.
pub const MIN_COMPOUND_CHARS: usize = 3;

/// Replace dictionary-known prefixes inside a compound word.
///
/// Returns the word unchanged when it is shorter than three characters, when
/// it is itself a dictionary word, or when no prefix matches.
///
/// ```
/// use ahash::{AHashMap, AHashSet};
/// use shukuyaku::dictionary::CompiledDictionary;
/// use shukuyaku::optimizer::optimize_compound_word;
///
/// let mut synonyms = AHashMap::new();
/// synonyms.insert("再構築".to_string(), "再構成".to_string());
/// let dictionary = CompiledDictionary::new(synonyms, AHashSet::new());
///
/// assert_eq!(optimize_compound_word("再構築処理", &dictionary), "再構成処理");
/// ```
pub fn optimize_compound_word(word: &str, dictionary: &CompiledDictionary) -> String {
    let mut optimized = String::with_capacity(word.len());
    let mut rest = word;

    'levels: loop {
        // Byte offset after each character: boundaries[n] ends the n-char prefix.
        let boundaries: Vec<usize> = rest
            .char_indices()
            .map(|(offset, _)| offset)
            .skip(1)
            .chain(std::iter::once(rest.len()))
            .collect();
        let char_count = boundaries.len();

        if char_count < MIN_COMPOUND_CHARS || dictionary.contains_word(rest) {
            optimized.push_str(rest);
            break;
        }

        for end in (MIN_COMPOUND_CHARS..=char_count).rev() {
            let split = boundaries[end - 1];
            if let Some(replacement) = dictionary.replacement(&rest[..split]) {
                optimized.push_str(replacement);
                rest = &rest[split..];
                continue 'levels;
            }
        }

        optimized.push_str(rest);
        break;
    }

    optimized
}
