//! Script classification for words and characters.
//!
//! Substitutions are never allowed to cross the boundary between Japanese
//! script and the Latin alphabet, and the dictionary compiler prefers
//! Japanese-script representatives. Both rules rely on the predicates here.

use crate::analysis::token::TokenType;

/// Whether the character is Hiragana, Katakana or a CJK ideograph.
///
/// Covers U+3040–309F, U+30A0–30FF, U+4E00–9FAF and U+3400–4DBF.
pub fn is_japanese_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}' |  // Hiragana
        '\u{30A0}'..='\u{30FF}' |  // Katakana
        '\u{4E00}'..='\u{9FAF}' |  // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}'    // CJK Extension A
    )
}

/// Whether the whole string is written in Japanese script.
///
/// Empty strings are neither Japanese nor alphabetic.
///
/// ```
/// use shukuyaku::analysis::script::is_japanese;
///
/// assert!(is_japanese("電算機"));
/// assert!(is_japanese("コンピュータ"));
/// assert!(!is_japanese("AI技術"));
/// ```
pub fn is_japanese(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_japanese_char)
}

/// Whether the whole string consists of ASCII letters.
///
/// ```
/// use shukuyaku::analysis::script::is_alphabetic;
///
/// assert!(is_alphabetic("Computer"));
/// assert!(!is_alphabetic("GPT4"));
/// ```
pub fn is_alphabetic(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic())
}

/// Whether replacing `source` with `target` would cross the Japanese/Latin
/// script boundary in either direction.
pub fn crosses_script_boundary(source: &str, target: &str) -> bool {
    (is_japanese(source) && is_alphabetic(target))
        || (is_alphabetic(source) && is_japanese(target))
}

/// Classify a single character for word segmentation.
///
/// Ideographs include the iteration mark `々` so that words like `人々`
/// stay in one run.
pub fn classify_char(c: char) -> TokenType {
    match c {
        '\u{3040}'..='\u{309F}' => TokenType::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            TokenType::Katakana
        }
        '\u{3005}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}' => TokenType::Kanji,
        c if c.is_ascii_alphabetic() => TokenType::Alphabet,
        c if c.is_numeric() => TokenType::Num,
        c if c.is_whitespace() => TokenType::Whitespace,
        c if c.is_ascii_punctuation() => TokenType::Punctuation,
        '\u{3000}'..='\u{303F}' | '\u{FF01}'..='\u{FF0F}' => TokenType::Punctuation,
        _ => TokenType::Other,
    }
}

/// Detect the token type of a whole word.
///
/// Returns the shared class when every character agrees, otherwise
/// [`TokenType::Other`].
pub fn detect_token_type(word: &str) -> TokenType {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return TokenType::Other;
    };
    let class = classify_char(first);
    if chars.all(|c| classify_char(c) == class) {
        class
    } else {
        TokenType::Other
    }
}
