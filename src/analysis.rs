//! Text analysis module for Shukuyaku.
//!
//! This module provides the two tokenizer-facing collaborators the optimizer
//! depends on: a [`counter::TokenCounter`] that measures the language-model
//! cost of a string, and a [`tokenizer::Tokenizer`] that splits a line into
//! word-like segments. Script classification helpers live in [`script`].

pub mod counter;
pub mod script;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use counter::*;
pub use script::*;
pub use token::*;
pub use tokenizer::*;
