//! Text optimization against a compiled dictionary.
//!
//! The [`rewriter::TextRewriter`] walks a text line by line and token by
//! token. A token with an exact entry in the synonym map is replaced; a token
//! the dictionary does not know is handed to the
//! [`compound::optimize_compound_word`] decomposer; anything else is kept.
//! [`service::OptimizationService`] wraps this behind a request/response
//! boundary.

pub mod compound;
pub mod rewriter;
pub mod service;

pub use compound::{MIN_COMPOUND_CHARS, optimize_compound_word};
pub use rewriter::{RewriteOutcome, TextRewriter};
pub use service::{OptimizationService, OptimizeRequest, OptimizeResponse, TokenCountPair};
