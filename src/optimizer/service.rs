//! Request/response boundary for text optimization.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::counter::TokenCounter;
use crate::analysis::tokenizer::Tokenizer;
use crate::dictionary::service::DictionaryService;
use crate::error::{Result, ShukuyakuError};
use crate::optimizer::rewriter::TextRewriter;

/// An optimization request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl OptimizeRequest {
    pub fn new<S: Into<String>>(text: S) -> Self {
        OptimizeRequest {
            text: Some(text.into()),
        }
    }
}

/// Token counts before and after optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCountPair {
    pub original: usize,
    pub optimized: usize,
}

/// The response to an [`OptimizeRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub original: String,
    pub optimized: String,
    pub token_count: TokenCountPair,
}

/// Serves optimization requests against the dictionary currently published
/// by a [`DictionaryService`].
///
/// Each request works on the snapshot that was current when it started, so a
/// concurrent rebuild never changes the result of a request in flight.
pub struct OptimizationService {
    dictionaries: Arc<DictionaryService>,
    tokenizer: Box<dyn Tokenizer>,
    counter: Arc<dyn TokenCounter>,
    parallel_lines: bool,
}

impl OptimizationService {
    pub fn new(
        dictionaries: Arc<DictionaryService>,
        tokenizer: Box<dyn Tokenizer>,
        counter: Arc<dyn TokenCounter>,
    ) -> Self {
        OptimizationService {
            dictionaries,
            tokenizer,
            counter,
            parallel_lines: false,
        }
    }

    pub fn with_parallel_lines(mut self, parallel_lines: bool) -> Self {
        self.parallel_lines = parallel_lines;
        self
    }

    pub fn dictionaries(&self) -> &Arc<DictionaryService> {
        &self.dictionaries
    }

    /// Optimize the text of `request`.
    ///
    /// A missing or empty text is rejected with
    /// [`ShukuyakuError::InvalidRequest`] before the dictionary is consulted.
    /// Without a published dictionary the request fails with
    /// [`ShukuyakuError::UninitializedDictionary`].
    pub fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResponse> {
        let text = match request.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => return Err(ShukuyakuError::invalid_request("Text is required")),
        };

        let dictionary = self.dictionaries.current_snapshot().inspect_err(|e| {
            warn!("Rejecting optimization request: {e}");
        })?;

        let outcome = TextRewriter::new(&dictionary, self.tokenizer.as_ref())
            .parallel(self.parallel_lines)
            .rewrite_with_counts(text, self.counter.as_ref())?;

        debug!(
            "Optimized {} chars with {}: {} -> {} tokens",
            text.chars().count(),
            self.tokenizer.name(),
            outcome.original_tokens,
            outcome.optimized_tokens
        );

        Ok(OptimizeResponse {
            original: text.to_string(),
            optimized: outcome.optimized,
            token_count: TokenCountPair {
                original: outcome.original_tokens,
                optimized: outcome.optimized_tokens,
            },
        })
    }

    /// Convenience wrapper around [`OptimizationService::optimize`].
    pub fn optimize_text(&self, text: &str) -> Result<OptimizeResponse> {
        self.optimize(&OptimizeRequest::new(text))
    }
}
