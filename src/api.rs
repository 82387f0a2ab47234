use async_trait::async_trait;

use crate::Result;
use crate::document::Document;
use crate::pipeline::Pipeline;

/// Trait for text analysis providers.
///
/// This trait abstracts over the HTTP client so that code built on top of it can be
/// tested without a network.
///
/// # Example Implementation
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use codeq_nlp_api::{Analyzer, Document, Pipeline, Result};
///
/// struct OneSentencePerLine;
///
/// #[async_trait]
/// impl Analyzer for OneSentencePerLine {
///     async fn analyze_with(
///         &self,
///         text: &str,
///         _pipeline: Pipeline,
///         _include_benchmark: bool,
///     ) -> Result<Document> {
///         Ok(Document::from_sentence_strings(text.lines()))
///     }
/// }
/// ```
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Run `pipeline` over `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service answers with a status other than `200 OK`
    /// - The response cannot be mapped onto a [`Document`]
    /// - Network errors occur
    async fn analyze_with(
        &self,
        text: &str,
        pipeline: Pipeline,
        include_benchmark: bool,
    ) -> Result<Document>;
}
