//! Language model access
//!
//! Handlers depend on [`ReplyGenerator`] rather than a concrete client so the
//! HTTP layer can be exercised without network access.

mod gemini;

use async_trait::async_trait;

pub use gemini::GeminiClient;

use crate::Result;

/// Produces a plain-text reply for a prompt
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Generate a reply for `prompt`
    ///
    /// # Errors
    ///
    /// Returns error on network failure, a non-success status, or a response
    /// without usable text
    async fn generate(&self, prompt: &str) -> Result<String>;
}
