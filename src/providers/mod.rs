//! Generative API provider implementations

pub mod gemini;

// Re-export for convenience
pub use gemini::GeminiClient;

use async_trait::async_trait;

/// One call against a generative API with one credential.
///
/// Implementations return `Ok` only for a usable response: a
/// success status whose envelope carries non-empty text.
#[async_trait]
pub trait PromptProvider: Send + Sync
{   async fn generate(
      &self
    , instruction: &str
    , credential: &crate::failover::Credential
    ) -> crate::Result<gemini::ProviderResponse>;
}
