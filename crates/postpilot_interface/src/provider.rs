//! Text-generation provider interface.

use async_trait::async_trait;
use postpilot_core::TextCompletion;
use postpilot_error::GenerationError;

/// A text-generation provider, treated as a pure external call.
///
/// Implementations must not retry; a failure is reported once.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt` with `model`, authenticating with `api_key`.
    async fn generate_text(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<TextCompletion, GenerationError>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}
