//! Provider usage metrics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider-specific usage metrics, stored verbatim.
pub type UsageMap = Map<String, Value>;

/// Token counts extracted from a provider usage map.
///
/// Missing or non-numeric entries count as zero.
///
/// # Examples
///
/// ```
/// use postpilot_core::{TokenUsage, UsageMap};
///
/// let usage: UsageMap = serde_json::from_str(
///     r#"{"prompt_tokens": 12, "completion_tokens": 30, "total_tokens": 42}"#,
/// ).unwrap();
/// let tokens = TokenUsage::from_usage_map(&usage);
/// assert_eq!(*tokens.total_tokens(), 42);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_new::new,
)]
pub struct TokenUsage {
    /// Tokens in the prompt
    prompt_tokens: u64,
    /// Tokens in the completion
    completion_tokens: u64,
    /// Total tokens billed
    total_tokens: u64,
}

impl TokenUsage {
    /// Read OpenAI-style token counters from a usage map.
    pub fn from_usage_map(usage: &UsageMap) -> Self {
        let count = |key: &str| usage.get(key).and_then(Value::as_u64).unwrap_or(0);
        Self::new(
            count("prompt_tokens"),
            count("completion_tokens"),
            count("total_tokens"),
        )
    }
}

/// Successful answer from a text-generation provider.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_new::new,
)]
pub struct TextCompletion {
    /// Generated text
    text: String,
    /// Model that actually served the request
    model: String,
    /// Provider usage metrics
    usage: UsageMap,
}
