//! Generation attempts against a text-generation provider.

use postpilot_core::{
    GenerationResult, GenerationStatus, GenerationUpdate, NewGenerationRecord, TokenUsage,
    UsageMap, User,
};
use postpilot_error::{GenerationError, PostpilotResult};
use postpilot_interface::{GenerationLogStore, TextGenerator};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Characters of generated text shown in debug logs.
pub const PREVIEW_CHARS: usize = 200;

/// Result of one generation attempt together with the provider failure, if any.
///
/// The result is populated either way: on failure the text is empty but the
/// record id and timestamp still identify the persisted attempt.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct GenerationOutcome {
    /// What the caller gets back
    result: GenerationResult,
    /// Provider failure, when the attempt did not succeed
    error: Option<GenerationError>,
}

impl GenerationOutcome {
    /// True when the provider returned text.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The result on success, the provider error otherwise.
    pub fn into_result(self) -> PostpilotResult<GenerationResult> {
        match self.error {
            None => Ok(self.result),
            Some(e) => Err(e.into()),
        }
    }

    /// Split into the result and the provider failure.
    pub fn into_parts(self) -> (GenerationResult, Option<GenerationError>) {
        (self.result, self.error)
    }
}

/// Runs generation attempts and keeps their records.
///
/// Every call performs exactly one create and one update against the
/// generation log, so no record is left at `Started`.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    generator: Arc<dyn TextGenerator>,
    generations: Arc<dyn GenerationLogStore>,
    default_model: String,
    prompt_prefix: String,
}

impl GenerationOrchestrator {
    /// Create an orchestrator.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        generations: Arc<dyn GenerationLogStore>,
        default_model: impl Into<String>,
        prompt_prefix: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            generations,
            default_model: default_model.into(),
            prompt_prefix: prompt_prefix.into(),
        }
    }

    /// Prompt sent to the provider for `topic`.
    pub fn prompt_for(&self, topic: &str) -> String {
        format!("{}{}", self.prompt_prefix, topic)
    }

    /// Model used for `user`.
    pub fn model_for<'a>(&'a self, user: &'a User) -> &'a str {
        user.preferred_model().unwrap_or(&self.default_model)
    }

    /// Generate a post for `topic` on behalf of `user`.
    ///
    /// Fails only when the attempt cannot be recorded. A provider failure is
    /// recorded and returned inside the [`GenerationOutcome`].
    #[instrument(
        skip(self, user, topic),
        fields(user_id = %user.id(), provider = self.generator.provider_name(), topic_len = topic.len())
    )]
    pub async fn generate(&self, user: &User, topic: &str) -> PostpilotResult<GenerationOutcome> {
        info!("Starting post generation");

        let record = self
            .generations
            .create(NewGenerationRecord::started(*user.id(), topic))
            .await?;
        let record_id = *record.id();
        let created_at = *record.created_at();

        let prompt = self.prompt_for(topic);
        let model = self.model_for(user);
        debug!(%record_id, model, prompt_len = prompt.len(), "Calling text-generation provider");

        let started = Instant::now();
        let response = self
            .generator
            .generate_text(user.provider_api_key(), model, &prompt)
            .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match response {
            Ok(completion) => {
                let tokens = TokenUsage::from_usage_map(completion.usage());
                info!(
                    %record_id,
                    model = %completion.model(),
                    duration_ms,
                    output_len = completion.text().len(),
                    prompt_tokens = tokens.prompt_tokens(),
                    completion_tokens = tokens.completion_tokens(),
                    total_tokens = tokens.total_tokens(),
                    "Post generated"
                );
                debug!(preview = %preview(completion.text(), PREVIEW_CHARS), "Generated text");

                let update = GenerationUpdate::default()
                    .with_output(completion.text().clone())
                    .with_model(completion.model().clone())
                    .with_usage(completion.usage().clone())
                    .with_status(GenerationStatus::Success);
                self.record_update(record_id, update).await;

                let result = GenerationResult::new(
                    completion.text().clone(),
                    completion.model().clone(),
                    completion.usage().clone(),
                    created_at,
                    record_id,
                );
                Ok(GenerationOutcome {
                    result,
                    error: None,
                })
            }
            Err(e) => {
                error!(%record_id, model, duration_ms, error = %e, "Text-generation provider failed");

                let mut update = GenerationUpdate::default()
                    .with_status(GenerationStatus::Error)
                    .with_error(e.kind.to_string());
                let (used_model, usage) = match e.partial() {
                    Some((partial_model, partial_usage)) => {
                        update = update
                            .with_model(partial_model.to_string())
                            .with_usage(partial_usage.clone());
                        (partial_model.to_string(), partial_usage.clone())
                    }
                    None => (model.to_string(), UsageMap::new()),
                };
                self.record_update(record_id, update).await;

                let result =
                    GenerationResult::new(String::new(), used_model, usage, created_at, record_id);
                Ok(GenerationOutcome {
                    result,
                    error: Some(e),
                })
            }
        }
    }

    async fn record_update(&self, record_id: Uuid, update: GenerationUpdate) {
        if let Err(e) = self.generations.update(record_id, update).await {
            warn!(%record_id, error = %e, "Failed to update generation record");
        }
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
///
/// # Examples
///
/// ```
/// use postpilot_pipeline::preview;
///
/// assert_eq!(preview("short", 10), "short");
/// assert_eq!(preview("ação rápida", 4), "ação...");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_on_char_boundary() {
        let text = "é".repeat(300);
        let cut = preview(&text, PREVIEW_CHARS);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn preview_keeps_text_at_limit() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&text, PREVIEW_CHARS), text);
    }
}
