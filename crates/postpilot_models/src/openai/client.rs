//! Client for OpenAI-compatible chat-completions APIs.

use crate::openai::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use postpilot_core::{TextCompletion, UsageMap};
use postpilot_error::{GenerationError, GenerationErrorKind};
use postpilot_interface::TextGenerator;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, instrument};

/// Text generator speaking the OpenAI chat-completions format.
///
/// The API key is supplied per call because each user brings their own.
/// No client-side timeout is set: the call runs under the caller's deadline.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    /// Creates a client posting to `base_url`.
    pub fn new(base_url: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self::with_client(Client::new(), base_url, max_tokens, temperature)
    }

    /// Creates a client sharing an existing connection pool.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        let base_url = base_url.into();
        debug!(url = %base_url, max_tokens, temperature, "Created OpenAI-compatible client");
        Self {
            client,
            base_url,
            max_tokens,
            temperature,
        }
    }

    /// Endpoint this client posts to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    #[instrument(skip(self, api_key, prompt), fields(model = %model, prompt_len = prompt.len()))]
    async fn generate_text(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<TextCompletion, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::MissingApiKey));
        }

        let chat_request = ChatRequest::builder()
            .model(model)
            .messages(vec![ChatMessage::user(prompt)])
            .max_tokens(Some(self.max_tokens))
            .temperature(Some(self.temperature))
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Http(format!("Invalid request: {}", e)))
            })?;

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                GenerationError::new(GenerationErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            }));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            GenerationError::new(GenerationErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        let served_model = chat_response.model.unwrap_or_default();
        let usage = chat_response.usage.unwrap_or_else(UsageMap::new);

        let Some(choice) = chat_response.choices.into_iter().next() else {
            return Err(GenerationError::new(GenerationErrorKind::NoChoices {
                model: served_model,
                usage,
            }));
        };

        debug!(model = %served_model, output_len = choice.message.content.len(), "Received completion");
        Ok(TextCompletion::new(choice.message.content, served_model, usage))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
