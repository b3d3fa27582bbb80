//! Entry point for request handlers.

use crate::{GenerationOrchestrator, GenerationOutcome, PipelineConfig};
use postpilot_core::{DistributionRecord, GenerationRecord, User};
use postpilot_error::{AuthError, PostpilotResult, ValidationError};
use postpilot_interface::{DistributionStore, GenerationLogStore, TextGenerator};
use postpilot_social::{DistributionPublisher, DistributionWithdrawer};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Shortest accepted topic, in characters.
pub const MIN_TOPIC_CHARS: usize = 3;
/// Longest accepted topic, in characters.
pub const MAX_TOPIC_CHARS: usize = 2000;
/// Longest accepted post text, in characters.
pub const MAX_POST_CHARS: usize = 3000;

/// Validated access to generation, publishing, withdrawal and listing.
///
/// Input and credential checks happen here, before anything is persisted.
#[derive(Clone)]
pub struct PipelineFacade {
    orchestrator: GenerationOrchestrator,
    publisher: DistributionPublisher,
    withdrawer: DistributionWithdrawer,
    generations: Arc<dyn GenerationLogStore>,
    distributions: Arc<dyn DistributionStore>,
    default_limit: usize,
}

impl PipelineFacade {
    /// Wire the pipeline from configuration and its collaborators.
    pub fn new(
        config: &PipelineConfig,
        generator: Arc<dyn TextGenerator>,
        generations: Arc<dyn GenerationLogStore>,
        distributions: Arc<dyn DistributionStore>,
        client: reqwest::Client,
    ) -> Self {
        let orchestrator = GenerationOrchestrator::new(
            generator,
            generations.clone(),
            config.generation().default_model().as_str(),
            config.generation().prompt_prefix().as_str(),
        );
        let publisher = DistributionPublisher::new(
            client.clone(),
            config.linkedin().clone(),
            distributions.clone(),
            generations.clone(),
        );
        let withdrawer = DistributionWithdrawer::new(
            client,
            config.linkedin().clone(),
            distributions.clone(),
            generations.clone(),
        );
        Self {
            orchestrator,
            publisher,
            withdrawer,
            generations,
            distributions,
            default_limit: *config.list().default_limit(),
        }
    }

    /// Generate a post for `topic`.
    ///
    /// The outcome carries the provider error, if any, next to the persisted
    /// result; see [`GenerationOutcome::into_result`].
    #[instrument(skip(self, user, topic), fields(user_id = %user.id()))]
    pub async fn generate(&self, user: &User, topic: &str) -> PostpilotResult<GenerationOutcome> {
        let topic = topic.trim();
        let len = topic.chars().count();
        if len < MIN_TOPIC_CHARS {
            return Err(ValidationError::new(format!(
                "topic must be at least {} characters",
                MIN_TOPIC_CHARS
            ))
            .into());
        }
        if len > MAX_TOPIC_CHARS {
            return Err(ValidationError::new(format!(
                "topic must be at most {} characters",
                MAX_TOPIC_CHARS
            ))
            .into());
        }
        self.orchestrator.generate(user, topic).await
    }

    /// Publish `text` to the user's LinkedIn account.
    ///
    /// `generation_id` is not checked against `user`; callers pass ids they
    /// obtained for this user.
    #[instrument(skip(self, user, text), fields(user_id = %user.id()))]
    pub async fn publish(
        &self,
        user: &User,
        generation_id: Option<Uuid>,
        text: &str,
    ) -> PostpilotResult<String> {
        if text.trim().is_empty() {
            return Err(ValidationError::new("text is required").into());
        }
        if text.chars().count() > MAX_POST_CHARS {
            return Err(ValidationError::new(format!(
                "text must be at most {} characters",
                MAX_POST_CHARS
            ))
            .into());
        }
        let (access_token, account) = user
            .linkedin_credentials()
            .ok_or_else(|| AuthError::new("LinkedIn not connected for this user"))?;

        self.publisher
            .publish(*user.id(), generation_id, access_token, account, text)
            .await
    }

    /// Delete a published post, by explicit id or through its generation.
    ///
    /// `generation_id` is not checked against `user`; callers pass ids they
    /// obtained for this user.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn delete(
        &self,
        user: &User,
        generation_id: Option<Uuid>,
        external_post_id: Option<&str>,
    ) -> PostpilotResult<()> {
        let access_token = user
            .linkedin_access_token()
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::new("LinkedIn not connected for this user"))?;

        self.withdrawer
            .delete(*user.id(), generation_id, access_token, external_post_id)
            .await
    }

    /// The user's generation records, newest first.
    ///
    /// `None` uses the configured default page size.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn list(&self, user: &User, limit: Option<usize>) -> PostpilotResult<Vec<GenerationRecord>> {
        let limit = limit.unwrap_or(self.default_limit);
        Ok(self.generations.list_by_user(*user.id(), limit).await?)
    }

    /// The user's distribution records, newest first.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn list_distributions(
        &self,
        user: &User,
        limit: Option<usize>,
    ) -> PostpilotResult<Vec<DistributionRecord>> {
        let limit = limit.unwrap_or(self.default_limit);
        Ok(self.distributions.list_by_user(*user.id(), limit).await?)
    }

    /// One of the user's generation records.
    ///
    /// Records owned by someone else are reported as absent.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn get_generation(
        &self,
        user: &User,
        id: Uuid,
    ) -> PostpilotResult<Option<GenerationRecord>> {
        let record = self.generations.get(id).await?;
        Ok(record.filter(|r| r.user_id() == user.id()))
    }
}
