//! Publishing generated text to a social network.

use crate::LinkedInSettings;
use crate::endpoint::{RESTLI_ID_HEADER, RESTLI_PROTOCOL_HEADER, publish_url};
use crate::payload::NetworkPayload;
use chrono::Utc;
use postpilot_core::{GenerationStatus, GenerationUpdate, Network, NewDistributionRecord};
use postpilot_error::{
    DistributionError, DistributionErrorKind, PostpilotError, PostpilotResult,
};
use postpilot_interface::{DistributionStore, GenerationLogStore};
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Publishes text to a network, auditing every attempt.
///
/// Each call writes exactly one [`DistributionRecord`](postpilot_core::DistributionRecord),
/// in its terminal state, whichever branch is taken. Nothing is retried.
#[derive(Clone)]
pub struct DistributionPublisher {
    client: Client,
    network: Network,
    settings: LinkedInSettings,
    distributions: Arc<dyn DistributionStore>,
    generations: Arc<dyn GenerationLogStore>,
}

impl DistributionPublisher {
    /// Create a LinkedIn publisher.
    pub fn new(
        client: Client,
        settings: LinkedInSettings,
        distributions: Arc<dyn DistributionStore>,
        generations: Arc<dyn GenerationLogStore>,
    ) -> Self {
        Self {
            client,
            network: Network::LinkedIn,
            settings,
            distributions,
            generations,
        }
    }

    /// Network this publisher posts to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Publish `text` as `account` and return the network's post id.
    ///
    /// The caller has already checked that `access_token` and `account` are
    /// present. When `generation_id` is given and the post goes live, that
    /// generation record is moved to `Published` on a best-effort basis.
    #[instrument(
        skip(self, access_token, text),
        fields(network = %self.network, text_len = text.len())
    )]
    pub async fn publish(
        &self,
        user_id: Uuid,
        generation_id: Option<Uuid>,
        access_token: &str,
        account: &str,
        text: &str,
    ) -> PostpilotResult<String> {
        info!("Starting publish");

        let mut attempt =
            NewDistributionRecord::attempt(user_id, generation_id, self.network, text);

        let payload = match NetworkPayload::build(self.network, account, text).to_value() {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to serialize payload");
                return Err(self.record_failure(attempt, e).await);
            }
        };
        attempt.set_payload(payload.clone());

        let request = publish_url(self.network, self.settings.api_base_url()).and_then(|url| {
            debug!(url = %url, "Sending publish request");
            self.client
                .post(url)
                .bearer_auth(access_token)
                .header(CONTENT_TYPE, "application/json")
                .header(RESTLI_PROTOCOL_HEADER, self.settings.protocol_version().as_str())
                .timeout(self.settings.request_timeout())
                .json(&payload)
                .build()
                .map_err(|e| {
                    DistributionError::new(DistributionErrorKind::RequestBuild(e.to_string()))
                })
        });
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Failed to build publish request");
                return Err(self.record_failure(attempt, e).await);
            }
        };

        let started = Instant::now();
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, duration_ms = started.elapsed().as_millis() as u64, "Publish request failed");
                let err = DistributionError::new(DistributionErrorKind::Transport(e.to_string()));
                return Err(self.record_failure(attempt, err).await);
            }
        };

        let status = response.status();
        let header_id = response
            .headers()
            .get(RESTLI_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(e) => {
                warn!(error = %e, "Failed to read publish response body");
                Vec::new()
            }
        };
        let parsed: Option<Value> = serde_json::from_slice::<Value>(&body)
            .ok()
            .filter(Value::is_object);
        attempt.set_response(parsed.clone());

        info!(
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Publish response received"
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "Access token expired or invalid");
            let err = DistributionError::new(DistributionErrorKind::CredentialExpired {
                status: status.as_u16(),
            });
            return Err(self.record_failure(attempt, err).await);
        }

        let raw_body = String::from_utf8_lossy(&body).into_owned();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            error!(status = status.as_u16(), response = %raw_body, "Publish rejected");
            let err = DistributionError::new(DistributionErrorKind::Rejected {
                status: status.as_u16(),
                body: raw_body,
            });
            return Err(self.record_failure(attempt, err).await);
        }

        let body_id = parsed
            .as_ref()
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let Some(external_id) = body_id.or(header_id) else {
            error!(response = %raw_body, "Publish succeeded but no post id was returned");
            let err = DistributionError::new(DistributionErrorKind::AmbiguousSuccess);
            return Err(self.record_failure(attempt, err).await);
        };

        attempt.succeed(external_id.as_str());
        self.distributions.create(attempt).await?;
        info!(external_post_id = %external_id, duration_ms = started.elapsed().as_millis() as u64, "Post published");

        if let Some(generation_id) = generation_id {
            self.mark_published(generation_id).await;
        }

        Ok(external_id)
    }

    /// Move the generation to `Published` when its status allows it.
    ///
    /// Never fails the publish: a missing record, a status that may not move
    /// forward, or a store error is logged and the generation is left as is.
    async fn mark_published(&self, generation_id: Uuid) {
        match self.generations.get(generation_id).await {
            Ok(Some(record)) if !record.status().can_transition_to(GenerationStatus::Published) => {
                warn!(%generation_id, status = %record.status(), "Generation cannot be marked published from its current status");
                return;
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(%generation_id, "Generation to mark published does not exist");
                return;
            }
            Err(e) => {
                warn!(%generation_id, error = %e, "Failed to load generation to mark published");
                return;
            }
        }

        let update = GenerationUpdate::default()
            .with_status(GenerationStatus::Published)
            .with_published_at(Utc::now());
        if let Err(e) = self.generations.update(generation_id, update).await {
            warn!(%generation_id, error = %e, "Failed to mark generation as published");
        }
    }

    /// Persist the failed attempt and hand back the error to surface.
    ///
    /// A store failure here is logged; the distribution error still wins.
    async fn record_failure(
        &self,
        mut attempt: NewDistributionRecord,
        err: DistributionError,
    ) -> PostpilotError {
        attempt.fail(err.audit_message());
        if let Err(store_err) = self.distributions.create(attempt).await {
            error!(error = %store_err, "Failed to persist failed distribution attempt");
        }
        err.into()
    }
}
