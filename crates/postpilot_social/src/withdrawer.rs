//! Withdrawing published posts and reconciling local state.

use crate::LinkedInSettings;
use crate::endpoint::{RESTLI_PROTOCOL_HEADER, delete_url};
use postpilot_core::{DistributionRecord, DistributionStatus, GenerationStatus, GenerationUpdate, Network};
use postpilot_error::{DistributionError, DistributionErrorKind, PostpilotError, PostpilotResult};
use postpilot_interface::{DistributionStore, GenerationLogStore};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Deletes published posts from a network.
///
/// Local status is reconciled only after the network confirms the delete,
/// and each reconciliation write is independent and best-effort.
#[derive(Clone)]
pub struct DistributionWithdrawer {
    client: Client,
    network: Network,
    settings: LinkedInSettings,
    distributions: Arc<dyn DistributionStore>,
    generations: Arc<dyn GenerationLogStore>,
}

/// External id to delete, plus the local record it was resolved from.
struct Target {
    external_id: String,
    record: Option<DistributionRecord>,
}

impl DistributionWithdrawer {
    /// Create a LinkedIn withdrawer.
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

    /// Delete a post from the network.
    ///
    /// A non-empty `explicit_external_id` is used as is. Otherwise the most
    /// recent live post for `generation_id` is looked up; when there is none
    /// the call fails with `NotFound` before contacting the network.
    ///
    /// Returns `Ok` exactly when the network accepted the delete.
    #[instrument(skip(self, access_token), fields(network = %self.network))]
    pub async fn delete(
        &self,
        user_id: Uuid,
        generation_id: Option<Uuid>,
        access_token: &str,
        explicit_external_id: Option<&str>,
    ) -> PostpilotResult<()> {
        info!("Starting post deletion");

        let target = self.resolve(generation_id, explicit_external_id).await?;
        self.call_delete(access_token, &target.external_id).await?;
        info!(external_post_id = %target.external_id, "Post deleted");

        self.reconcile(generation_id, target).await;
        Ok(())
    }

    async fn resolve(
        &self,
        generation_id: Option<Uuid>,
        explicit_external_id: Option<&str>,
    ) -> PostpilotResult<Target> {
        if let Some(external_id) = explicit_external_id.filter(|id| !id.is_empty()) {
            return Ok(Target {
                external_id: external_id.to_string(),
                record: None,
            });
        }

        let Some(generation_id) = generation_id else {
            return Err(DistributionError::new(DistributionErrorKind::NotFound(
                "no post id or generation id given".to_string(),
            ))
            .into());
        };

        let record = self.distributions.find_by_generation_id(generation_id).await?;
        match record {
            Some(record) => match record.external_post_id().clone() {
                Some(external_id) => Ok(Target {
                    external_id,
                    record: Some(record),
                }),
                None => Err(not_found(generation_id)),
            },
            None => {
                warn!(%generation_id, "No published post found for generation");
                Err(not_found(generation_id))
            }
        }
    }

    async fn call_delete(&self, access_token: &str, external_id: &str) -> Result<(), DistributionError> {
        let url = delete_url(self.network, self.settings.api_base_url(), external_id)?;
        debug!(url = %url, "Sending delete request");

        let request = self
            .client
            .delete(url)
            .bearer_auth(access_token)
            .header(RESTLI_PROTOCOL_HEADER, self.settings.protocol_version().as_str())
            .timeout(self.settings.request_timeout())
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build delete request");
                DistributionError::new(DistributionErrorKind::RequestBuild(e.to_string()))
            })?;

        let response = self.client.execute(request).await.map_err(|e| {
            error!(error = %e, "Delete request failed");
            DistributionError::new(DistributionErrorKind::Transport(e.to_string()))
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "Access token expired or invalid for deletion");
            return Err(DistributionError::new(DistributionErrorKind::CredentialExpired {
                status: status.as_u16(),
            }));
        }

        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), response = %body, "Delete rejected");
            return Err(DistributionError::new(DistributionErrorKind::Rejected {
                status: status.as_u16(),
                body,
            }));
        }

        Ok(())
    }

    /// Mark the generation and the distribution record deleted; failures are logged.
    ///
    /// Records whose status may not move to `Deleted` are left as they are.
    /// With an explicit id that matches no local record, the generation's
    /// most recent live record is marked instead.
    async fn reconcile(&self, generation_id: Option<Uuid>, target: Target) {
        if let Some(generation_id) = generation_id {
            self.mark_generation_deleted(generation_id).await;
        }

        let record = match target.record {
            Some(record) => Some(record),
            None => self.lookup_record(generation_id, &target.external_id).await,
        };
        let Some(record) = record else {
            return;
        };

        if !record.status().can_transition_to(DistributionStatus::Deleted) {
            warn!(distribution_id = %record.id(), status = %record.status(), "Distribution cannot be marked deleted from its current status");
            return;
        }
        if let Err(e) = self
            .distributions
            .update_status(*record.id(), DistributionStatus::Deleted)
            .await
        {
            warn!(distribution_id = %record.id(), error = %e, "Failed to mark distribution as deleted");
        }
    }

    async fn mark_generation_deleted(&self, generation_id: Uuid) {
        match self.generations.get(generation_id).await {
            Ok(Some(record)) if !record.status().can_transition_to(GenerationStatus::Deleted) => {
                warn!(%generation_id, status = %record.status(), "Generation cannot be marked deleted from its current status");
                return;
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(%generation_id, "No local generation to mark deleted");
                return;
            }
            Err(e) => {
                warn!(%generation_id, error = %e, "Failed to load generation to mark deleted");
                return;
            }
        }

        let update = GenerationUpdate::status_only(GenerationStatus::Deleted);
        if let Err(e) = self.generations.update(generation_id, update).await {
            warn!(%generation_id, error = %e, "Failed to mark generation as deleted");
        }
    }

    async fn lookup_record(
        &self,
        generation_id: Option<Uuid>,
        external_id: &str,
    ) -> Option<DistributionRecord> {
        match self.distributions.find_by_external_id(external_id).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to look up distribution by post id"),
        }

        let generation_id = generation_id?;
        match self.distributions.find_by_generation_id(generation_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(%generation_id, error = %e, "Failed to look up distribution by generation");
                None
            }
        }
    }
}

fn not_found(generation_id: Uuid) -> PostpilotError {
    DistributionError::new(DistributionErrorKind::NotFound(generation_id.to_string())).into()
}
