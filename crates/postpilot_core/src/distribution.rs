//! Distribution attempt records.

use crate::{DistributionStatus, Network};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One publish attempt to an external network.
///
/// Append-only: written once at the terminal point of the attempt. The only
/// later mutation is the withdrawal transition to `Deleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRecord {
    id: Uuid,
    user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generation_id: Option<Uuid>,
    network: Network,
    post_content: String,
    payload: Value,
    response: Option<Value>,
    status: DistributionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    external_post_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DistributionRecord {
    /// Reassemble a record from persisted columns.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        user_id: Uuid,
        generation_id: Option<Uuid>,
        network: Network,
        post_content: String,
        payload: Value,
        response: Option<Value>,
        status: DistributionStatus,
        error: Option<String>,
        external_post_id: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            generation_id,
            network,
            post_content,
            payload,
            response,
            status,
            error,
            external_post_id,
            created_at,
            updated_at,
        }
    }

    /// Move to `status`, stamping `updated_at`.
    ///
    /// Returns `false` and changes nothing when the move is not allowed.
    pub fn transition(&mut self, status: DistributionStatus, at: DateTime<Utc>) -> bool {
        if !self.status.can_transition_to(status) {
            return false;
        }
        self.status = status;
        self.updated_at = at;
        true
    }
}

/// A distribution attempt accumulated in memory until its outcome is known.
///
/// Starts at `Started`; [`fail`](Self::fail) or [`succeed`](Self::succeed)
/// moves it into the terminal state it is persisted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct NewDistributionRecord {
    user_id: Uuid,
    generation_id: Option<Uuid>,
    network: Network,
    post_content: String,
    payload: Value,
    response: Option<Value>,
    status: DistributionStatus,
    error: Option<String>,
    external_post_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NewDistributionRecord {
    /// Begin an attempt for `post_content` on `network`.
    pub fn attempt(
        user_id: Uuid,
        generation_id: Option<Uuid>,
        network: Network,
        post_content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            generation_id,
            network,
            post_content: post_content.into(),
            payload: Value::Null,
            response: None,
            status: DistributionStatus::Started,
            error: None,
            external_post_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the outgoing request body for audit.
    pub fn set_payload(&mut self, payload: Value) {
        self.payload = payload;
    }

    /// Record the parsed response body (`None` when it was not JSON).
    pub fn set_response(&mut self, response: Option<Value>) {
        self.response = response;
        self.updated_at = Utc::now();
    }

    /// Terminal failure with a diagnostic message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = DistributionStatus::Error;
        self.error = Some(message.into());
        self.updated_at = Utc::now();
    }

    /// Terminal success with the identifier assigned by the network.
    pub fn succeed(&mut self, external_post_id: impl Into<String>) {
        self.status = DistributionStatus::Success;
        self.external_post_id = Some(external_post_id.into());
        self.error = None;
        self.updated_at = Utc::now();
    }

    /// Materialize the record under an assigned id.
    pub fn into_record(self, id: Uuid) -> DistributionRecord {
        DistributionRecord {
            id,
            user_id: self.user_id,
            generation_id: self.generation_id,
            network: self.network,
            post_content: self.post_content,
            payload: self.payload,
            response: self.response,
            status: self.status,
            error: self.error,
            external_post_id: self.external_post_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
