//! Generation attempt records.

use crate::{GenerationStatus, UsageMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One text-generation attempt for a single topic.
///
/// Created at `Started` before the provider call and resolved by exactly one
/// update to `Success` or `Error`. Distribution components may later move it
/// to `Published` and `Deleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    id: Uuid,
    user_id: Uuid,
    input: String,
    output: String,
    model: String,
    usage: UsageMap,
    status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    published_at: Option<DateTime<Utc>>,
}

impl GenerationRecord {
    /// Reassemble a record from persisted columns.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        user_id: Uuid,
        input: String,
        output: String,
        model: String,
        usage: UsageMap,
        status: GenerationStatus,
        error: Option<String>,
        created_at: DateTime<Utc>,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            input,
            output,
            model,
            usage,
            status,
            error,
            created_at,
            published_at,
        }
    }

    /// Apply a partial update. Fields left `None` are kept.
    ///
    /// Returns `false`, leaving the record untouched, when the update carries
    /// a status the current one may not move to.
    pub fn apply(&mut self, update: &GenerationUpdate) -> bool {
        if let Some(next) = update.status
            && !self.status.can_transition_to(next)
        {
            return false;
        }
        if let Some(output) = &update.output {
            self.output = output.clone();
        }
        if let Some(model) = &update.model {
            self.model = model.clone();
        }
        if let Some(usage) = &update.usage {
            self.usage = usage.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(error) = &update.error {
            self.error = Some(error.clone());
        }
        if let Some(published_at) = update.published_at {
            self.published_at = Some(published_at);
        }
        true
    }
}

/// Insertable data for a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct NewGenerationRecord {
    user_id: Uuid,
    input: String,
    status: GenerationStatus,
    created_at: DateTime<Utc>,
}

impl NewGenerationRecord {
    /// A fresh attempt for `topic`, stamped now, at status `Started`.
    pub fn started(user_id: Uuid, topic: impl Into<String>) -> Self {
        Self {
            user_id,
            input: topic.into(),
            status: GenerationStatus::Started,
            created_at: Utc::now(),
        }
    }

    /// Materialize the record under an assigned id.
    pub fn into_record(self, id: Uuid) -> GenerationRecord {
        GenerationRecord {
            id,
            user_id: self.user_id,
            input: self.input,
            output: String::new(),
            model: String::new(),
            usage: UsageMap::new(),
            status: self.status,
            error: None,
            created_at: self.created_at,
            published_at: None,
        }
    }
}

/// Partial update of a [`GenerationRecord`]; `None` fields are left untouched.
///
/// # Examples
///
/// ```
/// use postpilot_core::{GenerationStatus, GenerationUpdate};
///
/// let update = GenerationUpdate::default()
///     .with_status(GenerationStatus::Error)
///     .with_error("provider unavailable".to_string());
/// assert_eq!(*update.status(), Some(GenerationStatus::Error));
/// assert!(update.output().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option)]
pub struct GenerationUpdate {
    output: Option<String>,
    model: Option<String>,
    usage: Option<UsageMap>,
    status: Option<GenerationStatus>,
    error: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

impl GenerationUpdate {
    /// Status-only transition.
    pub fn status_only(status: GenerationStatus) -> Self {
        Self::default().with_status(status)
    }
}

/// What a generate call hands back to its caller, success or not.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_new::new,
)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Generated text; empty when the provider failed
    generated_text: String,
    /// Model used (empty when the provider reported none)
    model: String,
    /// Provider usage metrics
    usage: UsageMap,
    /// Creation timestamp of the generation record
    created_at: DateTime<Utc>,
    /// Id of the generation record
    record_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_unset_fields() {
        let mut record = NewGenerationRecord::started(Uuid::new_v4(), "rust").into_record(Uuid::new_v4());
        assert!(record.apply(
            &GenerationUpdate::default()
                .with_output("hello".to_string())
                .with_status(GenerationStatus::Success),
        ));
        assert!(record.apply(&GenerationUpdate::status_only(GenerationStatus::Published)));

        assert_eq!(record.output(), "hello");
        assert_eq!(*record.status(), GenerationStatus::Published);
        assert!(record.error().is_none());
        assert!(record.published_at().is_none());
    }

    #[test]
    fn apply_refuses_to_leave_terminal_status() {
        let mut record = NewGenerationRecord::started(Uuid::new_v4(), "rust").into_record(Uuid::new_v4());
        assert!(record.apply(
            &GenerationUpdate::default()
                .with_status(GenerationStatus::Error)
                .with_error("provider down".to_string()),
        ));

        let applied = record.apply(
            &GenerationUpdate::default()
                .with_status(GenerationStatus::Published)
                .with_published_at(Utc::now()),
        );

        assert!(!applied);
        assert_eq!(*record.status(), GenerationStatus::Error);
        assert!(record.published_at().is_none());
    }
}
