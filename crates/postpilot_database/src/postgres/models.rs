//! Diesel models for generation and distribution records.

use super::schema::{distribution_records, generation_records};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use postpilot_core::{
    DistributionRecord, DistributionStatus, GenerationRecord, GenerationStatus, GenerationUpdate,
    Network, NewDistributionRecord, NewGenerationRecord, UsageMap,
};
use postpilot_error::{StoreError, StoreErrorKind, StoreResult};
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

pub(super) fn parse_column<T: FromStr>(column: &str, value: &str) -> StoreResult<T> {
    T::from_str(value).map_err(|_| {
        StoreError::new(StoreErrorKind::Serialization(format!(
            "unexpected {column} value '{value}'"
        )))
    })
}

fn usage_from_json(value: Value) -> UsageMap {
    match value {
        Value::Object(map) => map,
        _ => UsageMap::new(),
    }
}

/// Database row for the generation_records table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = generation_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenerationRow {
    id: Uuid,
    user_id: Uuid,
    input: String,
    output: String,
    model: String,
    usage: Value,
    status: String,
    error: Option<String>,
    created_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl TryFrom<GenerationRow> for GenerationRecord {
    type Error = StoreError;

    fn try_from(row: GenerationRow) -> StoreResult<Self> {
        let status: GenerationStatus = parse_column("status", &row.status)?;
        Ok(GenerationRecord::from_parts(
            row.id,
            row.user_id,
            row.input,
            row.output,
            row.model,
            usage_from_json(row.usage),
            status,
            row.error,
            row.created_at,
            row.published_at,
        ))
    }
}

/// Insertable row for a new generation attempt.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = generation_records)]
pub struct NewGenerationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub input: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl NewGenerationRow {
    pub fn new(id: Uuid, record: &NewGenerationRecord) -> Self {
        Self {
            id,
            user_id: *record.user_id(),
            input: record.input().clone(),
            status: record.status().to_string(),
            created_at: *record.created_at(),
        }
    }
}

/// Changeset applied by a generation update; `None` columns are left alone.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = generation_records)]
pub struct GenerationChangeset {
    pub output: Option<String>,
    pub model: Option<String>,
    pub usage: Option<Value>,
    pub status: Option<String>,
    pub error: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl GenerationChangeset {
    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.output.is_none()
            && self.model.is_none()
            && self.usage.is_none()
            && self.status.is_none()
            && self.error.is_none()
            && self.published_at.is_none()
    }
}

impl From<&GenerationUpdate> for GenerationChangeset {
    fn from(update: &GenerationUpdate) -> Self {
        Self {
            output: update.output().clone(),
            model: update.model().clone(),
            usage: update.usage().clone().map(Value::Object),
            status: update.status().map(|s| s.to_string()),
            error: update.error().clone(),
            published_at: *update.published_at(),
        }
    }
}

/// Database row for the distribution_records table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = distribution_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DistributionRow {
    id: Uuid,
    user_id: Uuid,
    generation_id: Option<Uuid>,
    network: String,
    post_content: String,
    payload: Value,
    response: Option<Value>,
    status: String,
    error: Option<String>,
    external_post_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DistributionRow> for DistributionRecord {
    type Error = StoreError;

    fn try_from(row: DistributionRow) -> StoreResult<Self> {
        let network: Network = parse_column("network", &row.network)?;
        let status: DistributionStatus = parse_column("status", &row.status)?;
        Ok(DistributionRecord::from_parts(
            row.id,
            row.user_id,
            row.generation_id,
            network,
            row.post_content,
            row.payload,
            row.response,
            status,
            row.error,
            row.external_post_id,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// Insertable row for a terminal distribution attempt.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = distribution_records)]
pub struct NewDistributionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub generation_id: Option<Uuid>,
    pub network: String,
    pub post_content: String,
    pub payload: Value,
    pub response: Option<Value>,
    pub status: String,
    pub error: Option<String>,
    pub external_post_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewDistributionRow {
    pub fn new(id: Uuid, record: &NewDistributionRecord) -> Self {
        Self {
            id,
            user_id: *record.user_id(),
            generation_id: *record.generation_id(),
            network: record.network().to_string(),
            post_content: record.post_content().clone(),
            payload: record.payload().clone(),
            response: record.response().clone(),
            status: record.status().to_string(),
            error: record.error().clone(),
            external_post_id: record.external_post_id().clone(),
            created_at: *record.created_at(),
            updated_at: *record.updated_at(),
        }
    }
}
