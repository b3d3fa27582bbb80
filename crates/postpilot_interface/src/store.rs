//! Persistence interfaces for generation and distribution records.

use async_trait::async_trait;
use postpilot_core::{
    DistributionRecord, DistributionStatus, GenerationRecord, GenerationUpdate,
    NewDistributionRecord, NewGenerationRecord,
};
use postpilot_error::StoreResult;
use uuid::Uuid;

/// Persistence for generation attempts.
#[async_trait]
pub trait GenerationLogStore: Send + Sync {
    /// Insert a new record and return it with its assigned id.
    async fn create(&self, record: NewGenerationRecord) -> StoreResult<GenerationRecord>;

    /// Apply a partial update to the record with `id`.
    ///
    /// Fails with `StoreErrorKind::NotFound` when no such record exists and
    /// with `StoreErrorKind::InvalidTransition`, changing nothing, when the
    /// record's status may not move to the update's status.
    async fn update(&self, id: Uuid, update: GenerationUpdate) -> StoreResult<()>;

    /// Up to `limit` records owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: Uuid, limit: usize) -> StoreResult<Vec<GenerationRecord>>;

    /// Fetch one record by id.
    async fn get(&self, id: Uuid) -> StoreResult<Option<GenerationRecord>>;
}

/// Persistence for distribution attempts.
#[async_trait]
pub trait DistributionStore: Send + Sync {
    /// Insert a new record and return it with its assigned id.
    async fn create(&self, record: NewDistributionRecord) -> StoreResult<DistributionRecord>;

    /// Up to `limit` records owned by `user_id`, newest first.
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<DistributionRecord>>;

    /// The most recent record carrying `external_post_id`.
    async fn find_by_external_id(
        &self,
        external_post_id: &str,
    ) -> StoreResult<Option<DistributionRecord>>;

    /// The most recent successful (currently live) record for a generation.
    async fn find_by_generation_id(
        &self,
        generation_id: Uuid,
    ) -> StoreResult<Option<DistributionRecord>>;

    /// Set the status of the record with `id`, stamping `updated_at`.
    ///
    /// Moves not allowed by `DistributionStatus::can_transition_to` fail with
    /// `StoreErrorKind::InvalidTransition`.
    async fn update_status(&self, id: Uuid, status: DistributionStatus) -> StoreResult<()>;
}
