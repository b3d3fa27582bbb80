//! In-memory implementations of the record stores.
//!
//! Records live in a `Vec` behind a `tokio` `RwLock`, in insertion order.
//! All data is lost when the store is dropped.

use async_trait::async_trait;
use chrono::Utc;
use postpilot_core::{
    DistributionRecord, DistributionStatus, GenerationRecord, GenerationUpdate,
    NewDistributionRecord, NewGenerationRecord,
};
use postpilot_error::{StoreError, StoreErrorKind, StoreResult};
use postpilot_interface::{DistributionStore, GenerationLogStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Newest first by creation time; later inserts win ties.
fn newest_first<T, F>(records: &[T], limit: usize, keep: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<chrono::DateTime<Utc>>,
{
    let mut selected: Vec<(usize, chrono::DateTime<Utc>, &T)> = records
        .iter()
        .enumerate()
        .filter_map(|(seq, r)| keep(r).map(|at| (seq, at, r)))
        .collect();
    selected.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    selected
        .into_iter()
        .take(limit)
        .map(|(_, _, r)| r.clone())
        .collect()
}

/// In-memory generation log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenerationLogStore {
    records: Arc<RwLock<Vec<GenerationRecord>>>,
}

impl InMemoryGenerationLogStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (for testing).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the store is empty (for testing).
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl GenerationLogStore for InMemoryGenerationLogStore {
    #[instrument(skip(self, record), fields(user_id = %record.user_id()))]
    async fn create(&self, record: NewGenerationRecord) -> StoreResult<GenerationRecord> {
        let record = record.into_record(Uuid::new_v4());
        self.records.write().await.push(record.clone());
        debug!(generation_id = %record.id(), "Generation record created");
        Ok(record)
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: GenerationUpdate) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| *r.id() == id)
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(format!("generation {id}"))))?;
        let from = *record.status();
        if !record.apply(&update) {
            return Err(StoreError::new(StoreErrorKind::InvalidTransition(format!(
                "generation {id} is {from}, cannot become {}",
                update.status().map(|s| s.to_string()).unwrap_or_default()
            ))));
        }
        debug!(status = ?update.status(), "Generation record updated");
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid, limit: usize) -> StoreResult<Vec<GenerationRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(&records, limit, |r| {
            (*r.user_id() == user_id).then_some(*r.created_at())
        }))
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<GenerationRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| *r.id() == id)
            .cloned())
    }
}

/// In-memory distribution history.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDistributionStore {
    records: Arc<RwLock<Vec<DistributionRecord>>>,
}

impl InMemoryDistributionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (for testing).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the store is empty (for testing).
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every record in insertion order (for testing).
    pub async fn all(&self) -> Vec<DistributionRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl DistributionStore for InMemoryDistributionStore {
    #[instrument(skip(self, record), fields(user_id = %record.user_id(), status = %record.status()))]
    async fn create(&self, record: NewDistributionRecord) -> StoreResult<DistributionRecord> {
        let record = record.into_record(Uuid::new_v4());
        self.records.write().await.push(record.clone());
        debug!(distribution_id = %record.id(), "Distribution record created");
        Ok(record)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<DistributionRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(&records, limit, |r| {
            (*r.user_id() == user_id).then_some(*r.created_at())
        }))
    }

    async fn find_by_external_id(
        &self,
        external_post_id: &str,
    ) -> StoreResult<Option<DistributionRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(&records, 1, |r| {
            (r.external_post_id().as_deref() == Some(external_post_id)).then_some(*r.created_at())
        })
        .pop())
    }

    async fn find_by_generation_id(
        &self,
        generation_id: Uuid,
    ) -> StoreResult<Option<DistributionRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(&records, 1, |r| {
            (*r.generation_id() == Some(generation_id)
                && *r.status() == DistributionStatus::Success)
                .then_some(*r.created_at())
        })
        .pop())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Uuid, status: DistributionStatus) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| *r.id() == id).ok_or_else(|| {
            StoreError::new(StoreErrorKind::NotFound(format!("distribution {id}")))
        })?;
        let from = *record.status();
        if !record.transition(status, Utc::now()) {
            return Err(StoreError::new(StoreErrorKind::InvalidTransition(format!(
                "distribution {id} is {from}, cannot become {status}"
            ))));
        }
        debug!("Distribution record status updated");
        Ok(())
    }
}
