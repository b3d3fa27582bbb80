//! PostgreSQL distribution history.

use super::connection::{PgPool, with_connection};
use super::models::{DistributionRow, NewDistributionRow, parse_column};
use super::schema::distribution_records;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use postpilot_core::{DistributionRecord, DistributionStatus, NewDistributionRecord};
use postpilot_error::{StoreError, StoreErrorKind, StoreResult};
use postpilot_interface::DistributionStore;
use tracing::{info, instrument};
use uuid::Uuid;

/// Distribution history backed by the `distribution_records` table.
#[derive(Clone)]
pub struct PgDistributionStore {
    pool: PgPool,
}

impl PgDistributionStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DistributionStore for PgDistributionStore {
    #[instrument(skip(self, record), fields(user_id = %record.user_id(), status = %record.status()))]
    async fn create(&self, record: NewDistributionRecord) -> StoreResult<DistributionRecord> {
        let row = NewDistributionRow::new(Uuid::new_v4(), &record);
        let created = with_connection(&self.pool, move |conn| {
            let row: DistributionRow = diesel::insert_into(distribution_records::table)
                .values(&row)
                .returning(DistributionRow::as_returning())
                .get_result(conn)?;
            DistributionRecord::try_from(row)
        })
        .await?;
        info!(id = %created.id(), "Distribution record created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<DistributionRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        with_connection(&self.pool, move |conn| {
            distribution_records::table
                .filter(distribution_records::user_id.eq(user_id))
                .order(distribution_records::created_at.desc())
                .limit(limit)
                .select(DistributionRow::as_select())
                .load(conn)?
                .into_iter()
                .map(DistributionRecord::try_from)
                .collect()
        })
        .await
    }

    async fn find_by_external_id(
        &self,
        external_post_id: &str,
    ) -> StoreResult<Option<DistributionRecord>> {
        let external_post_id = external_post_id.to_string();
        with_connection(&self.pool, move |conn| {
            distribution_records::table
                .filter(distribution_records::external_post_id.eq(external_post_id))
                .order(distribution_records::created_at.desc())
                .select(DistributionRow::as_select())
                .first(conn)
                .optional()?
                .map(DistributionRecord::try_from)
                .transpose()
        })
        .await
    }

    async fn find_by_generation_id(
        &self,
        generation_id: Uuid,
    ) -> StoreResult<Option<DistributionRecord>> {
        with_connection(&self.pool, move |conn| {
            distribution_records::table
                .filter(distribution_records::generation_id.eq(generation_id))
                .filter(distribution_records::status.eq(DistributionStatus::Success.to_string()))
                .order(distribution_records::created_at.desc())
                .select(DistributionRow::as_select())
                .first(conn)
                .optional()?
                .map(DistributionRecord::try_from)
                .transpose()
        })
        .await
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Uuid, status: DistributionStatus) -> StoreResult<()> {
        with_connection(&self.pool, move |conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                let current: Option<String> = distribution_records::table
                    .find(id)
                    .select(distribution_records::status)
                    .for_update()
                    .first(conn)
                    .optional()?;
                let Some(current) = current else {
                    return Err(StoreError::new(StoreErrorKind::NotFound(format!(
                        "distribution {id}"
                    ))));
                };
                let current: DistributionStatus = parse_column("status", &current)?;
                if !current.can_transition_to(status) {
                    return Err(StoreError::new(StoreErrorKind::InvalidTransition(format!(
                        "distribution {id} is {current}, cannot become {status}"
                    ))));
                }
                diesel::update(distribution_records::table.find(id))
                    .set((
                        distribution_records::status.eq(status.to_string()),
                        distribution_records::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;
                Ok(())
            })
        })
        .await?;
        info!(id = %id, status = %status, "Distribution record status updated");
        Ok(())
    }
}
