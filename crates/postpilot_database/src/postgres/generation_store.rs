//! PostgreSQL generation log.

use super::connection::{PgPool, with_connection};
use super::models::{GenerationChangeset, GenerationRow, NewGenerationRow, parse_column};
use super::schema::generation_records;
use async_trait::async_trait;
use diesel::prelude::*;
use postpilot_core::{GenerationRecord, GenerationStatus, GenerationUpdate, NewGenerationRecord};
use postpilot_error::{StoreError, StoreErrorKind, StoreResult};
use postpilot_interface::GenerationLogStore;
use tracing::{info, instrument};
use uuid::Uuid;

/// Generation log backed by the `generation_records` table.
#[derive(Clone)]
pub struct PgGenerationLogStore {
    pool: PgPool,
}

impl PgGenerationLogStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationLogStore for PgGenerationLogStore {
    #[instrument(skip(self, record), fields(user_id = %record.user_id()))]
    async fn create(&self, record: NewGenerationRecord) -> StoreResult<GenerationRecord> {
        let row = NewGenerationRow::new(Uuid::new_v4(), &record);
        let created = with_connection(&self.pool, move |conn| {
            let row: GenerationRow = diesel::insert_into(generation_records::table)
                .values(&row)
                .returning(GenerationRow::as_returning())
                .get_result(conn)?;
            GenerationRecord::try_from(row)
        })
        .await?;
        info!(generation_id = %created.id(), "Generation record created");
        Ok(created)
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: GenerationUpdate) -> StoreResult<()> {
        let changeset = GenerationChangeset::from(&update);
        if changeset.is_empty() {
            return Ok(());
        }
        let next = *update.status();
        with_connection(&self.pool, move |conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                let current: Option<String> = generation_records::table
                    .find(id)
                    .select(generation_records::status)
                    .for_update()
                    .first(conn)
                    .optional()?;
                let Some(current) = current else {
                    return Err(StoreError::new(StoreErrorKind::NotFound(format!(
                        "generation {id}"
                    ))));
                };
                if let Some(next) = next {
                    let current: GenerationStatus = parse_column("status", &current)?;
                    if !current.can_transition_to(next) {
                        return Err(StoreError::new(StoreErrorKind::InvalidTransition(format!(
                            "generation {id} is {current}, cannot become {next}"
                        ))));
                    }
                }
                diesel::update(generation_records::table.find(id))
                    .set(&changeset)
                    .execute(conn)?;
                Ok(())
            })
        })
        .await?;
        info!(generation_id = %id, "Generation record updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: Uuid, limit: usize) -> StoreResult<Vec<GenerationRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        with_connection(&self.pool, move |conn| {
            generation_records::table
                .filter(generation_records::user_id.eq(user_id))
                .order(generation_records::created_at.desc())
                .limit(limit)
                .select(GenerationRow::as_select())
                .load(conn)?
                .into_iter()
                .map(GenerationRecord::try_from)
                .collect()
        })
        .await
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<GenerationRecord>> {
        with_connection(&self.pool, move |conn| {
            generation_records::table
                .find(id)
                .select(GenerationRow::as_select())
                .first(conn)
                .optional()?
                .map(GenerationRecord::try_from)
                .transpose()
        })
        .await
    }
}
