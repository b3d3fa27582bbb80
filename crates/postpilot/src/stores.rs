//! Record store selection.

use postpilot_database::{InMemoryDistributionStore, InMemoryGenerationLogStore};
use postpilot_interface::{DistributionStore, GenerationLogStore};
use postpilot_pipeline::PipelineConfig;
use std::sync::Arc;
use tracing::warn;

/// Generation and distribution stores, shared by every component.
pub type Stores = (Arc<dyn GenerationLogStore>, Arc<dyn DistributionStore>);

/// PostgreSQL stores when a database URL is configured, in-memory otherwise.
#[cfg(feature = "postgres")]
pub fn open(config: &PipelineConfig) -> anyhow::Result<Stores> {
    use postpilot_database::{PgDistributionStore, PgGenerationLogStore, create_pool, run_migrations};

    let Some(url) = config.storage().database_url() else {
        return Ok(in_memory());
    };
    let pool = create_pool(url, *config.storage().max_connections())?;
    run_migrations(&pool)?;
    tracing::info!("Using PostgreSQL record stores");
    Ok((
        Arc::new(PgGenerationLogStore::new(pool.clone())),
        Arc::new(PgDistributionStore::new(pool)),
    ))
}

/// In-memory stores; a configured database URL needs the `postgres` feature.
#[cfg(not(feature = "postgres"))]
pub fn open(config: &PipelineConfig) -> anyhow::Result<Stores> {
    if config.storage().database_url().is_some() {
        warn!("storage.database_url is set but PostgreSQL support is not compiled in");
    }
    Ok(in_memory())
}

fn in_memory() -> Stores {
    warn!("Using in-memory record stores; records are lost on exit");
    (
        Arc::new(InMemoryGenerationLogStore::new()),
        Arc::new(InMemoryDistributionStore::new()),
    )
}
