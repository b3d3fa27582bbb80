//! Record stores for the PostPilot pipeline.
//!
//! In-memory stores are always available and back the tests and local runs.
//! The PostgreSQL stores are compiled with the `postgres` feature.

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::{InMemoryDistributionStore, InMemoryGenerationLogStore};
#[cfg(feature = "postgres")]
pub use postgres::{
    PgDistributionStore, PgGenerationLogStore, PgPool, create_pool, run_migrations,
};
