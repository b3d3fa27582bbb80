//! PostgreSQL-backed stores (Diesel + r2d2).

mod connection;
mod distribution_store;
mod generation_store;
mod models;
mod schema;

pub use connection::{PgPool, create_pool, run_migrations};
pub use distribution_store::PgDistributionStore;
pub use generation_store::PgGenerationLogStore;
