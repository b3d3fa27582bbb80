//! Trait definitions for the PostPilot pipeline.
//!
//! The pipeline components receive these collaborators by injection; nothing
//! in the pipeline holds process-wide state.

mod provider;
mod store;

pub use provider::TextGenerator;
pub use store::{DistributionStore, GenerationLogStore};
