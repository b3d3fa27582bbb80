//! Core data types for the PostPilot pipeline.
//!
//! This crate provides the records persisted for every generation and
//! distribution attempt, their status machines, and the value types passed
//! between the pipeline components.

mod distribution;
mod generation;
mod network;
mod status;
mod usage;
mod user;

pub use distribution::{DistributionRecord, NewDistributionRecord};
pub use generation::{GenerationRecord, GenerationResult, GenerationUpdate, NewGenerationRecord};
pub use network::Network;
pub use status::{DistributionStatus, GenerationStatus};
pub use usage::{TextCompletion, TokenUsage, UsageMap};
pub use user::{User, UserBuilder};
