//! Error types for the PostPilot pipeline.
//!
//! Every domain owns a location-tracking error struct (`kind` + `file`/`line`).
//! [`PostpilotError`] aggregates them for the facade and the binary.

#![warn(missing_docs)]

mod config;
mod distribution;
mod error;
mod generation;
mod store;
mod validation;

pub use config::ConfigError;
pub use distribution::{DistributionError, DistributionErrorKind};
pub use error::{PostpilotError, PostpilotErrorKind, PostpilotResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use store::{StoreError, StoreErrorKind, StoreResult};
pub use validation::{AuthError, ValidationError};
