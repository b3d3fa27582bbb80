//! Social network distribution for PostPilot.
//!
//! [`DistributionPublisher`] posts generated text to a network and writes
//! exactly one audit record per attempt. [`DistributionWithdrawer`] deletes a
//! published post and reconciles local record status.
//!
//! Networks form a closed set ([`Network`](postpilot_core::Network)); payload
//! shapes and endpoints are chosen by matching on the variant.

#![warn(missing_docs)]

mod endpoint;
mod payload;
mod publisher;
mod settings;
mod withdrawer;

pub use payload::{NetworkPayload, UgcPost};
pub use publisher::DistributionPublisher;
pub use settings::{LinkedInSettings, LinkedInSettingsBuilder};
pub use withdrawer::DistributionWithdrawer;
