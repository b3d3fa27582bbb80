//! LinkedIn API connection settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how LinkedIn is called.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct LinkedInSettings {
    /// API root, e.g. `https://api.linkedin.com/v2`
    api_base_url: String,
    /// Per-request timeout for publish and delete calls
    request_timeout_secs: u64,
    /// Value of the `X-Restli-Protocol-Version` header
    protocol_version: String,
}

impl LinkedInSettings {
    /// Creates a builder for LinkedInSettings.
    pub fn builder() -> LinkedInSettingsBuilder {
        LinkedInSettingsBuilder::default()
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for LinkedInSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.linkedin.com/v2".to_string(),
            request_timeout_secs: 10,
            protocol_version: "2.0.0".to_string(),
        }
    }
}
