//! Authenticated user record supplied by the identity provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The parts of an authenticated user the pipeline reads.
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
#[builder(setter(into))]
pub struct User {
    /// Owner identifier for every record written on the user's behalf
    id: Uuid,
    /// Text-generation provider API key
    #[builder(default)]
    provider_api_key: String,
    /// Preferred generation model; the configured default is used when empty
    #[builder(default)]
    model: Option<String>,
    /// LinkedIn OAuth access token
    #[builder(default)]
    linkedin_access_token: Option<String>,
    /// LinkedIn author URN (e.g. `urn:li:person:42`)
    #[builder(default)]
    linkedin_person_urn: Option<String>,
}

impl User {
    /// Creates a builder for User.
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Model preference, ignoring blank values.
    pub fn preferred_model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// LinkedIn credentials, present only when both token and author are non-empty.
    pub fn linkedin_credentials(&self) -> Option<(&str, &str)> {
        let token = self
            .linkedin_access_token
            .as_deref()
            .filter(|t| !t.is_empty())?;
        let urn = self
            .linkedin_person_urn
            .as_deref()
            .filter(|u| !u.is_empty())?;
        Some((token, urn))
    }
}
