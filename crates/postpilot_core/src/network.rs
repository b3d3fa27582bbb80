//! Supported social networks.

use serde::{Deserialize, Serialize};

/// External social network a post is distributed to.
///
/// The set is closed; payload shapes and endpoints are selected by matching
/// on the variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    /// LinkedIn UGC posts API
    #[default]
    LinkedIn,
}
