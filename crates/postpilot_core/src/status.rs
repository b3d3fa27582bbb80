//! Status machines for generation and distribution records.

use serde::{Deserialize, Serialize};

/// Lifecycle of a [`GenerationRecord`](crate::GenerationRecord).
///
/// `Started -> {Success | Error}`, then optionally `-> Published -> Deleted`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationStatus {
    /// Persisted before the provider call
    Started,
    /// Provider returned text
    Success,
    /// Provider call failed
    Error,
    /// Text was published to a network
    Published,
    /// Published post was withdrawn
    Deleted,
}

impl GenerationStatus {
    /// Whether a record at `self` may move to `next`.
    ///
    /// `Error` and `Deleted` are terminal and no status moves backwards.
    /// `Success -> Deleted` covers posts whose publish bookkeeping was lost.
    pub fn can_transition_to(self, next: Self) -> bool {
        use GenerationStatus::*;
        matches!(
            (self, next),
            (Started, Success | Error) | (Success, Published | Deleted) | (Published, Deleted)
        )
    }
}

/// Lifecycle of a [`DistributionRecord`](crate::DistributionRecord).
///
/// Records are written directly into `Success` or `Error`; only `Success`
/// records move on to `Deleted`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DistributionStatus {
    /// State of a `NewDistributionRecord` held in memory before it reaches
    /// `Success` or `Error`; never persisted
    Started,
    /// Network accepted the post and returned its identifier
    Success,
    /// Attempt failed terminally
    Error,
    /// Post was withdrawn from the network
    Deleted,
}

impl DistributionStatus {
    /// Whether a record at `self` may move to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        use DistributionStatus::*;
        matches!((self, next), (Started, Success | Error) | (Success, Deleted))
    }
}
