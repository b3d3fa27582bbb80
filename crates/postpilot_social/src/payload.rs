//! Network-specific publish payloads.

use postpilot_core::Network;
use postpilot_error::{DistributionError, DistributionErrorKind};
use serde::Serialize;
use serde_json::Value;

/// Outgoing publish body, one variant per network.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NetworkPayload {
    /// LinkedIn UGC post
    LinkedIn(UgcPost),
}

impl NetworkPayload {
    /// Payload publishing `text` publicly as `author` on `network`.
    ///
    /// # Examples
    ///
    /// ```
    /// use postpilot_core::Network;
    /// use postpilot_social::NetworkPayload;
    ///
    /// let payload = NetworkPayload::build(Network::LinkedIn, "urn:li:person:42", "Hello");
    /// let value = payload.to_value().unwrap();
    /// assert_eq!(value["author"], "urn:li:person:42");
    /// assert_eq!(value["lifecycleState"], "PUBLISHED");
    /// ```
    pub fn build(network: Network, author: &str, text: &str) -> Self {
        match network {
            Network::LinkedIn => Self::LinkedIn(UgcPost::public(author, text)),
        }
    }

    /// Serialize for sending and for the audit record.
    pub fn to_value(&self) -> Result<Value, DistributionError> {
        serde_json::to_value(self).map_err(|e| {
            DistributionError::new(DistributionErrorKind::Serialization(e.to_string()))
        })
    }
}

/// LinkedIn `ugcPosts` request body.
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct UgcPost {
    author: String,
    lifecycle_state: LifecycleState,
    specific_content: SpecificContent,
    visibility: Visibility,
}

impl UgcPost {
    /// A published, publicly visible text-only share.
    pub fn public(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            lifecycle_state: LifecycleState::Published,
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: ShareCommentary { text: text.into() },
                    share_media_category: ShareMediaCategory::NoMedia,
                },
            },
            visibility: Visibility {
                member_network: MemberNetworkVisibility::Public,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum LifecycleState {
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SpecificContent {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    share_content: ShareContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareContent {
    share_commentary: ShareCommentary,
    share_media_category: ShareMediaCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ShareCommentary {
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum ShareMediaCategory {
    #[serde(rename = "NONE")]
    NoMedia,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    member_network: MemberNetworkVisibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum MemberNetworkVisibility {
    Public,
}
