//! Network endpoints and protocol headers.

use postpilot_core::Network;
use postpilot_error::{DistributionError, DistributionErrorKind};
use reqwest::Url;

/// Protocol version header sent on every LinkedIn call.
pub(crate) const RESTLI_PROTOCOL_HEADER: &str = "X-Restli-Protocol-Version";

/// Response header carrying the post id when the body omits it.
pub(crate) const RESTLI_ID_HEADER: &str = "x-restli-id";

/// Collection endpoint posts are created in.
pub(crate) fn publish_url(network: Network, base_url: &str) -> Result<Url, DistributionError> {
    match network {
        Network::LinkedIn => join(base_url, &["ugcPosts"]),
    }
}

/// Endpoint deleting the post `external_id`.
pub(crate) fn delete_url(
    network: Network,
    base_url: &str,
    external_id: &str,
) -> Result<Url, DistributionError> {
    match network {
        Network::LinkedIn => join(base_url, &["ugcPosts", external_id]),
    }
}

fn join(base_url: &str, segments: &[&str]) -> Result<Url, DistributionError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        DistributionError::new(DistributionErrorKind::RequestBuild(format!(
            "invalid base url {}: {}",
            base_url, e
        )))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            DistributionError::new(DistributionErrorKind::RequestBuild(format!(
                "base url cannot carry a path: {}",
                base_url
            )))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
