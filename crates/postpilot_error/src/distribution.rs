//! Social network distribution error types.

/// Message stored and surfaced when the network rejects the stored credentials.
pub(crate) const RECONNECT_MESSAGE: &str =
    "LinkedIn token expired or invalid. Please reconnect your LinkedIn account.";

/// Distribution error conditions.
///
/// Each variant is a terminal outcome of one publish or withdraw attempt.
/// None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DistributionErrorKind {
    /// Outgoing payload could not be serialized
    #[display("Failed to serialize payload: {}", _0)]
    Serialization(String),
    /// Outgoing request could not be constructed
    #[display("Failed to build request: {}", _0)]
    RequestBuild(String),
    /// No response was received from the network
    #[display("Network request failed: {}", _0)]
    Transport(String),
    /// Network answered 401/403; the account must be reconnected
    #[display("{}", RECONNECT_MESSAGE)]
    CredentialExpired {
        /// HTTP status code (401 or 403)
        status: u16,
    },
    /// Network answered with any other non-success status
    #[display("linkedin api error: {}", body)]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
    /// Network reported success but no post identifier could be extracted
    #[display("Unknown error: no post ID returned")]
    AmbiguousSuccess,
    /// No published post could be resolved for withdrawal
    #[display("post not found or not published: {}", _0)]
    NotFound(String),
}

/// Distribution error with source location tracking.
///
/// # Examples
///
/// ```
/// use postpilot_error::{DistributionError, DistributionErrorKind};
///
/// let err = DistributionError::new(DistributionErrorKind::CredentialExpired { status: 401 });
/// assert!(err.is_credential_expired());
/// assert!(format!("{}", err).contains("reconnect"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Distribution Error: {} at line {} in {}", kind, line, file)]
pub struct DistributionError {
    /// The kind of error that occurred
    pub kind: DistributionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DistributionError {
    /// Create a new DistributionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DistributionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the caller should prompt the user to reconnect the account.
    pub fn is_credential_expired(&self) -> bool {
        matches!(self.kind, DistributionErrorKind::CredentialExpired { .. })
    }

    /// Diagnostic text persisted in the audit record for this failure.
    pub fn audit_message(&self) -> String {
        self.kind.to_string()
    }
}
