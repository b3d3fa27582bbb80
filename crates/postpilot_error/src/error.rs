//! Crate-level error aggregation.

use crate::{
    AuthError, ConfigError, DistributionError, GenerationError, StoreError, ValidationError,
};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum PostpilotErrorKind {
    /// Malformed input
    #[display("{}", _0)]
    Validation(ValidationError),
    /// Missing network credentials
    #[display("{}", _0)]
    Auth(AuthError),
    /// Persistence failure
    #[display("{}", _0)]
    Store(StoreError),
    /// Text-generation provider failure
    #[display("{}", _0)]
    Generation(GenerationError),
    /// Social network publish/withdraw failure
    #[display("{}", _0)]
    Distribution(DistributionError),
    /// Configuration failure
    #[display("{}", _0)]
    Config(ConfigError),
}

/// PostPilot error with kind discrimination.
#[derive(Debug)]
pub struct PostpilotError(Box<PostpilotErrorKind>);

impl PostpilotError {
    /// Create a new error from a kind.
    pub fn new(kind: PostpilotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PostpilotErrorKind {
        &self.0
    }

    /// True when the external network rejected the stored access token.
    ///
    /// # Examples
    ///
    /// ```
    /// use postpilot_error::{DistributionError, DistributionErrorKind, PostpilotError};
    ///
    /// let err: PostpilotError =
    ///     DistributionError::new(DistributionErrorKind::CredentialExpired { status: 403 }).into();
    /// assert!(err.is_credential_expired());
    /// ```
    pub fn is_credential_expired(&self) -> bool {
        matches!(self.kind(), PostpilotErrorKind::Distribution(e) if e.is_credential_expired())
    }

    /// Distribution error kind, when this error came from the social network path.
    pub fn distribution_kind(&self) -> Option<&crate::DistributionErrorKind> {
        match self.kind() {
            PostpilotErrorKind::Distribution(e) => Some(&e.kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostpilotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PostPilot Error: {}", self.0)
    }
}

impl std::error::Error for PostpilotError {}

// Generic From implementation for any type that converts to PostpilotErrorKind
impl<T> From<T> for PostpilotError
where
    T: Into<PostpilotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for PostPilot operations.
pub type PostpilotResult<T> = std::result::Result<T, PostpilotError>;
