//! Text-generation provider error types.

use serde_json::{Map, Value};

/// Text-generation provider error conditions.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The user has no provider API key configured
    #[display("No API key configured for the text-generation provider")]
    MissingApiKey,
    /// Request could not be built or sent, or the connection failed
    #[display("Provider request failed: {}", _0)]
    Http(String),
    /// Provider answered with a non-success status
    #[display("Provider error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },
    /// Provider response could not be decoded
    #[display("Failed to parse provider response: {}", _0)]
    ResponseParsing(String),
    /// Provider answered successfully but returned no completion choices
    #[display("No choices returned from provider (model {})", model)]
    NoChoices {
        /// Model reported by the provider
        model: String,
        /// Usage metrics reported by the provider
        usage: Map<String, Value>,
    },
}

/// Text-generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use postpilot_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("API key"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Model and usage the provider reported before failing, if any.
    pub fn partial(&self) -> Option<(&str, &Map<String, Value>)> {
        match &self.kind {
            GenerationErrorKind::NoChoices { model, usage } => Some((model.as_str(), usage)),
            _ => None,
        }
    }
}
